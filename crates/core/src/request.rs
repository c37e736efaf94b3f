//! Request identity: the namespace segment that names one request's
//! workspace directory and its storage key prefix.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::PipelineError;

/// Longest identity accepted, in bytes.
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// One path segment: alphanumeric start, then alphanumerics, `.`, `_`, `-`.
const REQUEST_ID_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9._-]*$";

static REQUEST_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(REQUEST_ID_PATTERN).expect("valid regex"));

/// Validated request identity.
///
/// Only constructible through [`RequestId::parse`], so any `RequestId` is
/// safe to join onto a directory or use as a key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Validate `raw` as a single, traversal-free path segment.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        if raw.is_empty() {
            return Err(PipelineError::Validation(
                "request id must not be empty".into(),
            ));
        }
        if raw.len() > MAX_REQUEST_ID_LEN {
            return Err(PipelineError::Validation(format!(
                "request id exceeds {MAX_REQUEST_ID_LEN} characters"
            )));
        }
        if !REQUEST_ID_RE.is_match(raw) {
            return Err(PipelineError::Validation(format!(
                "request id '{raw}' may only contain letters, digits, '.', '_' and '-' \
                 and must start with a letter or digit"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
