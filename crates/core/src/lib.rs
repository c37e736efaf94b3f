//! Domain types shared by the thumbnailer crates.
//!
//! Everything here is pure: no filesystem, process or network access. The
//! pipeline crate builds the side-effecting stages on top of these types.

pub mod error;
pub mod naming;
pub mod request;
pub mod sizes;
pub mod source;
pub mod storage;
