//! Data models for the user directory.
//!
//! - `User`: a directory entry as fetched from the remote source or
//!   created locally
//! - `UserDraft`: the in-progress fields of the add-user form

pub mod user;

pub use user::{User, UserDraft};
