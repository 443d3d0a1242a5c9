//! Core domain entities.
//!
//! - [`ShortLink`] - A stored `(url, code)` mapping
//! - [`NewShortLink`] - Input for creating a mapping; identity and timestamps
//!   are assigned by the store

pub mod link;

pub use link::{NewShortLink, ShortLink};
