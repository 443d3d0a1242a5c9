//! Application layer services implementing business logic.
//!
//! Services orchestrate domain operations by coordinating repository calls,
//! validation, and the code generation rules. HTTP handlers and the admin CLI
//! consume them.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Shortening, lookup and deletion

pub mod services;
