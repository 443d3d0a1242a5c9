//! Utility functions for code generation and URL validation.
//!
//! - [`code_generator`] - Deterministic short code derivation
//! - [`url_validator`] - Well-formedness checks for submitted URLs

pub mod code_generator;
pub mod url_validator;
