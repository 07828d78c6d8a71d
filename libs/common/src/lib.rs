//! Common library for the wedding invitation platform
//!
//! Shared entity models, validation rules and the validation error type used
//! by both the invitation client and the development API.

pub mod error;
pub mod models;
pub mod validation;

/// Example usage of the validation helpers
///
/// ```rust
/// use common::validation::{slugify, validate_slug};
///
/// let slug = slugify("Anna & Ben");
/// assert_eq!(slug, "anna-and-ben");
/// assert!(validate_slug(&slug).is_ok());
/// ```
pub fn example_usage() {}
