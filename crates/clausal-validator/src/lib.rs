//! Clausal Schema Validator
//!
//! Decides whether a decoded provider response is an acceptable
//! [`AnalysisResult`](clausal_domain::AnalysisResult).
//!
//! The validator:
//! - Accepts any `serde_json::Value` and never panics
//! - Reports every structural defect, not just the first
//! - Is all-or-nothing: a partially valid response is rejected
//! - Is provider-agnostic: every provider is held to the same shape
//!
//! # Examples
//!
//! ```
//! use clausal_validator::{validate, Validation};
//! use serde_json::json;
//!
//! let value = json!({ "clauses": [], "definitions": [] });
//! match validate(&value) {
//!     Validation::Valid(result) => assert!(result.is_empty()),
//!     Validation::Invalid(defects) => panic!("unexpected defects: {:?}", defects),
//! }
//!
//! let value = json!({ "clauses": "none" });
//! assert!(!validate(&value).is_valid());
//! ```

#![warn(missing_docs)]

mod defect;
mod schema;
mod validator;

pub use defect::SchemaDefect;
pub use schema::json_schema;
pub use validator::{fill_missing_collections, validate, Validation};
