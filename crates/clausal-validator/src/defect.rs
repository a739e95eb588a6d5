//! Structural defects found during validation

use std::fmt;

/// One structural problem in a candidate analysis
///
/// `path` locates the problem, e.g. `clauses[2].citation`. The root is `$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaDefect {
    /// The top-level value is not a JSON object
    NotAnObject {
        /// JSON type actually found
        found: &'static str,
    },

    /// A required field is absent
    MissingField {
        /// Location of the missing field
        path: String,
    },

    /// A field has the wrong JSON type
    WrongType {
        /// Location of the field
        path: String,
        /// JSON type required
        expected: &'static str,
        /// JSON type actually found
        found: &'static str,
    },
}

impl SchemaDefect {
    /// Location of the defect
    pub fn path(&self) -> &str {
        match self {
            SchemaDefect::NotAnObject { .. } => "$",
            SchemaDefect::MissingField { path } | SchemaDefect::WrongType { path, .. } => path,
        }
    }
}

impl fmt::Display for SchemaDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDefect::NotAnObject { found } => {
                write!(f, "$: expected object, found {}", found)
            }
            SchemaDefect::MissingField { path } => write!(f, "{}: missing required field", path),
            SchemaDefect::WrongType { path, expected, found } => {
                write!(f, "{}: expected {}, found {}", path, expected, found)
            }
        }
    }
}
