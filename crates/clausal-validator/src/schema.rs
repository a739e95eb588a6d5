//! JSON Schema for declared response formats

use serde_json::{json, Value};

/// JSON Schema describing `{ clauses, definitions }`
///
/// Sent to providers that accept a declared response format. Strict mode
/// requires every property to be listed as required and no extras allowed.
pub fn json_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "clauses": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "type": { "type": "string" },
                        "summary": { "type": "string" },
                        "text": { "type": "string" },
                        "citation": { "type": "string" }
                    },
                    "required": ["type", "summary", "text", "citation"],
                    "additionalProperties": false
                }
            },
            "definitions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "term": { "type": "string" },
                        "definition": { "type": "string" },
                        "citation": { "type": "string" }
                    },
                    "required": ["term", "definition", "citation"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["clauses", "definitions"],
        "additionalProperties": false
    })
}
