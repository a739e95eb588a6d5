//! Validation of candidate analyses

use crate::SchemaDefect;
use clausal_domain::{AnalysisResult, Clause, Definition, DocumentMetadata};
use serde_json::{Map, Value};

const CLAUSE_FIELDS: [&str; 4] = ["type", "summary", "text", "citation"];
const DEFINITION_FIELDS: [&str; 3] = ["term", "definition", "citation"];
const METADATA_FIELDS: [&str; 8] = [
    "title",
    "author",
    "subject",
    "keywords",
    "creator",
    "producer",
    "creationDate",
    "modificationDate",
];

/// Outcome of validating a candidate analysis
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// The candidate has the required shape
    Valid(AnalysisResult),

    /// The candidate was rejected; every defect found is listed
    Invalid(Vec<SchemaDefect>),
}

impl Validation {
    /// Whether the candidate passed
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// Defects found (empty when valid)
    pub fn defects(&self) -> &[SchemaDefect] {
        match self {
            Validation::Valid(_) => &[],
            Validation::Invalid(defects) => defects,
        }
    }

    /// Convert into a `Result`
    pub fn into_result(self) -> Result<AnalysisResult, Vec<SchemaDefect>> {
        match self {
            Validation::Valid(result) => Ok(result),
            Validation::Invalid(defects) => Err(defects),
        }
    }
}

/// Validate a decoded provider response
///
/// Unknown fields are ignored. `metadata` and `missing_types` are optional;
/// `clauses` and `definitions` are required arrays.
pub fn validate(value: &Value) -> Validation {
    let obj = match value.as_object() {
        Some(obj) => obj,
        None => {
            return Validation::Invalid(vec![SchemaDefect::NotAnObject {
                found: json_type(value),
            }])
        }
    };

    let mut defects = Vec::new();

    let clauses = read_collection(obj, "clauses", &mut defects, |item, path, defects| {
        let mut fields = required_strings(item, path, &CLAUSE_FIELDS, defects)?.into_iter();
        Some(Clause {
            clause_type: fields.next()?,
            summary: fields.next()?,
            text: fields.next()?,
            citation: fields.next()?,
        })
    });

    let definitions = read_collection(obj, "definitions", &mut defects, |item, path, defects| {
        let mut fields = required_strings(item, path, &DEFINITION_FIELDS, defects)?.into_iter();
        Some(Definition {
            term: fields.next()?,
            definition: fields.next()?,
            citation: fields.next()?,
        })
    });

    let metadata = read_metadata(obj, &mut defects);
    let missing_types = read_missing_types(obj, &mut defects);

    if !defects.is_empty() {
        return Validation::Invalid(defects);
    }

    Validation::Valid(AnalysisResult {
        clauses,
        definitions,
        metadata,
        missing_types,
    })
}

/// Default-fill absent or null `clauses` / `definitions` with empty arrays
///
/// Returns the names of the fields that were filled. Non-object values are
/// left untouched so validation still reports them.
pub fn fill_missing_collections(value: &mut Value) -> Vec<&'static str> {
    let mut filled = Vec::new();
    if let Some(obj) = value.as_object_mut() {
        for key in ["clauses", "definitions"] {
            if matches!(obj.get(key), None | Some(Value::Null)) {
                obj.insert(key.to_string(), Value::Array(Vec::new()));
                filled.push(key);
            }
        }
    }
    filled
}

/// Read a required array, parsing each element with `parse`
fn read_collection<T, F>(
    obj: &Map<String, Value>,
    key: &str,
    defects: &mut Vec<SchemaDefect>,
    parse: F,
) -> Vec<T>
where
    F: Fn(&Value, &str, &mut Vec<SchemaDefect>) -> Option<T>,
{
    let items = match obj.get(key) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            defects.push(SchemaDefect::WrongType {
                path: key.to_string(),
                expected: "array",
                found: json_type(other),
            });
            return Vec::new();
        }
        None => {
            defects.push(SchemaDefect::MissingField { path: key.to_string() });
            return Vec::new();
        }
    };

    let mut parsed = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let path = format!("{}[{}]", key, idx);
        if let Some(value) = parse(item, &path, defects) {
            parsed.push(value);
        }
    }
    parsed
}

/// Read the named string fields of an object element, in order
fn required_strings(
    item: &Value,
    path: &str,
    names: &[&str],
    defects: &mut Vec<SchemaDefect>,
) -> Option<Vec<String>> {
    let obj = match item.as_object() {
        Some(obj) => obj,
        None => {
            defects.push(SchemaDefect::WrongType {
                path: path.to_string(),
                expected: "object",
                found: json_type(item),
            });
            return None;
        }
    };

    let mut values = Vec::with_capacity(names.len());
    let mut complete = true;
    for name in names {
        let field_path = format!("{}.{}", path, name);
        match obj.get(*name) {
            Some(Value::String(s)) => values.push(s.clone()),
            Some(other) => {
                defects.push(SchemaDefect::WrongType {
                    path: field_path,
                    expected: "string",
                    found: json_type(other),
                });
                complete = false;
            }
            None => {
                defects.push(SchemaDefect::MissingField { path: field_path });
                complete = false;
            }
        }
    }

    complete.then_some(values)
}

fn read_metadata(obj: &Map<String, Value>, defects: &mut Vec<SchemaDefect>) -> DocumentMetadata {
    let mut metadata = DocumentMetadata::default();
    let fields = match obj.get("metadata") {
        None | Some(Value::Null) => return metadata,
        Some(Value::Object(fields)) => fields,
        Some(other) => {
            defects.push(SchemaDefect::WrongType {
                path: "metadata".to_string(),
                expected: "object",
                found: json_type(other),
            });
            return metadata;
        }
    };

    for name in METADATA_FIELDS {
        let value = match fields.get(name) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                defects.push(SchemaDefect::WrongType {
                    path: format!("metadata.{}", name),
                    expected: "string",
                    found: json_type(other),
                });
                continue;
            }
        };
        if let Some(slot) = metadata_slot(&mut metadata, name) {
            *slot = Some(value);
        }
    }

    metadata
}

fn metadata_slot<'a>(metadata: &'a mut DocumentMetadata, name: &str) -> Option<&'a mut Option<String>> {
    match name {
        "title" => Some(&mut metadata.title),
        "author" => Some(&mut metadata.author),
        "subject" => Some(&mut metadata.subject),
        "keywords" => Some(&mut metadata.keywords),
        "creator" => Some(&mut metadata.creator),
        "producer" => Some(&mut metadata.producer),
        "creationDate" => Some(&mut metadata.creation_date),
        "modificationDate" => Some(&mut metadata.modification_date),
        _ => None,
    }
}

fn read_missing_types(obj: &Map<String, Value>, defects: &mut Vec<SchemaDefect>) -> Option<Vec<String>> {
    let items = match obj.get("missing_types") {
        None | Some(Value::Null) => return None,
        Some(Value::Array(items)) => items,
        Some(other) => {
            defects.push(SchemaDefect::WrongType {
                path: "missing_types".to_string(),
                expected: "array",
                found: json_type(other),
            });
            return None;
        }
    };

    let mut types = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => types.push(s.clone()),
            other => defects.push(SchemaDefect::WrongType {
                path: format!("missing_types[{}]", idx),
                expected: "string",
                found: json_type(other),
            }),
        }
    }
    Some(types)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn termination_clause() -> Value {
        json!({
            "type": "Termination",
            "summary": "Either party may terminate on 30 days notice.",
            "text": "Either party may terminate this Agreement upon thirty (30) days written notice.",
            "citation": "Page 4"
        })
    }

    #[test]
    fn test_valid_result() {
        let value = json!({
            "clauses": [termination_clause()],
            "definitions": [{
                "term": "Confidential Information",
                "definition": "Any non-public information...",
                "citation": "Page 2, Section 1.3"
            }]
        });

        let result = validate(&value).into_result().unwrap();
        assert_eq!(result.clauses.len(), 1);
        assert_eq!(result.clauses[0].clause_type, "Termination");
        assert_eq!(result.clauses[0].citation, "Page 4");
        assert_eq!(result.definitions[0].term, "Confidential Information");
        assert!(result.metadata.is_empty());
        assert!(result.missing_types.is_none());
    }

    #[test]
    fn test_empty_collections_are_valid() {
        let validation = validate(&json!({ "clauses": [], "definitions": [] }));
        assert!(validation.is_valid());
        assert!(validation.defects().is_empty());
        match validation {
            Validation::Valid(result) => assert!(result.is_empty()),
            Validation::Invalid(_) => panic!("Expected Valid"),
        }
    }

    #[test]
    fn test_rejects_non_object() {
        for value in [json!([]), json!("not json"), json!(42), Value::Null] {
            let validation = validate(&value);
            assert_eq!(validation.defects().len(), 1);
            assert!(matches!(validation.defects()[0], SchemaDefect::NotAnObject { .. }));
        }
    }

    #[test]
    fn test_rejects_missing_collections() {
        let validation = validate(&json!({}));
        assert_eq!(
            validation.defects(),
            &[
                SchemaDefect::MissingField { path: "clauses".to_string() },
                SchemaDefect::MissingField { path: "definitions".to_string() },
            ]
        );
    }

    #[test]
    fn test_rejects_non_array_collection() {
        let validation = validate(&json!({ "clauses": {}, "definitions": null }));
        assert_eq!(validation.defects().len(), 2);
        assert!(matches!(
            &validation.defects()[0],
            SchemaDefect::WrongType { path, expected: "array", found: "object" } if path == "clauses"
        ));
        assert!(matches!(
            &validation.defects()[1],
            SchemaDefect::WrongType { found: "null", .. }
        ));
    }

    #[test]
    fn test_reports_every_element_defect() {
        let value = json!({
            "clauses": [
                termination_clause(),
                { "type": "Liability", "summary": "Capped.", "citation": 7 },
                "Indemnification"
            ],
            "definitions": [{ "term": "Affiliate" }]
        });

        let defects = validate(&value).into_result().unwrap_err();
        let paths: Vec<&str> = defects.iter().map(|d| d.path()).collect();
        assert_eq!(
            paths,
            vec![
                "clauses[1].text",
                "clauses[1].citation",
                "clauses[2]",
                "definitions[0].definition",
                "definitions[0].citation",
            ]
        );
    }

    #[test]
    fn test_partial_validity_is_rejected() {
        let value = json!({
            "clauses": [termination_clause(), { "type": "Liability" }],
            "definitions": []
        });
        assert!(!validate(&value).is_valid());
    }

    #[test]
    fn test_metadata_and_missing_types() {
        let value = json!({
            "clauses": [],
            "definitions": [],
            "metadata": { "title": "MSA", "creationDate": "D:20240101", "pages": 12 },
            "missing_types": ["Indemnification"]
        });

        let result = validate(&value).into_result().unwrap();
        assert_eq!(result.metadata.title.as_deref(), Some("MSA"));
        assert_eq!(result.metadata.creation_date.as_deref(), Some("D:20240101"));
        assert_eq!(result.missing_types, Some(vec!["Indemnification".to_string()]));
    }

    #[test]
    fn test_rejects_bad_metadata() {
        let value = json!({
            "clauses": [],
            "definitions": [],
            "metadata": { "author": ["A", "B"] },
            "missing_types": [1]
        });

        let defects = validate(&value).into_result().unwrap_err();
        let paths: Vec<&str> = defects.iter().map(|d| d.path()).collect();
        assert_eq!(paths, vec!["metadata.author", "missing_types[0]"]);
    }

    #[test]
    fn test_fill_missing_collections() {
        let mut value = json!({ "clauses": [termination_clause()], "definitions": null });
        let filled = fill_missing_collections(&mut value);
        assert_eq!(filled, vec!["definitions"]);
        assert_eq!(value["definitions"], json!([]));
        assert!(validate(&value).is_valid());

        let mut value = json!({});
        assert_eq!(fill_missing_collections(&mut value), vec!["clauses", "definitions"]);

        let mut value = json!({ "clauses": "oops" });
        fill_missing_collections(&mut value);
        assert_eq!(value["clauses"], "oops");
        assert!(!validate(&value).is_valid());
    }

    #[test]
    fn test_fill_ignores_non_objects() {
        let mut value = json!("not json");
        assert!(fill_missing_collections(&mut value).is_empty());
        assert_eq!(value, json!("not json"));
    }
}
