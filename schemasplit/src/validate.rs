//! Advisory shape checks for package documents.
//!
//! Validation never blocks explode or implode; callers decide whether a
//! non-empty violation list is a failure.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::diff::{child_path, ROOT_PATH};
use crate::document::{type_name, LANGUAGE_KEY};
use crate::token::{EntityKind, Token};

/// Category of a validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required key is absent.
    Missing,
    /// A value has the wrong JSON type.
    WrongType,
    /// An entity map key is not a valid token.
    MalformedToken,
}

/// One problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
    pub kind: ViolationKind,
}

/// Checks a document and lists every problem found.
pub trait Validator {
    fn validate(&self, document: &Value) -> Vec<Violation>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expected {
    String,
    Array,
    Object,
}

impl Expected {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Expected::String => value.is_string(),
            Expected::Array => value.is_array(),
            Expected::Object => value.is_object(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Expected::String => "a string",
            Expected::Array => "an array",
            Expected::Object => "an object",
        }
    }
}

struct Rule {
    key: &'static str,
    expected: Expected,
    required: bool,
}

const fn optional(key: &'static str, expected: Expected) -> Rule {
    Rule {
        key,
        expected,
        required: false,
    }
}

const TOP_LEVEL_RULES: &[Rule] = &[
    Rule {
        key: "name",
        expected: Expected::String,
        required: true,
    },
    optional("displayName", Expected::String),
    optional("version", Expected::String),
    optional("description", Expected::String),
    optional("keywords", Expected::Array),
    optional("homepage", Expected::String),
    optional("license", Expected::String),
    optional("repository", Expected::String),
    optional("publisher", Expected::String),
    optional("meta", Expected::Object),
    optional("config", Expected::Object),
    optional("provider", Expected::Object),
    optional("functions", Expected::Object),
    optional("resources", Expected::Object),
    optional("types", Expected::Object),
    optional("language", Expected::Object),
];

const ENTITY_RULES: &[Rule] = &[
    optional("description", Expected::String),
    optional("deprecationMessage", Expected::String),
];

/// Rule-table validator for package schema documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for SchemaValidator {
    fn validate(&self, document: &Value) -> Vec<Violation> {
        let mut violations = Vec::new();
        let Some(root) = document.as_object() else {
            violations.push(wrong_type(ROOT_PATH, Expected::Object, document));
            return violations;
        };

        apply_rules(ROOT_PATH, root, TOP_LEVEL_RULES, &mut violations);

        for kind in EntityKind::ALL {
            if let Some(Value::Object(entities)) = root.get(kind.key()) {
                check_entities(kind, entities, &mut violations);
            }
        }

        if let Some(Value::Object(overlays)) = root.get(LANGUAGE_KEY) {
            let parent = child_path(ROOT_PATH, LANGUAGE_KEY);
            for (name, overlay) in overlays {
                if !overlay.is_object() {
                    violations.push(wrong_type(
                        &child_path(&parent, name),
                        Expected::Object,
                        overlay,
                    ));
                }
            }
        }

        violations
    }
}

fn check_entities(kind: EntityKind, entities: &Map<String, Value>, violations: &mut Vec<Violation>) {
    let parent = child_path(ROOT_PATH, kind.key());
    for (token, entity) in entities {
        let path = child_path(&parent, token);
        if let Err(err) = Token::parse(token) {
            violations.push(Violation {
                path: path.clone(),
                message: err.to_string(),
                kind: ViolationKind::MalformedToken,
            });
        }
        match entity.as_object() {
            Some(fields) => apply_rules(&path, fields, ENTITY_RULES, violations),
            None => violations.push(wrong_type(&path, Expected::Object, entity)),
        }
    }
}

fn apply_rules(
    parent: &str,
    object: &Map<String, Value>,
    rules: &[Rule],
    violations: &mut Vec<Violation>,
) {
    for rule in rules {
        let path = child_path(parent, rule.key);
        match object.get(rule.key) {
            Some(value) if !rule.expected.matches(value) => {
                violations.push(wrong_type(&path, rule.expected, value));
            }
            Some(_) => {}
            None if rule.required => violations.push(Violation {
                message: format!("{} is required", path),
                path,
                kind: ViolationKind::Missing,
            }),
            None => {}
        }
    }
}

fn wrong_type(path: &str, expected: Expected, found: &Value) -> Violation {
    Violation {
        path: path.to_string(),
        message: format!(
            "expected {}, found {}",
            expected.name(),
            type_name(found)
        ),
        kind: ViolationKind::WrongType,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(document: Value) -> Vec<Violation> {
        SchemaValidator::new().validate(&document)
    }

    #[test]
    fn test_valid_document() {
        let violations = validate(json!({
            "name": "pkg",
            "version": "1.0.0",
            "resources": {"pkg:index:Bucket": {"description": "A bucket"}},
            "language": {"nodejs": {}},
        }));
        assert!(violations.is_empty(), "{:?}", violations);
    }

    #[test]
    fn test_missing_name() {
        let violations = validate(json!({}));
        assert_eq!(
            violations,
            [Violation {
                path: "$.name".to_string(),
                message: "$.name is required".to_string(),
                kind: ViolationKind::Missing,
            }]
        );
    }

    #[test]
    fn test_wrong_types() {
        let violations = validate(json!({"name": 3, "resources": [], "keywords": "a"}));
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, ["$.name", "$.keywords", "$.resources"]);
        assert!(violations
            .iter()
            .all(|v| v.kind == ViolationKind::WrongType));
    }

    #[test]
    fn test_malformed_token_and_entity_shape() {
        let violations = validate(json!({
            "name": "pkg",
            "functions": {
                "bad": {},
                "pkg:index:f": "not an object",
                "pkg:index:g": {"description": 12},
            },
        }));

        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].kind, ViolationKind::MalformedToken);
        assert_eq!(violations[0].path, r#"$.functions.bad"#);
        assert_eq!(violations[1].path, r#"$.functions["pkg:index:f"]"#);
        assert_eq!(
            violations[2].path,
            r#"$.functions["pkg:index:g"].description"#
        );
    }

    #[test]
    fn test_language_overlays_must_be_objects() {
        let violations = validate(json!({"name": "pkg", "language": {"go": "x"}}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "$.language.go");
    }

    #[test]
    fn test_non_object_root() {
        let violations = validate(json!("text"));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "expected an object, found a string");
    }

    #[test]
    fn test_violation_serializes() {
        let violation = Violation {
            path: "$.name".to_string(),
            message: "m".to_string(),
            kind: ViolationKind::WrongType,
        };
        assert_eq!(
            serde_json::to_value(&violation).unwrap(),
            json!({"path": "$.name", "message": "m", "kind": "wrong_type"})
        );
    }
}
