//! Rule-based validation of request parameters.
//!
//! # Design
//! A `Rules` map assigns each field an ordered list of `Rule`s. Fields are
//! checked in the order their rules were added; each field stops at its first
//! failing rule, and the first failure overall becomes the outcome's message.
//! The outcome is a plain `Result`, so callers branch on it instead of
//! inspecting a status string.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// Value types a `Rule::Type` can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Object,
    Array,
    Number,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::Number => "number",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Object => value.is_object(),
            FieldType::Array => value.is_array(),
            FieldType::Number => value.is_number(),
        }
    }
}

/// A single validation constraint on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The field must be present and non-empty.
    Required,
    /// The field, when present and non-empty, must have this type.
    Type(FieldType),
}

/// Field must be present, not null, and not an empty string.
pub const IS_REQUIRED: Rule = Rule::Required;
pub const IS_STRING: Rule = Rule::Type(FieldType::String);
pub const IS_OBJECT: Rule = Rule::Type(FieldType::Object);
pub const IS_ARRAY: Rule = Rule::Type(FieldType::Array);
pub const IS_NUMBER: Rule = Rule::Type(FieldType::Number);

impl Rule {
    /// Check `value` (None when the field is absent) and return the error
    /// message on failure.
    fn check(self, field: &str, value: Option<&Value>) -> Result<(), String> {
        match self {
            Rule::Required => {
                if is_empty(value, None) {
                    return Err(format!("{field} is required"));
                }
                Ok(())
            }
            Rule::Type(ty) => {
                if is_empty(value, Some(ty)) || value.is_some_and(|v| ty.matches(v)) {
                    return Ok(());
                }
                Err(format!("{field} is not a {}", ty.as_str()))
            }
        }
    }
}

/// Missing and null are always empty. An empty string is empty for untyped
/// and string/number checks; an empty array only for the array check.
fn is_empty(value: Option<&Value>, ty: Option<FieldType>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => {
            s.is_empty() && matches!(ty, None | Some(FieldType::String | FieldType::Number))
        }
        Some(Value::Array(items)) => items.is_empty() && ty == Some(FieldType::Array),
        Some(_) => false,
    }
}

/// Ordered mapping from field name to the rules it must satisfy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rules {
    entries: Vec<(String, Vec<Rule>)>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `rules` to `field`, keeping the field's first-insertion position.
    pub fn field(mut self, field: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.insert(field, rules);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, rules: impl IntoIterator<Item = Rule>) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => existing.extend(rules),
            None => self.entries.push((field, rules.into_iter().collect())),
        }
    }

    pub fn get(&self, field: &str) -> Option<&[Rule]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.entries
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.as_slice()))
    }
}

/// Wire form of a rule: `{"required": true}`, `{"type": "string"}`, or both.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSpec {
    #[serde(default)]
    required: bool,
    #[serde(rename = "type")]
    ty: Option<FieldType>,
}

impl RuleSpec {
    fn into_rules(self) -> Vec<Rule> {
        let mut rules = Vec::with_capacity(2);
        if self.required {
            rules.push(Rule::Required);
        }
        if let Some(ty) = self.ty {
            rules.push(Rule::Type(ty));
        }
        rules
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(RuleSpec),
    Many(Vec<RuleSpec>),
}

impl<'de> Deserialize<'de> for Rules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RulesVisitor;

        impl<'de> Visitor<'de> for RulesVisitor {
            type Value = Rules;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to rule specs")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Rules, A::Error> {
                let mut rules = Rules::new();
                while let Some((field, spec)) = map.next_entry::<String, OneOrMany>()? {
                    let expanded = match spec {
                        OneOrMany::One(spec) => spec.into_rules(),
                        OneOrMany::Many(specs) => {
                            specs.into_iter().flat_map(RuleSpec::into_rules).collect()
                        }
                    };
                    if expanded.is_empty() {
                        return Err(de::Error::custom(format!("no rules given for `{field}`")));
                    }
                    rules.insert(field, expanded);
                }
                Ok(rules)
            }
        }

        deserializer.deserialize_map(RulesVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Success,
    Error,
}

/// One field's first failing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Fields passed every rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSuccess {
    pub status: ValidationStatus,
    pub message: String,
    pub data: Map<String, Value>,
}

/// At least one field failed. `message` is the first failure's message and
/// `data` maps each failing field to its error records.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    pub status: ValidationStatus,
    pub message: String,
    pub data: Map<String, Value>,
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    #[serde(skip)]
    pub errors: Vec<FieldError>,
}

pub type ValidationOutcome = Result<ValidationSuccess, ValidationFailure>;

/// Validate `fields` against `rules`.
///
/// Each ruled field is checked in rule order and stops at its first failure.
/// Fields without rules are carried through untouched.
pub fn validate_request(fields: Map<String, Value>, rules: &Rules) -> ValidationOutcome {
    let errors: Vec<FieldError> = rules
        .iter()
        .filter_map(|(field, field_rules)| {
            let value = fields.get(field);
            field_rules
                .iter()
                .find_map(|rule| rule.check(field, value).err())
                .map(|message| FieldError {
                    field: field.to_string(),
                    message,
                })
        })
        .collect();

    let Some(first) = errors.first() else {
        return Ok(ValidationSuccess {
            status: ValidationStatus::Success,
            message: String::new(),
            data: fields,
        });
    };

    let message = first.message.clone();
    warn!(field = %first.field, "request parameters failed validation: {message}");
    Err(ValidationFailure {
        status: ValidationStatus::Error,
        message,
        data: errors_by_field(&errors),
        is_valid: true,
        errors,
    })
}

/// Group errors under their field name, each as `[{message, field}, ..]`.
fn errors_by_field(errors: &[FieldError]) -> Map<String, Value> {
    let mut grouped = Map::new();
    for error in errors {
        let record = serde_json::json!({ "message": error.message, "field": error.field });
        match grouped
            .entry(error.field.clone())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            Value::Array(records) => records.push(record),
            other => *other = Value::Array(vec![record]),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn empty_fields_and_rules_succeed() {
        let ok = validate_request(Map::new(), &Rules::new()).unwrap();
        assert_eq!(ok.status, ValidationStatus::Success);
        assert_eq!(ok.message, "");
        assert!(ok.data.is_empty());
    }

    #[test]
    fn missing_required_field_fails() {
        let rules = Rules::new().field("name", [IS_REQUIRED]);
        let err = validate_request(Map::new(), &rules).unwrap_err();
        assert_eq!(err.status, ValidationStatus::Error);
        assert_eq!(err.message, "name is required");
        assert!(err.is_valid);
    }

    #[test]
    fn null_and_empty_string_fail_required() {
        let rules = Rules::new().field("v", [IS_REQUIRED]);
        for value in [json!(null), json!("")] {
            let err = validate_request(fields(json!({ "v": value })), &rules).unwrap_err();
            assert_eq!(err.message, "v is required");
        }
    }

    #[test]
    fn zero_and_false_satisfy_required() {
        let rules = Rules::new().field("v", [IS_REQUIRED]);
        for value in [json!(0), json!(false), json!({}), json!([])] {
            assert!(validate_request(fields(json!({ "v": value })), &rules).is_ok());
        }
    }

    #[test]
    fn type_mismatch_reports_expected_type() {
        let rules = Rules::new().field("age", [IS_NUMBER]);
        let err = validate_request(fields(json!({"age": "ten"})), &rules).unwrap_err();
        assert_eq!(err.message, "age is not a number");
    }

    #[test]
    fn object_rule_rejects_arrays() {
        let rules = Rules::new().field("meta", [IS_OBJECT]);
        let err = validate_request(fields(json!({"meta": [1]})), &rules).unwrap_err();
        assert_eq!(err.message, "meta is not a object");
    }

    #[test]
    fn empty_string_fails_object_and_array_rules() {
        let rules = Rules::new().field("meta", [IS_OBJECT]).field("tags", [IS_ARRAY]);
        let err = validate_request(fields(json!({"meta": "", "tags": ""})), &rules).unwrap_err();
        assert_eq!(err.message, "meta is not a object");
        assert_eq!(err.errors[1].message, "tags is not a array");
    }

    #[test]
    fn empty_string_skips_number_rule_and_empty_array_skips_array_rule() {
        let rules = Rules::new().field("age", [IS_NUMBER]).field("tags", [IS_ARRAY]);
        assert!(validate_request(fields(json!({"age": "", "tags": []})), &rules).is_ok());
    }

    #[test]
    fn type_rule_skips_absent_optional_field() {
        let rules = Rules::new().field("tags", [IS_ARRAY]).field("nick", [IS_STRING]);
        let ok = validate_request(fields(json!({"nick": ""})), &rules).unwrap();
        assert_eq!(ok.data["nick"], "");
    }

    #[test]
    fn field_stops_at_first_failing_rule() {
        let rules = Rules::new().field("name", [IS_REQUIRED, IS_STRING]);
        let err = validate_request(Map::new(), &rules).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].message, "name is required");
    }

    #[test]
    fn message_comes_from_first_failing_field_in_rule_order() {
        let rules = Rules::new()
            .field("zeta", [IS_REQUIRED])
            .field("alpha", [IS_NUMBER]);
        let err = validate_request(fields(json!({"alpha": "x"})), &rules).unwrap_err();
        assert_eq!(err.message, "zeta is required");
        let fields: Vec<_> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["zeta", "alpha"]);
    }

    #[test]
    fn failure_data_groups_errors_by_field() {
        let rules = Rules::new()
            .field("id", [IS_NUMBER])
            .field("name", [IS_REQUIRED])
            .field("extra", [IS_STRING]);
        let err = validate_request(fields(json!({"id": "7", "extra": "ok"})), &rules).unwrap_err();
        assert_eq!(
            Value::Object(err.data.clone()),
            json!({
                "id": [{"message": "id is not a number", "field": "id"}],
                "name": [{"message": "name is required", "field": "name"}]
            })
        );
    }

    #[test]
    fn failure_serializes_with_wire_names() {
        let rules = Rules::new().field("name", [IS_REQUIRED]);
        let err = validate_request(Map::new(), &rules).unwrap_err();
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "error",
                "message": "name is required",
                "data": {"name": [{"message": "name is required", "field": "name"}]},
                "isValid": true
            })
        );
    }

    #[test]
    fn insert_extends_existing_field() {
        let mut rules = Rules::new().field("a", [IS_REQUIRED]).field("b", [IS_NUMBER]);
        rules.insert("a", [IS_STRING]);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.get("a"), Some(&[IS_REQUIRED, IS_STRING][..]));
    }

    #[test]
    fn rules_deserialize_in_document_order() {
        let rules: Rules = serde_json::from_str(
            r#"{"name": [{"required": true}, {"type": "string"}], "age": {"required": true, "type": "number"}}"#,
        )
        .unwrap();
        let names: Vec<_> = rules.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["name", "age"]);
        assert_eq!(rules.get("age"), Some(&[IS_REQUIRED, IS_NUMBER][..]));
    }

    #[test]
    fn rules_reject_empty_spec() {
        let result: Result<Rules, _> = serde_json::from_str(r#"{"name": {}}"#);
        assert!(result.is_err());
    }
}
