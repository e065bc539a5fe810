use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{PilotError, PilotResult};

/// A closed, versioned set of operation shapes that raw `action` objects are checked against.
///
/// Implementations must be pure: the same raw value always yields the same result.
pub trait OperationSchema {
    type Operation;

    /// Names of every permitted variant, used in diagnostics.
    fn variants(&self) -> &'static [&'static str];

    fn validate(&self, raw: &Value) -> Result<Self::Operation, Vec<SchemaIssue>>;
}

/// One mismatch between a raw action and the schema, located by a dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub path: String,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    Required,
    InvalidType { expected: &'static str, received: &'static str },
    InvalidDiscriminator { options: Vec<&'static str> },
    InvalidEnum { options: Vec<&'static str>, received: String },
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Required => write!(f, "Required")?,
            IssueKind::InvalidType { expected, received } => {
                write!(f, "Expected {expected}, received {received}")?
            }
            IssueKind::InvalidDiscriminator { options } => write!(
                f,
                "Invalid discriminator value. Expected {}",
                quoted_options(options)
            )?,
            IssueKind::InvalidEnum { options, received } => write!(
                f,
                "Invalid enum value. Expected {}, received '{received}'",
                quoted_options(options)
            )?,
        }
        if !self.path.is_empty() {
            write!(f, " at \"{}\"", self.path)?;
        }
        Ok(())
    }
}

fn quoted_options(options: &[&str]) -> String {
    options
        .iter()
        .map(|o| format!("'{o}'"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Renders schema issues as a single user-facing sentence.
pub fn describe_issues(issues: &[SchemaIssue]) -> String {
    let joined = issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!("Validation error: {joined}")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An operation paired with the model's rationale for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action<O = Operation> {
    pub thought: Option<String>,
    pub operation: O,
}

/// Actions in execution order. Built all at once or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionList<O = Operation>(Vec<Action<O>>);

impl<O> ActionList<O> {
    pub(crate) fn new(actions: Vec<Action<O>>) -> Self {
        Self(actions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action<O>> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Action<O>> {
        self.0
    }
}

impl<O> IntoIterator for ActionList<O> {
    type Item = Action<O>;
    type IntoIter = std::vec::IntoIter<Action<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, O> IntoIterator for &'a ActionList<O> {
    type Item = &'a Action<O>;
    type IntoIter = std::slice::Iter<'a, Action<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Browser operations understood by the built-in schema.
///
/// Serialized the same way models are asked to write them:
/// `{"name": "setValue", "args": {"xpath": "...", "value": "..."}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "args", rename_all = "camelCase")]
pub enum Operation {
    Click { xpath: String },
    Hover { xpath: String },
    SetValue { xpath: String, value: String },
    SetValueAndEnter { xpath: String, value: String },
    Scroll {
        direction: ScrollDirection,
        #[serde(skip_serializing_if = "Option::is_none")]
        amount: Option<u64>,
    },
    Navigate { url: String },
    Back {},
    Forward {},
    Wait { duration_ms: u64 },
}

const DEFAULT_WAIT_MS: u64 = 1000;

/// The built-in browser operation set.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserOperations;

const BROWSER_VARIANTS: &[&str] = &[
    "click",
    "hover",
    "setValue",
    "setValueAndEnter",
    "scroll",
    "navigate",
    "back",
    "forward",
    "wait",
];

impl OperationSchema for BrowserOperations {
    type Operation = Operation;

    fn variants(&self) -> &'static [&'static str] {
        BROWSER_VARIANTS
    }

    fn validate(&self, raw: &Value) -> Result<Operation, Vec<SchemaIssue>> {
        let Some(obj) = raw.as_object() else {
            return Err(vec![SchemaIssue {
                path: String::new(),
                kind: IssueKind::InvalidType {
                    expected: "object",
                    received: json_type_name(raw),
                },
            }]);
        };

        let name = match obj.get("name") {
            None | Some(Value::Null) => {
                return Err(vec![SchemaIssue {
                    path: "name".into(),
                    kind: IssueKind::Required,
                }])
            }
            Some(Value::String(name)) => name.as_str(),
            Some(other) => {
                return Err(vec![SchemaIssue {
                    path: "name".into(),
                    kind: IssueKind::InvalidType {
                        expected: "string",
                        received: json_type_name(other),
                    },
                }])
            }
        };

        let mut args = Args::new(obj);
        let operation = match name {
            "click" => validate_click(&mut args),
            "hover" => validate_hover(&mut args),
            "setValue" => validate_set_value(&mut args),
            "setValueAndEnter" => validate_set_value_and_enter(&mut args),
            "scroll" => validate_scroll(&mut args),
            "navigate" => validate_navigate(&mut args),
            "back" => args.no_fields().then_some(Operation::Back {}),
            "forward" => args.no_fields().then_some(Operation::Forward {}),
            "wait" => validate_wait(&mut args),
            _ => {
                return Err(vec![SchemaIssue {
                    path: "name".into(),
                    kind: IssueKind::InvalidDiscriminator {
                        options: self.variants().to_vec(),
                    },
                }])
            }
        };

        match operation {
            Some(op) if args.issues.is_empty() => Ok(op),
            _ => Err(args.issues),
        }
    }
}

fn validate_click(args: &mut Args<'_>) -> Option<Operation> {
    let xpath = args.required_str("xpath");
    Some(Operation::Click { xpath: xpath? })
}

fn validate_hover(args: &mut Args<'_>) -> Option<Operation> {
    let xpath = args.required_str("xpath");
    Some(Operation::Hover { xpath: xpath? })
}

fn validate_set_value(args: &mut Args<'_>) -> Option<Operation> {
    let xpath = args.required_str("xpath");
    let value = args.required_str("value");
    Some(Operation::SetValue {
        xpath: xpath?,
        value: value?,
    })
}

fn validate_set_value_and_enter(args: &mut Args<'_>) -> Option<Operation> {
    let xpath = args.required_str("xpath");
    let value = args.required_str("value");
    Some(Operation::SetValueAndEnter {
        xpath: xpath?,
        value: value?,
    })
}

fn validate_scroll(args: &mut Args<'_>) -> Option<Operation> {
    let direction = args.required_enum("direction", &["up", "down"]);
    let amount = args.optional_u64("amount");
    let direction = match direction? {
        "up" => ScrollDirection::Up,
        _ => ScrollDirection::Down,
    };
    Some(Operation::Scroll {
        direction,
        amount: amount?,
    })
}

fn validate_navigate(args: &mut Args<'_>) -> Option<Operation> {
    let url = args.required_str("url");
    Some(Operation::Navigate { url: url? })
}

fn validate_wait(args: &mut Args<'_>) -> Option<Operation> {
    let duration_ms = args.optional_u64("duration_ms")?;
    Some(Operation::Wait {
        duration_ms: duration_ms.unwrap_or(DEFAULT_WAIT_MS),
    })
}

/// Field reader over an action's `args` object that records every mismatch it sees,
/// so one diagnostic can report all missing or mistyped fields at once.
struct Args<'a> {
    fields: Option<&'a Map<String, Value>>,
    issues: Vec<SchemaIssue>,
}

impl<'a> Args<'a> {
    fn new(action: &'a Map<String, Value>) -> Self {
        let mut issues = Vec::new();
        let fields = match action.get("args") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                issues.push(SchemaIssue {
                    path: "args".into(),
                    kind: IssueKind::InvalidType {
                        expected: "object",
                        received: json_type_name(other),
                    },
                });
                None
            }
        };
        Self { fields, issues }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|map| map.get(key))
            .filter(|v| !v.is_null())
    }

    fn require_args(&mut self) -> bool {
        if self.fields.is_some() {
            return true;
        }
        if !self.issues.iter().any(|i| i.path == "args") {
            self.issues.push(SchemaIssue {
                path: "args".into(),
                kind: IssueKind::Required,
            });
        }
        false
    }

    fn no_fields(&self) -> bool {
        self.issues.is_empty()
    }

    fn required_str(&mut self, key: &str) -> Option<String> {
        if !self.require_args() {
            return None;
        }
        match self.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.mistyped(key, "string", other);
                None
            }
            None => {
                self.issues.push(SchemaIssue {
                    path: format!("args.{key}"),
                    kind: IssueKind::Required,
                });
                None
            }
        }
    }

    fn required_enum(&mut self, key: &str, options: &[&'static str]) -> Option<&'static str> {
        let raw = self.required_str(key)?;
        match options.iter().copied().find(|o| *o == raw) {
            Some(option) => Some(option),
            None => {
                self.issues.push(SchemaIssue {
                    path: format!("args.{key}"),
                    kind: IssueKind::InvalidEnum {
                        options: options.to_vec(),
                        received: raw,
                    },
                });
                None
            }
        }
    }

    /// Outer `None` means the field was present but invalid.
    fn optional_u64(&mut self, key: &str) -> Option<Option<u64>> {
        match self.get(key) {
            None => Some(None),
            Some(value) => match value.as_u64() {
                Some(n) => Some(Some(n)),
                None => {
                    self.mistyped(key, "non-negative integer", value);
                    None
                }
            },
        }
    }

    fn mistyped(&mut self, key: &str, expected: &'static str, value: &Value) {
        self.issues.push(SchemaIssue {
            path: format!("args.{key}"),
            kind: IssueKind::InvalidType {
                expected,
                received: json_type_name(value),
            },
        });
    }
}

/// Validates one raw `{thought, action}` record into a typed [`Action`].
pub fn validate_record<S: OperationSchema>(
    schema: &S,
    record: &Value,
) -> PilotResult<Action<S::Operation>> {
    let raw_action = match record.get("action") {
        None | Some(Value::Null) => {
            return Err(PilotError::validation("Action is required", record))
        }
        Some(action) => action,
    };

    let operation = schema
        .validate(raw_action)
        .map_err(|issues| PilotError::validation(describe_issues(&issues), record))?;

    let thought = match record.get("thought") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    Ok(Action { thought, operation })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(raw: Value) -> Result<Operation, Vec<SchemaIssue>> {
        BrowserOperations.validate(&raw)
    }

    fn message(raw: Value) -> String {
        describe_issues(&validate(raw).unwrap_err())
    }

    #[test]
    fn accepts_every_variant() {
        assert_eq!(
            validate(json!({"name": "click", "args": {"xpath": "//a"}})).unwrap(),
            Operation::Click { xpath: "//a".into() }
        );
        assert_eq!(
            validate(json!({"name": "setValueAndEnter", "args": {"xpath": "//input", "value": "rust"}}))
                .unwrap(),
            Operation::SetValueAndEnter {
                xpath: "//input".into(),
                value: "rust".into()
            }
        );
        assert_eq!(
            validate(json!({"name": "scroll", "args": {"direction": "down", "amount": 400}})).unwrap(),
            Operation::Scroll {
                direction: ScrollDirection::Down,
                amount: Some(400)
            }
        );
        assert_eq!(
            validate(json!({"name": "navigate", "args": {"url": "https://example.com"}})).unwrap(),
            Operation::Navigate {
                url: "https://example.com".into()
            }
        );
        assert_eq!(validate(json!({"name": "back"})).unwrap(), Operation::Back {});
        assert_eq!(validate(json!({"name": "forward", "args": {}})).unwrap(), Operation::Forward {});
        assert_eq!(
            validate(json!({"name": "wait"})).unwrap(),
            Operation::Wait { duration_ms: 1000 }
        );
    }

    #[test]
    fn missing_field_is_named() {
        assert_eq!(
            message(json!({"name": "click", "args": {}})),
            "Validation error: Required at \"args.xpath\""
        );
    }

    #[test]
    fn reports_every_mismatch() {
        assert_eq!(
            message(json!({"name": "setValue", "args": {"value": 3}})),
            "Validation error: Required at \"args.xpath\"; Expected string, received number at \"args.value\""
        );
    }

    #[test]
    fn missing_args_reported_once() {
        let issues = validate(json!({"name": "setValue"})).unwrap_err();
        assert_eq!(
            issues,
            vec![SchemaIssue {
                path: "args".into(),
                kind: IssueKind::Required
            }]
        );
    }

    #[test]
    fn unknown_name_lists_permitted_variants() {
        let msg = message(json!({"name": "teleport"}));
        assert!(msg.starts_with("Validation error: Invalid discriminator value. Expected 'click' | 'hover'"));
        assert!(msg.ends_with("'wait' at \"name\""));
    }

    #[test]
    fn discriminator_options_come_from_variants() {
        let issues = validate(json!({"name": "teleport"})).unwrap_err();
        assert_eq!(
            issues,
            vec![SchemaIssue {
                path: "name".into(),
                kind: IssueKind::InvalidDiscriminator {
                    options: BrowserOperations.variants().to_vec()
                }
            }]
        );
        for name in BrowserOperations.variants() {
            let issues = validate(json!({"name": name, "args": {}}))
                .err()
                .unwrap_or_default();
            assert!(
                issues.iter().all(|i| i.path != "name"),
                "{name} should be a known variant"
            );
        }
    }

    #[test]
    fn bad_scroll_direction() {
        assert_eq!(
            message(json!({"name": "scroll", "args": {"direction": "left"}})),
            "Validation error: Invalid enum value. Expected 'up' | 'down', received 'left' at \"args.direction\""
        );
    }

    #[test]
    fn non_object_action() {
        assert_eq!(message(json!("click")), "Validation error: Expected object, received string");
    }

    #[test]
    fn negative_wait_rejected() {
        assert_eq!(
            message(json!({"name": "wait", "args": {"duration_ms": -5}})),
            "Validation error: Expected non-negative integer, received number at \"args.duration_ms\""
        );
    }

    #[test]
    fn record_without_action() {
        let err = validate_record(&BrowserOperations, &json!({"thought": "hmm"})).unwrap_err();
        match err {
            PilotError::Validation { message, element } => {
                assert_eq!(message, "Action is required");
                assert!(element.contains("hmm"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn record_keeps_thought_verbatim() {
        let action = validate_record(
            &BrowserOperations,
            &json!({"thought": "  Click the login link ", "action": {"name": "click", "args": {"xpath": "//a"}}}),
        )
        .unwrap();
        assert_eq!(action.thought.as_deref(), Some("  Click the login link "));
    }

    #[test]
    fn operation_serializes_in_model_shape() {
        let op = Operation::SetValue {
            xpath: "//input".into(),
            value: "x".into(),
        };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"name": "setValue", "args": {"xpath": "//input", "value": "x"}})
        );
    }
}
