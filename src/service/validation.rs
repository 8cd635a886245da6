//! Request body validation against per-field rules.

use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
    Uuid,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub required: bool,
    /// Measure lengths and formats on the trimmed value. Off for secrets stored verbatim.
    pub trim: bool,
    /// Counted in characters.
    pub min_length: Option<usize>,
    pub format: Option<Format>,
}

impl FieldRule {
    pub const fn required(field: &'static str) -> Self {
        FieldRule {
            field,
            required: true,
            trim: true,
            min_length: None,
            format: None,
        }
    }

    pub const fn raw(self) -> Self {
        FieldRule { trim: false, ..self }
    }

    pub const fn min_length(self, n: usize) -> Self {
        FieldRule {
            min_length: Some(n),
            ..self
        }
    }

    pub const fn format(self, format: Format) -> Self {
        FieldRule {
            format: Some(format),
            ..self
        }
    }
}

pub const CREATE_PLACE_RULES: &[FieldRule] = &[
    FieldRule::required("title"),
    FieldRule::required("description").min_length(5),
    FieldRule::required("address"),
    FieldRule::required("creator").format(Format::Uuid),
];

pub const UPDATE_PLACE_RULES: &[FieldRule] = &[
    FieldRule::required("title"),
    FieldRule::required("description").min_length(5),
];

pub const SIGNUP_RULES: &[FieldRule] = &[
    FieldRule::required("name"),
    FieldRule::required("email").format(Format::Email),
    FieldRule::required("password").raw().min_length(6),
];

pub const LOGIN_RULES: &[FieldRule] = &[FieldRule::required("email"), FieldRule::required("password")];

pub struct RequestValidator;

impl RequestValidator {
    /// Check every rule and report all failing fields at once. `message` is the client-facing text.
    pub fn validate(
        body: &Map<String, Value>,
        rules: &[FieldRule],
        message: &'static str,
    ) -> Result<(), AppError> {
        let fields: Vec<String> = rules.iter().filter_map(|rule| check(body.get(rule.field), rule)).collect();
        if fields.is_empty() {
            Ok(())
        } else {
            tracing::debug!(?fields, "request rejected");
            Err(AppError::Validation { message, fields })
        }
    }
}

/// Turn a JSON body into an object map or fail validation.
pub fn body_to_map(value: Value, message: &'static str) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::Validation {
            message,
            fields: vec!["body must be a JSON object".into()],
        }),
    }
}

/// Trimmed string value of a field that passed validation.
pub fn text(body: &Map<String, Value>, field: &str) -> String {
    body.get(field).and_then(Value::as_str).map(str::trim).unwrap_or_default().to_string()
}

fn check(value: Option<&Value>, rule: &FieldRule) -> Option<String> {
    let col = rule.field;
    let s = match value {
        None | Some(Value::Null) => {
            return rule.required.then(|| format!("{} is required", col));
        }
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Some(format!("{} must be a string", col)),
    };
    if rule.required && s.trim().is_empty() {
        return Some(format!("{} must not be empty", col));
    }
    let s = if rule.trim { s.trim() } else { s };
    let len = s.chars().count();
    if let Some(min) = rule.min_length {
        if len < min {
            return Some(format!("{} must be at least {} characters", col, min));
        }
    }
    match rule.format {
        Some(Format::Email) if !is_email(s) => Some(format!("{} must be a valid email", col)),
        Some(Format::Uuid) if uuid::Uuid::parse_str(s).is_err() => Some(format!("{} must be a valid id", col)),
        _ => None,
    }
}

fn is_email(s: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .map(|re| re.is_match(s))
        .unwrap_or(false)
}
