//! Reusable field validators
//!
//! Each validator receives the field name and its raw JSON value (`Null` when
//! the field is absent). Validators other than [`required`] let `Null` through
//! so optional fields are only checked when present.

use crate::core::{datetime, money};
use serde_json::Value;
use validator::ValidateEmail;

/// Boxed form stored by [`EntityValidationConfig`](super::EntityValidationConfig)
pub type FieldValidator = Box<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Validator: field is required (present and not null)
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Err(format!("The {} field is required.", field)),
        Value::String(s) if s.trim().is_empty() => {
            Err(format!("The {} field is required.", field))
        }
        _ => Ok(()),
    }
}

/// Validator: value must be a JSON string
pub fn string() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null | Value::String(_) => Ok(()),
        _ => Err(format!("The {} field must be a string.", field)),
    }
}

/// Validator: string length (in characters) must be within range
pub fn string_length(
    min: usize,
    max: usize,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            let len = s.chars().count();
            if len < min {
                Err(format!(
                    "The field {} must be at least {} characters long.",
                    field, min
                ))
            } else if len > max {
                Err(format!(
                    "The field {} must be a string with a maximum length of {}.",
                    field, max
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be a whole number that fits in 32 bits
pub fn integer() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::Number(n) if n.as_i64().is_some_and(|v| i32::try_from(v).is_ok()) => Ok(()),
        _ => Err(format!("The {} field must be an integer.", field)),
    }
}

/// Validator: integer must be at least `min`
pub fn min_value(min: i64) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(num) = value.as_i64() {
            if num < min {
                Err(format!(
                    "The field {} must be greater than or equal to {}.",
                    field, min
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: value must be a JSON boolean
pub fn boolean() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null | Value::Bool(_) => Ok(()),
        _ => Err(format!("The {} field must be true or false.", field)),
    }
}

/// Validator: value must be a currency amount (number or numeric string)
/// that fits ten digits with two decimals
pub fn money() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_null() {
            return Ok(());
        }
        match money::from_json(value) {
            Some(amount) if money::in_range(amount) => Ok(()),
            Some(_) => Err(format!(
                "The field {} must be between -{max} and {max}.",
                field,
                max = money::MAX_AMOUNT
            )),
            None => Err(format!("The {} field must be a decimal amount.", field)),
        }
    }
}

/// Validator: currency amount must not be negative
pub fn non_negative() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match money::from_json(value) {
        Some(amount) if money::normalize(amount).is_sign_negative() => Err(format!(
            "The field {} must be greater than or equal to 0.",
            field
        )),
        _ => Ok(()),
    }
}

/// Validator: value must be in allowed list
pub fn in_list(
    allowed: Vec<String>,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if !allowed.iter().any(|a| a == s) {
                Err(format!(
                    "The {} field must be one of: {}.",
                    field,
                    allowed.join(", ")
                ))
            } else {
                Ok(())
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string must be a syntactically valid email address
pub fn email() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if let Some(s) = value.as_str() {
            if s.validate_email() {
                Ok(())
            } else {
                Err(format!("The {} field is not a valid e-mail address.", field))
            }
        } else {
            Ok(())
        }
    }
}

/// Validator: string must be a calendar date or date-time
pub fn date() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value {
        Value::Null => Ok(()),
        Value::String(s) if datetime::parse(s).is_some() => Ok(()),
        _ => Err(format!(
            "The {} field must be a date (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS).",
            field
        )),
    }
}
