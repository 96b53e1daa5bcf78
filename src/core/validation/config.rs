//! Per-entity validation configuration
//!
//! An [`EntityValidationConfig`] lists, per wire field, the validators that
//! must pass. Validation runs on the raw JSON object so that a missing field
//! and a malformed field are reported together.

use super::validators::FieldValidator;
use crate::core::error::FieldValidationError;
use serde_json::{Map, Value};

/// Operation a payload is validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}

/// Validation rules for one entity and one operation
pub struct EntityValidationConfig {
    entity_type: &'static str,
    rules: Vec<(String, Vec<FieldValidator>)>,
    aliases: Vec<(String, String)>,
    stripped: Vec<String>,
}

impl EntityValidationConfig {
    pub fn new(entity_type: &'static str) -> Self {
        Self {
            entity_type,
            rules: Vec::new(),
            aliases: Vec::new(),
            stripped: Vec::new(),
        }
    }

    pub fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    /// Attach a validator to a field; fields are checked in registration order
    pub fn add_validator<F>(&mut self, field: &str, validator: F)
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        match self.rules.iter_mut().find(|(name, _)| name == field) {
            Some((_, validators)) => validators.push(Box::new(validator)),
            None => self
                .rules
                .push((field.to_string(), vec![Box::new(validator)])),
        }
    }

    /// Accept `alias` as an alternative spelling of `field`
    pub fn add_alias(&mut self, alias: &str, field: &str) {
        self.aliases.push((alias.to_string(), field.to_string()));
    }

    /// Remove `field` from the payload before validation and deserialization
    pub fn strip(&mut self, field: &str) {
        self.stripped.push(field.to_string());
    }

    /// Normalize the payload and run every validator
    ///
    /// Returns the normalized payload, or one error per violated field.
    pub fn validate_and_filter(&self, payload: Value) -> Result<Value, Vec<FieldValidationError>> {
        let Value::Object(mut obj) = payload else {
            return Err(vec![FieldValidationError::new(
                self.entity_type,
                "The request body must be a JSON object.",
            )]);
        };

        self.apply_aliases(&mut obj);
        for field in &self.stripped {
            obj.remove(field);
        }

        let errors: Vec<FieldValidationError> = self
            .rules
            .iter()
            .filter_map(|(field, validators)| {
                let value = obj.get(field).unwrap_or(&Value::Null);
                validators
                    .iter()
                    .find_map(|validate| validate(field, value).err())
                    .map(|message| FieldValidationError::new(field.clone(), message))
            })
            .collect();

        if errors.is_empty() {
            Ok(Value::Object(obj))
        } else {
            Err(errors)
        }
    }

    fn apply_aliases(&self, obj: &mut Map<String, Value>) {
        for (alias, field) in &self.aliases {
            if obj.contains_key(field) {
                continue;
            }
            if let Some(value) = obj.remove(alias) {
                obj.insert(field.clone(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::validators::*;
    use serde_json::json;

    fn config() -> EntityValidationConfig {
        let mut config = EntityValidationConfig::new("product");
        config.add_alias("name", "productName");
        config.strip("productId");
        config.add_validator("productName", required());
        config.add_validator("productName", string_length(1, 100));
        config.add_validator("price", required());
        config.add_validator("price", money());
        config.add_validator("price", non_negative());
        config
    }

    #[test]
    fn test_reports_every_violated_field() {
        let errors = config()
            .validate_and_filter(json!({ "price": -1 }))
            .unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["productName", "price"]);
    }

    #[test]
    fn test_one_error_per_field() {
        let errors = config()
            .validate_and_filter(json!({ "productName": "Croissant", "price": "abc" }))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("decimal"));
    }

    #[test]
    fn test_alias_is_renamed() {
        let value = config()
            .validate_and_filter(json!({ "name": "Croissant", "price": 3.5 }))
            .unwrap();
        assert_eq!(value["productName"], "Croissant");
        assert!(value.get("name").is_none());
    }

    #[test]
    fn test_stripped_fields_are_removed() {
        let value = config()
            .validate_and_filter(json!({ "productId": 77, "productName": "Baguette", "price": 1 }))
            .unwrap();
        assert!(value.get("productId").is_none());
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        let errors = config().validate_and_filter(json!([1, 2])).unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
