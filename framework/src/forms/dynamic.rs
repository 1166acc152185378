//! Forms whose field set is only known at runtime
//!
//! A [`DynamicForm`] is built from a list of [`Field`] descriptors, for
//! example the schema an action type registers. Cleaning runs every field
//! and collects per-field errors; [`DynamicForm::consolidate`] folds a
//! schema's cleaned values into a single JSON object.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::field::{Cleaned, Field, REQUIRED_MESSAGE};
use super::FormData;
use crate::error::ValidationErrors;

/// Cleaned values keyed by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedData {
    values: HashMap<String, Cleaned>,
}

impl CleanedData {
    pub fn get(&self, name: &str) -> Option<&Cleaned> {
        self.values.get(name)
    }

    /// Remove and return a value
    pub fn take(&mut self, name: &str) -> Option<Cleaned> {
        self.values.remove(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Cleaned) {
        self.values.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Cleaned::as_str)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Cleaned::as_bool)
    }

    pub fn i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Cleaned::as_i64)
    }
}

/// A form over an ordered list of field descriptors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicForm {
    fields: Vec<Field>,
}

impl DynamicForm {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Set a field's initial value; `false` when no such field exists
    pub fn set_initial(&mut self, name: &str, value: Value) -> bool {
        match self.field_mut(name) {
            Some(field) => {
                field.initial = Some(value);
                true
            }
            None => false,
        }
    }

    /// Submitted-data encoding of every field's initial value
    pub fn initial_data(&self) -> FormData {
        self.fields.iter().flat_map(Field::initial_pairs).collect()
    }

    /// Clean every field, collecting all errors
    pub fn clean(&self, data: &FormData) -> Result<CleanedData, ValidationErrors> {
        let mut cleaned = CleanedData::default();
        let mut errors = ValidationErrors::new();

        for field in &self.fields {
            match field.clean(data) {
                Ok(Some(value)) => cleaned.insert(field.name.clone(), value),
                Ok(None) => {}
                Err(message) => errors.add(field.name.clone(), message),
            }
        }

        if errors.is_empty() {
            Ok(cleaned)
        } else {
            Err(errors)
        }
    }

    /// Fold the values of `schema` out of `cleaned` into one JSON object
    ///
    /// Iterates the schema, not the submitted data, so only declared keys
    /// end up in the object, in schema order. For each field:
    /// - a cleaned value is taken (record selections collapse to ids);
    /// - otherwise the declared default is used;
    /// - otherwise a required field is an error and an optional one is `null`.
    pub fn consolidate(
        schema: &[Field],
        cleaned: &mut CleanedData,
    ) -> Result<Map<String, Value>, ValidationErrors> {
        let mut object = Map::new();
        let mut errors = ValidationErrors::new();

        for field in schema {
            let value = match cleaned.take(&field.name) {
                Some(value) => value.into_json(),
                None => match (&field.default, field.required) {
                    (Some(default), _) => default.clone(),
                    (None, true) => {
                        errors.add(field.name.clone(), REQUIRED_MESSAGE);
                        continue;
                    }
                    (None, false) => Value::Null,
                },
            };
            object.insert(field.name.clone(), value);
        }

        if errors.is_empty() {
            Ok(object)
        } else {
            Err(errors)
        }
    }

    /// Field descriptors for page props
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.fields).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::Record;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> Vec<Field> {
        vec![
            Field::model_multiple_choice(
                "tags",
                "Tags",
                vec![Record::new(1, "a"), Record::new(2, "b")],
            ),
            Field::integer("priority", "Priority")
                .optional()
                .default_value(0),
        ]
    }

    #[test]
    fn missing_value_falls_back_to_default() {
        let form = DynamicForm::new(schema());
        let data = FormData::from_pairs([("tags", "1"), ("tags", "2")]);
        let mut cleaned = form.clean(&data).unwrap();
        let object = DynamicForm::consolidate(form.fields(), &mut cleaned).unwrap();
        assert_eq!(
            serde_json::to_string(&object).unwrap(),
            r#"{"tags":[1,2],"priority":0}"#
        );
    }

    #[test]
    fn undeclared_keys_are_pruned() {
        let form = DynamicForm::new(schema());
        let data = FormData::from_pairs([("tags", "2"), ("obsolete", "x")]);
        let mut cleaned = form.clean(&data).unwrap();
        cleaned.insert("obsolete", Cleaned::Value(json!("x")));
        let object = DynamicForm::consolidate(form.fields(), &mut cleaned).unwrap();
        assert!(!object.contains_key("obsolete"));
        assert_eq!(object.len(), 2);
    }

    #[test]
    fn optional_without_default_is_null() {
        let fields = vec![Field::char("note", "Note").optional()];
        let mut cleaned = CleanedData::default();
        let object = DynamicForm::consolidate(&fields, &mut cleaned).unwrap();
        assert_eq!(object.get("note"), Some(&Value::Null));
    }

    #[test]
    fn required_without_value_or_default_is_an_error() {
        let fields = vec![Field::char("url", "URL")];
        let mut cleaned = CleanedData::default();
        let errors = DynamicForm::consolidate(&fields, &mut cleaned).unwrap_err();
        assert_eq!(errors.get("url"), Some(&[REQUIRED_MESSAGE.to_string()][..]));
    }

    #[test]
    fn clean_reports_every_failing_field() {
        let form = DynamicForm::new(vec![
            Field::char("label", "Label"),
            Field::integer("count", "Count"),
        ]);
        let data = FormData::from_pairs([("count", "many")]);
        let errors = form.clean(&data).unwrap_err();
        assert!(errors.has("label"));
        assert!(errors.has("count"));
    }

    #[test]
    fn initial_data_round_trips_through_clean() {
        let mut form = DynamicForm::new(schema());
        form.set_initial("tags", json!([2, 1]));
        form.set_initial("priority", json!(7));
        let mut cleaned = form.clean(&form.initial_data()).unwrap();
        let object = DynamicForm::consolidate(form.fields(), &mut cleaned).unwrap();
        assert_eq!(Value::Object(object), json!({"tags": [2, 1], "priority": 7}));
    }
}
