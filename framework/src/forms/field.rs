//! Form field descriptors and per-field cleaning

use serde::Serialize;
use serde_json::Value;

use super::FormData;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// An option of a choice field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A selectable database record (id + display label)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: i64,
    pub label: String,
}

impl Record {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Value kind accepted by a field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Char { max_length: Option<usize> },
    Integer { min: Option<i64>, max: Option<i64> },
    Boolean,
    Choice { choices: Vec<Choice> },
    ModelChoice { records: Vec<Record> },
    ModelMultipleChoice { records: Vec<Record> },
}

/// How the front end presents a field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    TextInput,
    Textarea,
    NumberInput,
    CheckboxInput,
    Select,
    SelectMultiple,
    RadioSelect,
    HiddenInput,
    /// Text input rendered with the `readonly` attribute
    ReadOnly,
    Image { src: String, alt: String },
}

/// Value produced by cleaning one field
#[derive(Debug, Clone, PartialEq)]
pub enum Cleaned {
    Value(Value),
    Record(Record),
    Records(Vec<Record>),
}

impl Cleaned {
    /// JSON form of the value; records collapse to their ids
    pub fn into_json(self) -> Value {
        match self {
            Cleaned::Value(value) => value,
            Cleaned::Record(record) => Value::from(record.id),
            Cleaned::Records(records) => {
                Value::Array(records.into_iter().map(|r| Value::from(r.id)).collect())
            }
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cleaned::Value(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cleaned::Value(Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cleaned::Value(value) => value.as_i64(),
            Cleaned::Record(record) => Some(record.id),
            Cleaned::Records(_) => None,
        }
    }
}

/// Descriptor of one form field
///
/// Used both for rendering (serialized into page props) and for cleaning
/// submitted values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub initial: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    pub widget: Widget,
}

impl Field {
    fn build(name: &str, label: &str, kind: FieldKind, widget: Widget) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: true,
            default: None,
            initial: None,
            help_text: None,
            widget,
        }
    }

    pub fn char(name: &str, label: &str) -> Self {
        Self::build(name, label, FieldKind::Char { max_length: None }, Widget::TextInput)
    }

    pub fn integer(name: &str, label: &str) -> Self {
        Self::build(
            name,
            label,
            FieldKind::Integer {
                min: None,
                max: None,
            },
            Widget::NumberInput,
        )
    }

    /// Checkbox; optional unless marked required
    pub fn boolean(name: &str, label: &str) -> Self {
        Self::build(name, label, FieldKind::Boolean, Widget::CheckboxInput).optional()
    }

    pub fn choice(name: &str, label: &str, choices: Vec<Choice>) -> Self {
        Self::build(name, label, FieldKind::Choice { choices }, Widget::Select)
    }

    pub fn model_choice(name: &str, label: &str, records: Vec<Record>) -> Self {
        Self::build(name, label, FieldKind::ModelChoice { records }, Widget::Select)
    }

    pub fn model_multiple_choice(name: &str, label: &str, records: Vec<Record>) -> Self {
        Self::build(
            name,
            label,
            FieldKind::ModelMultipleChoice { records },
            Widget::SelectMultiple,
        )
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(value.into());
        self
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn widget(mut self, widget: Widget) -> Self {
        self.widget = widget;
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        if let FieldKind::Char { max_length } = &mut self.kind {
            *max_length = Some(length);
        }
        self
    }

    pub fn range(mut self, lower: Option<i64>, upper: Option<i64>) -> Self {
        if let FieldKind::Integer { min, max } = &mut self.kind {
            *min = lower;
            *max = upper;
        }
        self
    }

    /// Value shown when the form is first displayed
    pub fn initial_or_default(&self) -> Option<&Value> {
        self.initial.as_ref().or(self.default.as_ref())
    }

    /// Submitted-data encoding of the initial value
    pub fn initial_pairs(&self) -> Vec<(String, String)> {
        let Some(value) = self.initial_or_default() else {
            return Vec::new();
        };
        let encode = |v: &Value| match v {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            Value::Bool(false) => None,
            Value::Bool(true) => Some("on".to_string()),
            other => Some(other.to_string()),
        };
        match value {
            Value::Array(items) => items
                .iter()
                .filter_map(encode)
                .map(|v| (self.name.clone(), v))
                .collect(),
            other => encode(other)
                .map(|v| vec![(self.name.clone(), v)])
                .unwrap_or_default(),
        }
    }

    /// Clean the submitted value(s) of this field
    ///
    /// `Ok(None)` means the field was left empty and is optional.
    pub fn clean(&self, data: &FormData) -> Result<Option<Cleaned>, String> {
        let raw: Vec<&str> = data
            .get_all(&self.name)
            .into_iter()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();

        if let FieldKind::Boolean = self.kind {
            let checked = raw.first().map(|v| !is_falsy(v)).unwrap_or(false);
            if self.required && !checked {
                return Err(REQUIRED_MESSAGE.to_string());
            }
            return Ok(Some(Cleaned::Value(Value::Bool(checked))));
        }

        let Some(first) = raw.first().copied() else {
            return if self.required {
                Err(REQUIRED_MESSAGE.to_string())
            } else {
                Ok(None)
            };
        };

        match &self.kind {
            FieldKind::Char { max_length } => {
                let length = first.chars().count();
                if let Some(max) = max_length {
                    if length > *max {
                        return Err(format!(
                            "Ensure this value has at most {} characters (it has {}).",
                            max, length
                        ));
                    }
                }
                Ok(Some(Cleaned::Value(Value::String(first.to_string()))))
            }
            FieldKind::Integer { min, max } => {
                let number: i64 = first
                    .parse()
                    .map_err(|_| "Enter a whole number.".to_string())?;
                if let Some(min) = min {
                    if number < *min {
                        return Err(format!(
                            "Ensure this value is greater than or equal to {}.",
                            min
                        ));
                    }
                }
                if let Some(max) = max {
                    if number > *max {
                        return Err(format!("Ensure this value is less than or equal to {}.", max));
                    }
                }
                Ok(Some(Cleaned::Value(Value::from(number))))
            }
            FieldKind::Choice { choices } => {
                if choices.iter().any(|c| c.value == first) {
                    Ok(Some(Cleaned::Value(Value::String(first.to_string()))))
                } else {
                    Err(format!(
                        "Select a valid choice. {} is not one of the available choices.",
                        first
                    ))
                }
            }
            FieldKind::ModelChoice { records } => first
                .parse::<i64>()
                .ok()
                .and_then(|id| records.iter().find(|r| r.id == id))
                .map(|record| Some(Cleaned::Record(record.clone())))
                .ok_or_else(|| INVALID_CHOICE_MESSAGE.to_string()),
            FieldKind::ModelMultipleChoice { records } => {
                let mut selected: Vec<Record> = Vec::with_capacity(raw.len());
                for value in raw {
                    let id: i64 = value
                        .parse()
                        .map_err(|_| format!("\"{}\" is not a valid value.", value))?;
                    let record = records.iter().find(|r| r.id == id).ok_or_else(|| {
                        format!(
                            "Select a valid choice. {} is not one of the available choices.",
                            value
                        )
                    })?;
                    if !selected.iter().any(|r| r.id == id) {
                        selected.push(record.clone());
                    }
                }
                Ok(Some(Cleaned::Records(selected)))
            }
            FieldKind::Boolean => unreachable!("boolean fields return early"),
        }
    }
}

/// Checkbox values that mean "unchecked"
pub fn is_falsy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "false" | "0" | "off" | "no"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tags() -> Field {
        Field::model_multiple_choice(
            "tags",
            "Tags",
            vec![Record::new(1, "urgent"), Record::new(2, "invoice"), Record::new(3, "hr")],
        )
    }

    #[test]
    fn required_char_rejects_blank() {
        let field = Field::char("label", "Label");
        let data = FormData::from_pairs([("label", "   ")]);
        assert_eq!(field.clean(&data), Err(REQUIRED_MESSAGE.to_string()));
    }

    #[test]
    fn optional_field_left_empty_is_absent() {
        let field = Field::integer("priority", "Priority").optional();
        assert_eq!(field.clean(&FormData::new()), Ok(None));
    }

    #[test]
    fn integer_range_is_enforced() {
        let field = Field::integer("completion", "Completion").range(Some(0), Some(100));
        let data = FormData::from_pairs([("completion", "101")]);
        assert_eq!(
            field.clean(&data),
            Err("Ensure this value is less than or equal to 100.".to_string())
        );
        let data = FormData::from_pairs([("completion", "x")]);
        assert_eq!(field.clean(&data), Err("Enter a whole number.".to_string()));
    }

    #[test]
    fn multiple_choice_keeps_submission_order_and_dedupes() {
        let data = FormData::from_pairs([("tags", "2"), ("tags", "1"), ("tags", "2")]);
        let cleaned = tags().clean(&data).unwrap().unwrap();
        assert_eq!(cleaned.into_json(), serde_json::json!([2, 1]));
    }

    #[test]
    fn multiple_choice_rejects_unknown_record() {
        let data = FormData::from_pairs([("tags", "9")]);
        assert!(tags().clean(&data).is_err());
    }

    #[test]
    fn unchecked_boolean_is_false() {
        let field = Field::boolean("enabled", "Enabled");
        assert_eq!(
            field.clean(&FormData::new()),
            Ok(Some(Cleaned::Value(Value::Bool(false))))
        );
        let data = FormData::from_pairs([("enabled", "on")]);
        assert_eq!(field.clean(&data).unwrap().unwrap().as_bool(), Some(true));
    }

    #[test]
    fn initial_pairs_expand_arrays() {
        let field = tags().initial(serde_json::json!([1, 3]));
        assert_eq!(
            field.initial_pairs(),
            vec![
                ("tags".to_string(), "1".to_string()),
                ("tags".to_string(), "3".to_string())
            ]
        );
    }
}
