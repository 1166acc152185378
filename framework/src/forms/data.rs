//! Multi-valued submitted form data

/// Submitted field values in submission order
///
/// A field may appear several times (`tags=1&tags=2`). Formsets address
/// their forms through prefixed keys (`form-0-relationship`), see
/// [`FormData::subset`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` body
    ///
    /// Malformed input yields an empty set; validation then reports the
    /// missing fields.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(bytes).unwrap_or_default();
        Self { pairs }
    }

    pub fn from_query(query: &str) -> Self {
        Self::from_bytes(query.as_bytes())
    }

    /// Flatten a JSON object: arrays become repeated values, nulls are dropped
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut data = Self::new();
        if let Some(object) = value.as_object() {
            for (key, value) in object {
                match value {
                    serde_json::Value::Array(items) => {
                        for item in items {
                            if let Some(text) = scalar_text(item) {
                                data.append(key.clone(), text);
                            }
                        }
                    }
                    other => {
                        if let Some(text) = scalar_text(other) {
                            data.append(key.clone(), text);
                        }
                    }
                }
            }
        }
        data
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Replace every value of `key` with a single value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.pairs.retain(|(k, _)| *k != key);
        self.pairs.push((key, value.into()));
    }

    pub fn extend(&mut self, other: FormData) {
        self.pairs.extend(other.pairs);
    }

    /// First value submitted for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted for `key`, in order
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Values whose key starts with `{prefix}-`, with the prefix stripped
    pub fn subset(&self, prefix: &str) -> FormData {
        let lead = format!("{}-", prefix);
        FormData {
            pairs: self
                .pairs
                .iter()
                .filter_map(|(k, v)| {
                    k.strip_prefix(&lead)
                        .map(|rest| (rest.to_string(), v.clone()))
                })
                .collect(),
        }
    }

    /// The same values with every key prefixed by `{prefix}-`
    pub fn prefixed(&self, prefix: &str) -> FormData {
        FormData {
            pairs: self
                .pairs
                .iter()
                .map(|(k, v)| (format!("{}-{}", prefix, k), v.clone()))
                .collect(),
        }
    }

    pub fn to_urlencoded(&self) -> String {
        serde_urlencoded::to_string(&self.pairs).unwrap_or_default()
    }
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn subset_strips_prefix_and_skips_other_forms() {
        let data = FormData::from_query(
            "form-TOTAL_FORMS=2&form-0-relationship=yes&form-1-relationship=no&form-10-relationship=x",
        );
        let first = data.subset("form-0");
        assert_eq!(first.get("relationship"), Some("yes"));
        assert_eq!(first.get_all("relationship").len(), 1);
        assert_eq!(data.subset("form-1").get("relationship"), Some("no"));
    }

    #[test]
    fn from_json_flattens_arrays() {
        let data = FormData::from_json(&serde_json::json!({
            "tags": [1, 2],
            "priority": 3,
            "note": null,
        }));
        assert_eq!(data.get_all("tags"), vec!["1", "2"]);
        assert_eq!(data.get("priority"), Some("3"));
        assert!(!data.contains("note"));
    }

    #[test]
    fn set_replaces_previous_values() {
        let mut data = FormData::from_pairs([("a", "1"), ("a", "2")]);
        data.set("a", "3");
        assert_eq!(data.get_all("a"), vec!["3"]);
        assert_eq!(data.to_urlencoded(), "a=3");
    }
}
