//! Minimal `{{ name }}` templates
//!
//! Placeholders are looked up in a JSON object context, dotted paths
//! descend into nested objects. Strings render without quotes, other
//! values as JSON, missing keys as nothing. Output is HTML-escaped.

use serde_json::Value;

pub fn render_template(source: &str, context: &Value) -> String {
    let mut output = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                output.push_str(&super::escape_html(&lookup(context, key)));
                rest = &after[end + 2..];
            }
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}

fn lookup(context: &Value, key: &str) -> String {
    let value = key
        .split('.')
        .try_fold(context, |value, part| value.get(part));
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_and_escapes() {
        let context = json!({"object": "<Review>", "workflow": {"label": "Billing"}});
        assert_eq!(
            render_template("{{ object }} / {{workflow.label}}", &context),
            "&lt;Review&gt; / Billing"
        );
    }

    #[test]
    fn missing_keys_render_empty() {
        assert_eq!(render_template("[{{ nope }}]", &json!({})), "[]");
        assert_eq!(render_template("{{ open", &json!({})), "{{ open");
    }
}
