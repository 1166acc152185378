use kit::forms::{Field, Widget};
use serde_json::Value;

use crate::models::workflows;

/// Read-only form showing the workflow's generated image
#[derive(Debug, Clone)]
pub struct WorkflowPreviewForm {
    field: Field,
}

impl WorkflowPreviewForm {
    /// `image_url` is the workflow image route of `workflow`
    pub fn new(workflow: &workflows::Model, image_url: impl Into<String>) -> Self {
        Self {
            field: Field::char("preview", "")
                .optional()
                .widget(Widget::Image {
                    src: image_url.into(),
                    alt: workflow.label.clone(),
                })
                .initial(workflow.id),
        }
    }

    pub fn fields(&self) -> Vec<Field> {
        vec![self.field.clone()]
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self.fields()).unwrap_or(Value::Null)
    }

    /// Markup of the image widget
    pub fn render(&self) -> String {
        match &self.field.widget {
            Widget::Image { src, alt } => format!(
                "<img class=\"workflow-image\" src=\"{}\" alt=\"{}\">",
                escape_attribute(src),
                escape_attribute(alt)
            ),
            _ => String::new(),
        }
    }
}

fn escape_attribute(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_points_at_the_image_route() {
        let workflow = workflows::Model {
            id: 4,
            label: "Review & approve".to_string(),
            internal_name: "review".to_string(),
        };
        let form = WorkflowPreviewForm::new(&workflow, "/workflows/templates/4/image/");
        assert_eq!(
            form.render(),
            "<img class=\"workflow-image\" src=\"/workflows/templates/4/image/\" alt=\"Review &amp; approve\">"
        );
        assert_eq!(form.fields()[0].initial, Some(serde_json::json!(4)));
    }
}
