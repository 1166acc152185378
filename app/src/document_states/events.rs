use crate::events::{EventType, EventTypeEntry};

pub static EVENT_WORKFLOW_CREATED: EventType =
    EventType::new("document_states", "workflow_created", "Workflow created");
pub static EVENT_WORKFLOW_EDITED: EventType =
    EventType::new("document_states", "workflow_edited", "Workflow edited");

inventory::submit!(EventTypeEntry(&EVENT_WORKFLOW_CREATED));
inventory::submit!(EventTypeEntry(&EVENT_WORKFLOW_EDITED));
