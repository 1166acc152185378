//! Graphviz rendering of a workflow
//!
//! States become nodes, the initial state drawn as a double circle;
//! transitions become edges labelled with the transition label.

use std::fmt::Write;

use crate::models::{workflow_states, workflow_transitions, workflows};

/// Content type of [`render_dot`] output
pub const DOT_CONTENT_TYPE: &str = "text/vnd.graphviz; charset=utf-8";

pub fn render_dot(
    workflow: &workflows::Model,
    states: &[workflow_states::Model],
    transitions: &[workflow_transitions::Model],
) -> String {
    let mut dot = String::new();
    let _ = writeln!(dot, "digraph \"{}\" {{", escape(&workflow.internal_name));
    let _ = writeln!(dot, "  rankdir=LR;");
    let _ = writeln!(dot, "  node [shape=circle];");

    for state in states {
        let shape = if state.initial { ", shape=doublecircle" } else { "" };
        let _ = writeln!(
            dot,
            "  \"state_{}\" [label=\"{}\"{}];",
            state.id,
            escape(&state.label),
            shape
        );
    }

    for transition in transitions {
        let _ = writeln!(
            dot,
            "  \"state_{}\" -> \"state_{}\" [label=\"{}\"];",
            transition.origin_state_id,
            transition.destination_state_id,
            escape(&transition.label)
        );
    }

    dot.push_str("}\n");
    dot
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state(id: i64, label: &str, initial: bool) -> workflow_states::Model {
        workflow_states::Model {
            id,
            workflow_id: 1,
            label: label.to_string(),
            initial,
            completion: 0,
        }
    }

    #[test]
    fn renders_states_and_transitions() {
        let workflow = workflows::Model {
            id: 1,
            label: "Invoices".to_string(),
            internal_name: "invoices".to_string(),
        };
        let states = vec![state(1, "Draft", true), state(2, "Paid \"in full\"", false)];
        let transitions = vec![workflow_transitions::Model {
            id: 7,
            workflow_id: 1,
            label: "Pay".to_string(),
            origin_state_id: 1,
            destination_state_id: 2,
        }];

        assert_eq!(
            render_dot(&workflow, &states, &transitions),
            "digraph \"invoices\" {\n  rankdir=LR;\n  node [shape=circle];\n  \"state_1\" [label=\"Draft\", shape=doublecircle];\n  \"state_2\" [label=\"Paid \\\"in full\\\"\"];\n  \"state_1\" -> \"state_2\" [label=\"Pay\"];\n}\n"
        );
    }
}
