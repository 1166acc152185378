//! Workflow definitions: states, transitions, state actions and instances

pub mod actions;
pub mod events;
pub mod forms;
pub mod permissions;
pub mod preview;

use kit::forms::Choice;

/// Moment of a state's life an action runs at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionWhen {
    OnEntry = 1,
    OnExit = 2,
}

impl ActionWhen {
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::OnEntry),
            2 => Some(Self::OnExit),
            _ => None,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OnEntry => "On entry",
            Self::OnExit => "On exit",
        }
    }

    pub fn choices() -> Vec<Choice> {
        [Self::OnEntry, Self::OnExit]
            .into_iter()
            .map(|when| Choice::new(when.as_i32().to_string(), when.label()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_round_trips_through_its_code() {
        assert_eq!(ActionWhen::from_i32(ActionWhen::OnExit.as_i32()), Some(ActionWhen::OnExit));
        assert_eq!(ActionWhen::from_i32(3), None);
        assert_eq!(ActionWhen::choices()[0].value, "1");
    }
}
