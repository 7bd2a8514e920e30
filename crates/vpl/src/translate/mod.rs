//! Rule translators: typed blocks to script text.
//!
//! Event and state-filter blocks become boolean tests, action blocks become
//! statements. Everything here is a pure function of its arguments; the
//! indentation of a rule's actions is decided once per rule and passed down.

mod action;
mod event;

pub use action::action_code;
pub use event::{event_test, pre_test, state_filter_conjunction, state_filter_test};

use crate::kinds::{ActionBlock, EventBlock, StateFilter};

/// Indentation of an action statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// Directly in the event handler.
    Handler,
    /// Inside the rule's `if ... then` branch.
    Branch,
}

impl Indent {
    pub fn as_str(self) -> &'static str {
        match self {
            Indent::Handler => "\t",
            Indent::Branch => "\t\t",
        }
    }
}

/// Generated code of one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub text: String,
    /// Wrapped in `if ... then` / `end`.
    pub conditional: bool,
}

/// Translate a whole rule: optional pre-test, optional `if`, actions, `end`.
pub fn rule_branch(event: &EventBlock, state_filter: Option<&StateFilter>, actions: &[ActionBlock]) -> Branch {
    let mut text = String::new();

    let test = if event.is_any_value_set() {
        if let Some(pre) = pre_test(event) {
            text.push_str(&pre);
        }
        let mut test = event_test(event);
        if let Some(filter) = state_filter {
            test.push_str(&state_filter_conjunction(filter));
        }
        Some(test)
    } else {
        state_filter
            .filter(|filter| filter.is_any_value_set())
            .map(state_filter_test)
    };

    let conditional = test.is_some();
    if let Some(test) = test {
        text.push_str("\tif ");
        text.push_str(&test);
        text.push_str(" then\n");
    }

    let indent = if conditional { Indent::Branch } else { Indent::Handler };
    for action in actions {
        text.push_str(&action_code(action, indent));
    }

    if conditional {
        text.push_str("\tend\n");
    }
    Branch { text, conditional }
}
