//! Rules and programs, as owned by the editor document.

use crate::block::{Block, BlockKind};

/// Most action cards a single rule row can hold.
pub const MAX_ACTIONS: usize = 4;

/// One visual row: event, optional state filter, actions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    event: Block,
    #[cfg_attr(feature = "serde", serde(default))]
    state_filter: Option<Block>,
    #[cfg_attr(feature = "serde", serde(default))]
    actions: Vec<Block>,
    /// Reads or writes persistent state.
    #[cfg_attr(feature = "serde", serde(default))]
    is_advanced: bool,
}

impl Rule {
    pub fn new(event: Block) -> Self {
        Self {
            event,
            state_filter: None,
            actions: Vec::new(),
            is_advanced: false,
        }
    }

    /// Attach a state filter. Only advanced rows carry one.
    pub fn with_state_filter(mut self, state_filter: Block) -> Self {
        self.state_filter = Some(state_filter);
        self.is_advanced = true;
        self
    }

    pub fn with_action(mut self, action: Block) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Block>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn with_advanced(mut self, is_advanced: bool) -> Self {
        self.is_advanced = is_advanced;
        self
    }

    pub fn event(&self) -> &Block {
        &self.event
    }

    pub fn state_filter(&self) -> Option<&Block> {
        self.state_filter.as_ref()
    }

    pub fn actions(&self) -> &[Block] {
        &self.actions
    }

    pub fn is_advanced(&self) -> bool {
        self.is_advanced
    }

    /// Whether switching the document back to basic mode would lose
    /// something: a constraining state filter or a state write.
    pub fn is_any_advanced_feature(&self) -> bool {
        let filter_used = self
            .state_filter
            .as_ref()
            .is_some_and(Block::has_non_default_value);
        let state_written = self.actions.iter().any(|action| {
            action.known_kind() == Some(BlockKind::SetState) && action.has_non_default_value()
        });
        filter_used || state_written
    }
}

/// Rules in top-to-bottom visual order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    #[cfg_attr(feature = "serde", serde(default))]
    rules: Vec<Rule>,
    #[cfg_attr(feature = "serde", serde(default))]
    advanced_mode: bool,
}

impl Program {
    pub fn new(advanced_mode: bool) -> Self {
        Self {
            rules: Vec::new(),
            advanced_mode,
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn advanced_mode(&self) -> bool {
        self.advanced_mode
    }

    pub fn set_advanced_mode(&mut self, advanced_mode: bool) {
        self.advanced_mode = advanced_mode;
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_any_advanced_feature(&self) -> bool {
        self.rules.iter().any(Rule::is_any_advanced_feature)
    }
}

impl FromIterator<Rule> for Program {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
            advanced_mode: false,
        }
    }
}
