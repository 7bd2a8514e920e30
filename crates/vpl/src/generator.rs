//! The code generator: merges rules into event handlers.
//!
//! Rules are visited in visual order. The first rule reacting to an event
//! opens that event's handler (its bucket); later rules for the same bucket
//! are inserted into it, so the output holds exactly one handler per event.
//!
//! Inside a handler, branches run top to bottom and later assignments win.
//! An unconditional rule added after conditional ones is therefore placed
//! before the first conditional branch of its bucket, letting every specific
//! case keep overriding the default.

use log::{debug, trace};

use crate::bucket::EventBucket;
use crate::error::{CompileError, InternalError};
use crate::features::Features;
use crate::kinds::{ActionBlock, EventBlock, StateFilter};
use crate::preamble;
use crate::program::{MAX_ACTIONS, Rule};
use crate::segment::{BucketSpan, Segment, SegmentArena, SegmentRole};
use crate::translate;

/// A rule with every block resolved to its typed variant.
#[derive(Debug, Clone)]
struct ResolvedRule {
    event: EventBlock,
    state_filter: Option<StateFilter>,
    actions: Vec<ActionBlock>,
    is_advanced: bool,
}

impl ResolvedRule {
    fn resolve(rule: &Rule, advanced_mode: bool) -> Result<Self, InternalError> {
        if rule.actions().len() > MAX_ACTIONS {
            return Err(InternalError::TooManyActions {
                count: rule.actions().len(),
                max: MAX_ACTIONS,
            });
        }
        let event = EventBlock::try_from(rule.event())?;
        let state_filter = rule.state_filter().map(StateFilter::try_from).transpose()?;
        let actions = rule
            .actions()
            .iter()
            .map(ActionBlock::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        // Basic programs declare neither `state` nor `display_state`.
        let uses_state = rule.is_advanced()
            || state_filter.is_some()
            || actions.iter().any(|action| matches!(action, ActionBlock::SetState(_)));
        if uses_state && !advanced_mode {
            return Err(InternalError::StateInBasicMode);
        }
        Ok(Self {
            event,
            state_filter,
            actions,
            is_advanced: rule.is_advanced(),
        })
    }
}

/// Generator state for one compile.
///
/// Consumed by [`CodeGenerator::generate`], so every compile starts from an
/// empty arena and cleared feature flags.
#[derive(Debug)]
pub struct CodeGenerator {
    advanced_mode: bool,
    arena: SegmentArena,
    features: Features,
}

impl CodeGenerator {
    pub fn new(advanced_mode: bool) -> Self {
        Self {
            advanced_mode,
            arena: SegmentArena::new(),
            features: Features::default(),
        }
    }

    pub fn generate(mut self, rules: &[Rule]) -> Result<CompiledProgram, CompileError> {
        // Resolve everything up front: a malformed block must not leave
        // half a program behind.
        let resolved = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                ResolvedRule::resolve(rule, self.advanced_mode).map_err(|error| CompileError::internal(index, error))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (index, rule) in resolved.iter().enumerate() {
            self.visit(index, rule);
        }

        trace!("handlers: {:?}", self.arena.buckets_in_order());
        let features = self.features;
        let (mut segments, rule_to_segment) = self.arena.into_parts();
        if let Some(first) = segments.first_mut() {
            first.insert_str(0, &preamble::initialisation_code(self.advanced_mode, features));
        }
        debug!(
            "compiled {} rules into {} segments (features: {features:?})",
            rule_to_segment.len(),
            segments.len()
        );

        Ok(CompiledProgram {
            segments,
            rule_to_segment,
            features,
        })
    }

    fn visit(&mut self, index: usize, rule: &ResolvedRule) {
        let bucket = rule.event.bucket();
        let at = match self.arena.bucket(bucket) {
            None => self.open_bucket(bucket, rule.is_advanced),
            Some(span) => self.extension_point(bucket, span, rule),
        };

        let position = self.arena.insert(at, Segment::empty_branch());
        let bound = self.arena.bind_rule(position);
        debug_assert_eq!(bound, index);
        trace!("rule {index} placed at segment {position} of `{bucket}` handler");

        for action in &rule.actions {
            if let Some(feature) = action.feature() {
                self.features.insert(feature);
            }
        }
        let branch = translate::rule_branch(&rule.event, rule.state_filter.as_ref(), &rule.actions);
        if let Some(segment) = self.arena.get_mut(position) {
            segment.role = SegmentRole::Branch {
                conditional: branch.conditional,
            };
            segment.text = branch.text;
        }
    }

    /// Append a handler for `bucket`; returns where its first rule goes.
    fn open_bucket(&mut self, bucket: EventBucket, advanced: bool) -> usize {
        let header = self.arena.push(Segment::header(bucket));
        if let Some(feature) = bucket.feature() {
            self.features.insert(feature);
        }
        let used = if advanced {
            self.arena.push(Segment::state_sync());
            2
        } else {
            1
        };
        self.arena.open_bucket(bucket, BucketSpan { header, used });
        debug!("opened `{bucket}` handler at segment {header}");
        // Right after the opening; an advanced handler keeps its state
        // snapshot as the last segment.
        header + 1
    }

    /// Where a further rule for an existing bucket goes.
    fn extension_point(&mut self, bucket: EventBucket, span: BucketSpan, rule: &ResolvedRule) -> usize {
        let mut at = if rule.is_advanced {
            span.header + span.used
        } else {
            span.header + span.used + 1
        };
        self.arena.grow_bucket(bucket);

        if !rule.is_advanced && !rule.event.is_any_value_set() {
            if let Some(conditional) = self.arena.first_conditional_branch(span.header..at) {
                trace!("unconditional rule moved before conditional branch at segment {conditional}");
                at = conditional;
            }
        }
        at
    }
}

/// Output of a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProgram {
    segments: Vec<String>,
    rule_to_segment: Vec<usize>,
    features: Features,
}

impl CompiledProgram {
    /// Code fragments in program order; concatenated they form the script.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segment index holding each rule's code, indexed by rule.
    pub fn rule_to_segment(&self) -> &[usize] {
        &self.rule_to_segment
    }

    pub fn segment_of_rule(&self, rule: usize) -> Option<usize> {
        self.rule_to_segment.get(rule).copied()
    }

    /// 0-based line of [`CompiledProgram::text`] where the rule's code begins.
    pub fn line_of_rule(&self, rule: usize) -> Option<usize> {
        let segment = self.segment_of_rule(rule)?;
        Some(
            self.segments[..segment]
                .iter()
                .map(|text| text.matches('\n').count())
                .sum(),
        )
    }

    /// Line range (end exclusive) covered by the rule's code.
    pub fn lines_of_rule(&self, rule: usize) -> Option<std::ops::Range<usize>> {
        let start = self.line_of_rule(rule)?;
        let segment = self.segment_of_rule(rule)?;
        let count = self.segments[segment].matches('\n').count();
        Some(start..start + count)
    }

    pub fn text(&self) -> String {
        self.segments.concat()
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
