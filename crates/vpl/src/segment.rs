//! Ordered segment arena with index remapping.
//!
//! Segments are addressed by position. Inserting a segment shifts every
//! position at or after the insertion point, so the arena also owns every
//! position anyone keeps: bucket headers and the rule → segment table. A
//! single [`SegmentArena::insert`] updates all of them together.

use std::collections::BTreeMap;

use crate::bucket::EventBucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    /// `onevent` opening of a bucket.
    Header(EventBucket),
    /// State snapshot closing an advanced handler.
    StateSync,
    /// Code of one rule.
    Branch { conditional: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub role: SegmentRole,
    pub text: String,
}

impl Segment {
    pub fn header(bucket: EventBucket) -> Self {
        Self {
            role: SegmentRole::Header(bucket),
            text: bucket.header().to_owned(),
        }
    }

    pub fn state_sync() -> Self {
        Self {
            role: SegmentRole::StateSync,
            text: crate::bucket::STATE_SYNC.to_owned(),
        }
    }

    /// Placeholder for a rule whose text is not generated yet.
    pub fn empty_branch() -> Self {
        Self {
            role: SegmentRole::Branch { conditional: false },
            text: String::new(),
        }
    }

    /// Whether this segment is a rule branch wrapped in an `if`.
    pub fn opens_condition(&self) -> bool {
        matches!(self.role, SegmentRole::Branch { conditional: true })
    }
}

/// Where a bucket starts and how far it reaches.
///
/// `used` counts the bucket's segments minus one, so `header + used` is the
/// last segment of the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketSpan {
    pub header: usize,
    pub used: usize,
}

#[derive(Debug, Default)]
pub struct SegmentArena {
    segments: Vec<Segment>,
    buckets: BTreeMap<EventBucket, BucketSpan>,
    /// Indexed by rule, in compile order.
    rule_segments: Vec<usize>,
}

impl SegmentArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment. Nothing tracked lies after the end, so no remapping.
    pub fn push(&mut self, segment: Segment) -> usize {
        self.segments.push(segment);
        self.segments.len() - 1
    }

    /// Insert a segment at `at`, shifting every tracked position `>= at`.
    ///
    /// # Panics
    /// Panics if `at > self.len()`.
    pub fn insert(&mut self, at: usize, segment: Segment) -> usize {
        assert!(at <= self.segments.len(), "insertion point {at} past end {}", self.segments.len());
        for span in self.buckets.values_mut() {
            if span.header >= at {
                span.header += 1;
            }
        }
        for position in &mut self.rule_segments {
            if *position >= at {
                *position += 1;
            }
        }
        self.segments.insert(at, segment);
        at
    }

    pub fn open_bucket(&mut self, bucket: EventBucket, span: BucketSpan) {
        self.buckets.insert(bucket, span);
    }

    pub fn bucket(&self, bucket: EventBucket) -> Option<BucketSpan> {
        self.buckets.get(&bucket).copied()
    }

    /// Account for one more segment in `bucket`.
    pub fn grow_bucket(&mut self, bucket: EventBucket) {
        if let Some(span) = self.buckets.get_mut(&bucket) {
            span.used += 1;
        }
    }

    /// Record `segment` as the code of the next rule; returns the rule index.
    pub fn bind_rule(&mut self, segment: usize) -> usize {
        self.rule_segments.push(segment);
        self.rule_segments.len() - 1
    }

    pub fn rule_segments(&self) -> &[usize] {
        &self.rule_segments
    }

    /// Lowest position in `range` holding a rule branch that opens a
    /// condition.
    ///
    /// Rules are scanned in compile order and every hit narrows the upper
    /// bound, so the scan settles on the first conditional branch of the
    /// range whatever order the rules were added in.
    pub fn first_conditional_branch(&self, range: std::ops::Range<usize>) -> Option<usize> {
        let mut found = None;
        let mut end = range.end;
        for &position in &self.rule_segments {
            if position >= range.start && position < end && self.segments[position].opens_condition() {
                end = position;
                found = Some(position);
            }
        }
        found
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Segment> {
        self.segments.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Buckets in creation order (ascending header).
    pub fn buckets_in_order(&self) -> Vec<(EventBucket, BucketSpan)> {
        let mut buckets: Vec<_> = self.buckets.iter().map(|(bucket, span)| (*bucket, *span)).collect();
        buckets.sort_by_key(|(_, span)| span.header);
        buckets
    }

    /// Segment texts plus the rule → segment table.
    pub fn into_parts(self) -> (Vec<String>, Vec<usize>) {
        let texts = self.segments.into_iter().map(|segment| segment.text).collect();
        (texts, self.rule_segments)
    }
}
