//! Event buckets: the physical event handlers visual rules merge into.

use std::fmt;

use crate::features::Feature;

/// One `onevent` handler of the generated script.
///
/// Several card kinds can share a bucket (see [`crate::kinds::EventBlock::bucket`]);
/// the bucket reflects what the runtime actually exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventBucket {
    Buttons,
    Proximity,
    Tap,
    Tilt,
    Clap,
    Timeout,
}

impl EventBucket {
    pub fn name(self) -> &'static str {
        match self {
            EventBucket::Buttons => "button",
            EventBucket::Proximity => "prox",
            EventBucket::Tap => "tap",
            EventBucket::Tilt => "acc",
            EventBucket::Clap => "clap",
            EventBucket::Timeout => "timeout",
        }
    }

    /// Opening text of the handler.
    ///
    /// The timer handler disarms its own period, so a timeout fires once.
    pub fn header(self) -> &'static str {
        match self {
            EventBucket::Buttons => "\nonevent buttons\n",
            EventBucket::Proximity => "\nonevent prox\n",
            EventBucket::Tap => "\nonevent tap\n",
            EventBucket::Tilt => "\nonevent acc\n",
            EventBucket::Clap => "\nonevent mic\n",
            EventBucket::Timeout => "\nonevent timer0\n\ttimer.period[0] = 0\n",
        }
    }

    /// Runtime support the handler itself needs.
    pub fn feature(self) -> Option<Feature> {
        match self {
            EventBucket::Tilt => Some(Feature::TiltAngle),
            EventBucket::Clap => Some(Feature::Microphone),
            EventBucket::Timeout => Some(Feature::Timer),
            EventBucket::Buttons | EventBucket::Proximity | EventBucket::Tap => None,
        }
    }
}

impl fmt::Display for EventBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of the next state into the current one, followed by its display.
/// Stays the last segment of an advanced handler.
pub const STATE_SYNC: &str = "\n\tcall math.copy(state, new_state)\n\tcallsub display_state\n";
