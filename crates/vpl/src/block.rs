//! Parameter blocks as the editor hands them over.
//!
//! A `Block` is untyped: a role, a kind name and a short list of
//! integer values, exactly what a visual card stores. The generator never
//! dispatches on the kind string directly; [`crate::kinds`] resolves every
//! block into one of the closed typed variants first, and a kind outside the
//! vocabulary surfaces there as an internal compiler error.
//!
//! The constructors on [`Block`] (`Block::buttons`, `Block::prox`, ...) are the
//! editor side of that contract: they always produce well-shaped blocks with
//! the editor's default slider positions.

use std::fmt;

use smallvec::SmallVec;

use crate::kinds::{Note, SensorTest, StateSlot, TiltMode};

/// Inline storage large enough for the widest block (proximity: 7 + 2).
pub type Values = SmallVec<[i32; 9]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlockRole {
    Event,
    StateFilter,
    Action,
}

impl fmt::Display for BlockRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRole::Event => write!(f, "event"),
            BlockRole::StateFilter => write!(f, "state filter"),
            BlockRole::Action => write!(f, "action"),
        }
    }
}

/// The fixed block vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Buttons,
    Prox,
    ProxGround,
    Tap,
    Clap,
    Timeout,
    Acc,
    StateFilter,
    Move,
    TopColor,
    BottomColor,
    Sound,
    Timer,
    SetState,
}

impl BlockKind {
    pub const ALL: [BlockKind; 14] = [
        BlockKind::Buttons,
        BlockKind::Prox,
        BlockKind::ProxGround,
        BlockKind::Tap,
        BlockKind::Clap,
        BlockKind::Timeout,
        BlockKind::Acc,
        BlockKind::StateFilter,
        BlockKind::Move,
        BlockKind::TopColor,
        BlockKind::BottomColor,
        BlockKind::Sound,
        BlockKind::Timer,
        BlockKind::SetState,
    ];

    /// Name used by the editor and the saved documents.
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Buttons => "button",
            BlockKind::Prox => "prox",
            BlockKind::ProxGround => "proxground",
            BlockKind::Tap => "tap",
            BlockKind::Clap => "clap",
            BlockKind::Timeout => "timeout",
            BlockKind::Acc => "acc",
            BlockKind::StateFilter => "statefilter",
            BlockKind::Move => "move",
            BlockKind::TopColor => "colortop",
            BlockKind::BottomColor => "colorbottom",
            BlockKind::Sound => "sound",
            BlockKind::Timer => "timer",
            BlockKind::SetState => "setstate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn role(self) -> BlockRole {
        match self {
            BlockKind::Buttons
            | BlockKind::Prox
            | BlockKind::ProxGround
            | BlockKind::Tap
            | BlockKind::Clap
            | BlockKind::Timeout
            | BlockKind::Acc => BlockRole::Event,
            BlockKind::StateFilter => BlockRole::StateFilter,
            BlockKind::Move
            | BlockKind::TopColor
            | BlockKind::BottomColor
            | BlockKind::Sound
            | BlockKind::Timer
            | BlockKind::SetState => BlockRole::Action,
        }
    }

    /// Number of integer values a block of this kind carries.
    pub fn value_count(self) -> usize {
        match self {
            BlockKind::Buttons => 5,
            BlockKind::Prox => PROX_SENSORS + 2,
            BlockKind::ProxGround => GROUND_SENSORS + 2,
            BlockKind::Tap | BlockKind::Clap | BlockKind::Timeout => 0,
            BlockKind::Acc => 2,
            BlockKind::StateFilter | BlockKind::SetState => STATE_SLOTS,
            BlockKind::Move => 2,
            BlockKind::TopColor | BlockKind::BottomColor => 3,
            BlockKind::Sound => SOUND_NOTES,
            BlockKind::Timer => 1,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Horizontal proximity sensors: five at the front, two at the back.
pub const PROX_SENSORS: usize = 7;
pub const GROUND_SENSORS: usize = 2;
/// Persistent state bits available in advanced mode.
pub const STATE_SLOTS: usize = 4;
pub const SOUND_NOTES: usize = 6;

/// Default (low, high) slider positions of the proximity card.
pub const PROX_DEFAULT_THRESHOLDS: (i32, i32) = (1000, 2000);
/// Default (low, high) slider positions of the ground proximity card.
pub const GROUND_DEFAULT_THRESHOLDS: (i32, i32) = (150, 300);

/// One visual card.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    role: BlockRole,
    kind: String,
    #[cfg_attr(feature = "serde", serde(default))]
    values: Values,
}

impl Block {
    pub fn new(role: BlockRole, kind: impl Into<String>, values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            role,
            kind: kind.into(),
            values: values.into_iter().collect(),
        }
    }

    fn of_kind(kind: BlockKind, values: impl IntoIterator<Item = i32>) -> Self {
        Self::new(kind.role(), kind.name(), values)
    }

    pub fn role(&self) -> BlockRole {
        self.role
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The kind, if it belongs to the vocabulary.
    pub fn known_kind(&self) -> Option<BlockKind> {
        BlockKind::from_name(&self.kind)
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<i32> {
        self.values.get(index).copied()
    }

    /// Whether any parameter deviates from its neutral default.
    ///
    /// Slider thresholds do not count: a proximity card with no sensor
    /// selected is unconditional whatever its sliders say. Blocks that do not
    /// resolve (unknown kind, malformed values) report `false`.
    pub fn has_non_default_value(&self) -> bool {
        match self.role {
            BlockRole::Event => crate::kinds::EventBlock::try_from(self)
                .is_ok_and(|event| event.is_any_value_set()),
            BlockRole::StateFilter => crate::kinds::StateFilter::try_from(self)
                .is_ok_and(|filter| filter.is_any_value_set()),
            BlockRole::Action => crate::kinds::ActionBlock::try_from(self)
                .is_ok_and(|action| action.is_any_value_set()),
        }
    }

    // --- Event cards ---

    /// Arrow buttons, in the order forward, left, backward, right, center.
    pub fn buttons(pressed: [bool; 5]) -> Self {
        Self::of_kind(BlockKind::Buttons, pressed.map(i32::from))
    }

    pub fn prox(sensors: [SensorTest; PROX_SENSORS]) -> Self {
        let (low, high) = PROX_DEFAULT_THRESHOLDS;
        Self::prox_with_thresholds(sensors, low, high)
    }

    pub fn prox_with_thresholds(sensors: [SensorTest; PROX_SENSORS], low: i32, high: i32) -> Self {
        let values = sensors.map(SensorTest::value).into_iter().chain([low, high]);
        Self::of_kind(BlockKind::Prox, values)
    }

    pub fn prox_ground(sensors: [SensorTest; GROUND_SENSORS]) -> Self {
        let (low, high) = GROUND_DEFAULT_THRESHOLDS;
        Self::prox_ground_with_thresholds(sensors, low, high)
    }

    pub fn prox_ground_with_thresholds(sensors: [SensorTest; GROUND_SENSORS], low: i32, high: i32) -> Self {
        let values = sensors.map(SensorTest::value).into_iter().chain([low, high]);
        Self::of_kind(BlockKind::ProxGround, values)
    }

    pub fn tap() -> Self {
        Self::of_kind(BlockKind::Tap, [])
    }

    pub fn clap() -> Self {
        Self::of_kind(BlockKind::Clap, [])
    }

    pub fn timeout() -> Self {
        Self::of_kind(BlockKind::Timeout, [])
    }

    /// Accelerometer card. `angle` is the discretized target in
    /// `-TILT_RESOLUTION..=TILT_RESOLUTION`; ignored in tap mode.
    pub fn acc(mode: TiltMode, angle: i32) -> Self {
        Self::of_kind(BlockKind::Acc, [mode.value(), angle])
    }

    // --- State filter ---

    pub fn state_filter(slots: [StateSlot; STATE_SLOTS]) -> Self {
        Self::of_kind(BlockKind::StateFilter, slots.map(StateSlot::value))
    }

    // --- Action cards ---

    pub fn move_robot(left: i32, right: i32) -> Self {
        Self::of_kind(BlockKind::Move, [left, right])
    }

    pub fn top_color(r: i32, g: i32, b: i32) -> Self {
        Self::of_kind(BlockKind::TopColor, [r, g, b])
    }

    pub fn bottom_color(r: i32, g: i32, b: i32) -> Self {
        Self::of_kind(BlockKind::BottomColor, [r, g, b])
    }

    pub fn sound(notes: [Note; SOUND_NOTES]) -> Self {
        Self::of_kind(BlockKind::Sound, notes.map(Note::value))
    }

    pub fn timer(period_ms: i32) -> Self {
        Self::of_kind(BlockKind::Timer, [period_ms])
    }

    pub fn set_state(slots: [StateSlot; STATE_SLOTS]) -> Self {
        Self::of_kind(BlockKind::SetState, slots.map(StateSlot::value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip_through_vocabulary() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(BlockKind::from_name("teleport"), None);
    }

    #[test]
    fn constructors_match_declared_shapes() {
        let blocks = [
            Block::buttons([false; 5]),
            Block::prox([SensorTest::Any; PROX_SENSORS]),
            Block::prox_ground([SensorTest::Any; GROUND_SENSORS]),
            Block::tap(),
            Block::clap(),
            Block::timeout(),
            Block::acc(TiltMode::Pitch, 0),
            Block::state_filter([StateSlot::Any; STATE_SLOTS]),
            Block::move_robot(0, 0),
            Block::top_color(0, 0, 0),
            Block::bottom_color(0, 0, 0),
            Block::sound([Note::default(); SOUND_NOTES]),
            Block::timer(1000),
            Block::set_state([StateSlot::Any; STATE_SLOTS]),
        ];
        for block in &blocks {
            let kind = block.known_kind().unwrap();
            assert_eq!(block.role(), kind.role(), "{kind}");
            assert_eq!(block.values().len(), kind.value_count(), "{kind}");
        }
    }

    #[test]
    fn sliders_do_not_make_prox_conditional() {
        let block = Block::prox_with_thresholds([SensorTest::Any; PROX_SENSORS], 3000, 4000);
        assert!(!block.has_non_default_value());

        let mut sensors = [SensorTest::Any; PROX_SENSORS];
        sensors[6] = SensorTest::Above;
        assert!(Block::prox(sensors).has_non_default_value());
    }

    #[test]
    fn eventless_kinds_are_never_set() {
        assert!(!Block::tap().has_non_default_value());
        assert!(!Block::clap().has_non_default_value());
        assert!(!Block::timeout().has_non_default_value());
        assert!(!Block::acc(TiltMode::Tap, 3).has_non_default_value());
        assert!(Block::acc(TiltMode::Roll, 0).has_non_default_value());
    }

    #[test]
    fn unknown_kind_reports_default() {
        let block = Block::new(BlockRole::Event, "teleport", [1, 2, 3]);
        assert!(!block.has_non_default_value());
        assert_eq!(block.known_kind(), None);
    }
}
