//! Typed block variants.
//!
//! Every raw [`Block`] is resolved into exactly one of [`EventBlock`],
//! [`StateFilter`] or [`ActionBlock`] before any code is generated. The
//! translators match on these enums exhaustively; resolution is the only
//! place where a malformed block can be detected.

use crate::block::{
    Block, BlockKind, BlockRole, GROUND_SENSORS, PROX_SENSORS, SOUND_NOTES, STATE_SLOTS,
};
use crate::bucket::EventBucket;
use crate::error::InternalError;
use crate::features::Feature;

/// Number of discrete tilt steps on each side of level.
pub const TILT_RESOLUTION: i32 = 4;

/// Frequencies (Hz) selectable on the sound card.
pub const NOTE_FREQUENCIES: [i32; 5] = [262, 311, 370, 440, 524];
/// Durations (1/60 s) selectable on the sound card; `-1` is a rest.
pub const NOTE_DURATIONS: [i32; 3] = [-1, 8, 15];

/// What a single proximity sensor slot tests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorTest {
    #[default]
    Any,
    /// Reading below the low threshold.
    Below,
    /// Reading above the high threshold.
    Above,
}

impl SensorTest {
    /// Values outside the card's three states are treated as unset.
    pub fn from_value(value: i32) -> Self {
        match value {
            1 => SensorTest::Below,
            2 => SensorTest::Above,
            _ => SensorTest::Any,
        }
    }

    pub fn value(self) -> i32 {
        match self {
            SensorTest::Any => 0,
            SensorTest::Below => 1,
            SensorTest::Above => 2,
        }
    }
}

/// One persistent state bit, either as a filter requirement or as a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateSlot {
    /// Filter: don't care. Write: leave unchanged.
    #[default]
    Any,
    On,
    Off,
}

impl StateSlot {
    pub fn from_value(value: i32) -> Self {
        match value {
            1 => StateSlot::On,
            2 => StateSlot::Off,
            _ => StateSlot::Any,
        }
    }

    pub fn value(self) -> i32 {
        match self {
            StateSlot::Any => 0,
            StateSlot::On => 1,
            StateSlot::Off => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltMode {
    Tap,
    Roll,
    Pitch,
}

impl TiltMode {
    pub fn from_value(value: i32) -> Result<Self, InternalError> {
        match value {
            0 => Ok(TiltMode::Tap),
            1 => Ok(TiltMode::Roll),
            2 => Ok(TiltMode::Pitch),
            other => Err(InternalError::UnknownTiltMode(other)),
        }
    }

    pub fn value(self) -> i32 {
        match self {
            TiltMode::Tap => 0,
            TiltMode::Roll => 1,
            TiltMode::Pitch => 2,
        }
    }
}

/// A note of the sound card: indices into [`NOTE_FREQUENCIES`] and
/// [`NOTE_DURATIONS`], packed as `pitch | duration << 8` on the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Note {
    pub pitch: u8,
    pub duration: u8,
}

impl Note {
    pub fn new(pitch: u8, duration: u8) -> Self {
        Self { pitch, duration }
    }

    pub fn value(self) -> i32 {
        i32::from(self.pitch) | (i32::from(self.duration) << 8)
    }

    fn decode(slot: usize, value: i32) -> Result<Self, InternalError> {
        let pitch = (value & 0xff) as usize;
        let duration = ((value >> 8) & 0xff) as usize;
        if pitch >= NOTE_FREQUENCIES.len() || duration >= NOTE_DURATIONS.len() {
            return Err(InternalError::NoteOutOfRange { slot, value });
        }
        Ok(Self {
            pitch: pitch as u8,
            duration: duration as u8,
        })
    }

    pub fn frequency(self) -> i32 {
        NOTE_FREQUENCIES[usize::from(self.pitch)]
    }

    pub fn duration_ticks(self) -> i32 {
        NOTE_DURATIONS[usize::from(self.duration)]
    }
}

/// Per-sensor tests plus the two slider thresholds shared by both
/// proximity cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorBand<const N: usize> {
    pub sensors: [SensorTest; N],
    pub low: i32,
    pub high: i32,
}

impl<const N: usize> SensorBand<N> {
    pub fn is_any_value_set(&self) -> bool {
        self.sensors.iter().any(|sensor| *sensor != SensorTest::Any)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventBlock {
    /// Forward, left, backward, right, center.
    Buttons([bool; 5]),
    Proximity(SensorBand<PROX_SENSORS>),
    GroundProximity(SensorBand<GROUND_SENSORS>),
    Tap,
    Clap,
    Timeout,
    Tilt { mode: TiltMode, angle: i32 },
}

impl EventBlock {
    pub fn is_any_value_set(&self) -> bool {
        match self {
            EventBlock::Buttons(pressed) => pressed.iter().any(|pressed| *pressed),
            EventBlock::Proximity(band) => band.is_any_value_set(),
            EventBlock::GroundProximity(band) => band.is_any_value_set(),
            EventBlock::Tap | EventBlock::Clap | EventBlock::Timeout => false,
            EventBlock::Tilt { mode, .. } => *mode != TiltMode::Tap,
        }
    }

    /// The physical event handler this card joins.
    ///
    /// Ground proximity shares the proximity update, and an accelerometer
    /// card in tap mode is a plain tap.
    pub fn bucket(&self) -> EventBucket {
        match self {
            EventBlock::Buttons(_) => EventBucket::Buttons,
            EventBlock::Proximity(_) | EventBlock::GroundProximity(_) => EventBucket::Proximity,
            EventBlock::Tap | EventBlock::Tilt { mode: TiltMode::Tap, .. } => EventBucket::Tap,
            EventBlock::Tilt { .. } => EventBucket::Tilt,
            EventBlock::Clap => EventBucket::Clap,
            EventBlock::Timeout => EventBucket::Timeout,
        }
    }
}

impl TryFrom<&Block> for EventBlock {
    type Error = InternalError;

    fn try_from(block: &Block) -> Result<Self, Self::Error> {
        let kind = known_kind(block, BlockRole::Event)?;
        let values = block.values();
        Ok(match kind {
            BlockKind::Buttons => {
                let values: [i32; 5] = fixed(kind, values)?;
                EventBlock::Buttons(values.map(|value| value > 0))
            }
            BlockKind::Prox => EventBlock::Proximity(sensor_band(kind, values)?),
            BlockKind::ProxGround => EventBlock::GroundProximity(sensor_band(kind, values)?),
            BlockKind::Tap => {
                fixed::<0>(kind, values)?;
                EventBlock::Tap
            }
            BlockKind::Clap => {
                fixed::<0>(kind, values)?;
                EventBlock::Clap
            }
            BlockKind::Timeout => {
                fixed::<0>(kind, values)?;
                EventBlock::Timeout
            }
            BlockKind::Acc => {
                let [mode, angle] = fixed(kind, values)?;
                let mode = TiltMode::from_value(mode)?;
                if !(-TILT_RESOLUTION..=TILT_RESOLUTION).contains(&angle) {
                    return Err(InternalError::TiltAngleOutOfRange(angle));
                }
                EventBlock::Tilt { mode, angle }
            }
            other => return Err(unexpected_kind(BlockRole::Event, other)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateFilter(pub [StateSlot; STATE_SLOTS]);

impl StateFilter {
    pub fn is_any_value_set(&self) -> bool {
        self.0.iter().any(|slot| *slot != StateSlot::Any)
    }
}

impl TryFrom<&Block> for StateFilter {
    type Error = InternalError;

    fn try_from(block: &Block) -> Result<Self, Self::Error> {
        let kind = known_kind(block, BlockRole::StateFilter)?;
        match kind {
            BlockKind::StateFilter => {
                let values: [i32; STATE_SLOTS] = fixed(kind, block.values())?;
                Ok(StateFilter(values.map(StateSlot::from_value)))
            }
            other => Err(unexpected_kind(BlockRole::StateFilter, other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionBlock {
    Move { left: i32, right: i32 },
    TopColor([i32; 3]),
    BottomColor([i32; 3]),
    Sound([Note; SOUND_NOTES]),
    Timer { period: i32 },
    SetState([StateSlot; STATE_SLOTS]),
}

impl ActionBlock {
    pub fn is_any_value_set(&self) -> bool {
        match self {
            ActionBlock::Move { left, right } => *left != 0 || *right != 0,
            ActionBlock::TopColor(rgb) | ActionBlock::BottomColor(rgb) => rgb.iter().any(|c| *c != 0),
            ActionBlock::Sound(_) => true,
            ActionBlock::Timer { period } => *period != 0,
            ActionBlock::SetState(slots) => slots.iter().any(|slot| *slot != StateSlot::Any),
        }
    }

    /// Shared runtime support this action relies on.
    pub fn feature(&self) -> Option<Feature> {
        match self {
            ActionBlock::Sound(_) => Some(Feature::Sound),
            _ => None,
        }
    }
}

impl TryFrom<&Block> for ActionBlock {
    type Error = InternalError;

    fn try_from(block: &Block) -> Result<Self, Self::Error> {
        let kind = known_kind(block, BlockRole::Action)?;
        let values = block.values();
        Ok(match kind {
            BlockKind::Move => {
                let [left, right] = fixed(kind, values)?;
                ActionBlock::Move { left, right }
            }
            BlockKind::TopColor => ActionBlock::TopColor(fixed(kind, values)?),
            BlockKind::BottomColor => ActionBlock::BottomColor(fixed(kind, values)?),
            BlockKind::Sound => {
                let values: [i32; SOUND_NOTES] = fixed(kind, values)?;
                let mut notes = [Note::default(); SOUND_NOTES];
                for (slot, (note, value)) in notes.iter_mut().zip(values).enumerate() {
                    *note = Note::decode(slot, value)?;
                }
                ActionBlock::Sound(notes)
            }
            BlockKind::Timer => {
                let [period] = fixed(kind, values)?;
                ActionBlock::Timer { period }
            }
            BlockKind::SetState => {
                let values: [i32; STATE_SLOTS] = fixed(kind, values)?;
                ActionBlock::SetState(values.map(StateSlot::from_value))
            }
            other => return Err(unexpected_kind(BlockRole::Action, other)),
        })
    }
}

fn known_kind(block: &Block, expected: BlockRole) -> Result<BlockKind, InternalError> {
    if block.role() != expected {
        return Err(InternalError::UnexpectedRole {
            expected,
            found: block.role(),
        });
    }
    block.known_kind().ok_or_else(|| InternalError::UnknownKind {
        role: expected,
        kind: block.kind().to_owned(),
    })
}

fn unexpected_kind(role: BlockRole, kind: BlockKind) -> InternalError {
    InternalError::UnknownKind {
        role,
        kind: kind.name().to_owned(),
    }
}

fn fixed<const N: usize>(kind: BlockKind, values: &[i32]) -> Result<[i32; N], InternalError> {
    values.try_into().map_err(|_| InternalError::ValueCount {
        kind: kind.name(),
        expected: N,
        found: values.len(),
    })
}

/// Sensor slots followed by the low and high slider values.
fn sensor_band<const N: usize>(kind: BlockKind, values: &[i32]) -> Result<SensorBand<N>, InternalError> {
    if values.len() != N + 2 {
        return Err(InternalError::ValueCount {
            kind: kind.name(),
            expected: N + 2,
            found: values.len(),
        });
    }
    let (sensors, sliders) = values.split_at(N);
    let sensors: [i32; N] = fixed(kind, sensors)?;
    Ok(SensorBand {
        sensors: sensors.map(SensorTest::from_value),
        low: sliders[0],
        high: sliders[1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_mode_accelerometer_joins_tap_bucket() {
        let block = Block::acc(TiltMode::Tap, 2);
        let event = EventBlock::try_from(&block).unwrap();
        assert_eq!(event.bucket(), EventBucket::Tap);

        let block = Block::acc(TiltMode::Pitch, 2);
        let event = EventBlock::try_from(&block).unwrap();
        assert_eq!(event.bucket(), EventBucket::Tilt);
    }

    #[test]
    fn ground_proximity_joins_proximity_bucket() {
        let block = Block::prox_ground([SensorTest::Below, SensorTest::Any]);
        let event = EventBlock::try_from(&block).unwrap();
        assert_eq!(event.bucket(), EventBucket::Proximity);
        let EventBlock::GroundProximity(band) = event else {
            panic!("expected ground proximity, got {event:?}");
        };
        assert_eq!((band.low, band.high), (150, 300));
    }

    #[test]
    fn unknown_tilt_mode_is_internal_error() {
        let block = Block::new(BlockRole::Event, "acc", [7, 0]);
        assert_eq!(
            EventBlock::try_from(&block),
            Err(InternalError::UnknownTiltMode(7))
        );
    }

    #[test]
    fn tilt_angle_beyond_resolution_is_internal_error() {
        let block = Block::new(BlockRole::Event, "acc", [2, i32::MAX]);
        assert_eq!(
            EventBlock::try_from(&block),
            Err(InternalError::TiltAngleOutOfRange(i32::MAX))
        );

        let block = Block::acc(TiltMode::Roll, -TILT_RESOLUTION - 1);
        assert_eq!(
            EventBlock::try_from(&block),
            Err(InternalError::TiltAngleOutOfRange(-TILT_RESOLUTION - 1))
        );

        let block = Block::acc(TiltMode::Pitch, TILT_RESOLUTION);
        assert!(EventBlock::try_from(&block).is_ok());
    }

    #[test]
    fn action_kind_in_event_role_is_rejected() {
        let block = Block::new(BlockRole::Event, "move", [0, 0]);
        assert!(matches!(
            EventBlock::try_from(&block),
            Err(InternalError::UnknownKind { role: BlockRole::Event, .. })
        ));

        let block = Block::move_robot(1, 1);
        assert_eq!(
            EventBlock::try_from(&block),
            Err(InternalError::UnexpectedRole {
                expected: BlockRole::Event,
                found: BlockRole::Action,
            })
        );
    }

    #[test]
    fn malformed_value_count_is_rejected() {
        let block = Block::new(BlockRole::Action, "move", [100]);
        assert_eq!(
            ActionBlock::try_from(&block),
            Err(InternalError::ValueCount {
                kind: "move",
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn sound_notes_are_decoded_and_bounded() {
        let notes = [Note::new(4, 2), Note::new(0, 0), Note::new(1, 1), Note::new(2, 1), Note::new(3, 1), Note::new(0, 2)];
        let action = ActionBlock::try_from(&Block::sound(notes)).unwrap();
        assert_eq!(action, ActionBlock::Sound(notes));
        assert_eq!(notes[0].frequency(), 524);
        assert_eq!(notes[0].duration_ticks(), 15);

        let block = Block::new(BlockRole::Action, "sound", [0, 0, 9, 0, 0, 0]);
        assert_eq!(
            ActionBlock::try_from(&block),
            Err(InternalError::NoteOutOfRange { slot: 2, value: 9 })
        );
    }

    #[test]
    fn out_of_range_slot_values_read_as_unset() {
        let block = Block::new(BlockRole::StateFilter, "statefilter", [3, 1, -1, 2]);
        let filter = StateFilter::try_from(&block).unwrap();
        assert_eq!(
            filter.0,
            [StateSlot::Any, StateSlot::On, StateSlot::Any, StateSlot::Off]
        );
    }
}
