use crate::kinds::{EventBlock, SensorBand, SensorTest, StateFilter, StateSlot, TILT_RESOLUTION, TiltMode};

const BUTTON_NAMES: [&str; 5] = ["forward", "left", "backward", "right", "center"];

/// Full angle range mapped onto `-TILT_RESOLUTION..=TILT_RESOLUTION`.
const TILT_SCALE: i32 = 16384;
const TILT_HALF_BAND: i32 = 8192;

/// Code that must run before the test, one statement per line.
pub fn pre_test(event: &EventBlock) -> Option<String> {
    match event {
        EventBlock::Tilt { mode: TiltMode::Pitch, .. } => {
            Some("\tcall math.atan2(angle, acc[1], acc[2])\n".to_owned())
        }
        EventBlock::Tilt { mode: TiltMode::Roll, .. } => {
            Some("\tcall math.atan2(angle, acc[0], acc[2])\n".to_owned())
        }
        _ => None,
    }
}

/// Boolean expression of an event card. Empty when the card tests nothing.
pub fn event_test(event: &EventBlock) -> String {
    match event {
        EventBlock::Buttons(pressed) => BUTTON_NAMES
            .iter()
            .zip(pressed)
            .filter(|(_, pressed)| **pressed)
            .map(|(name, _)| format!("button.{name} == 1"))
            .collect::<Vec<_>>()
            .join(" and "),
        EventBlock::Proximity(band) => sensor_band_test("prox.horizontal", band),
        EventBlock::GroundProximity(band) => sensor_band_test("prox.ground.delta", band),
        EventBlock::Tilt { mode, angle } => tilt_test(*mode, *angle),
        EventBlock::Tap | EventBlock::Clap | EventBlock::Timeout => String::new(),
    }
}

fn sensor_band_test<const N: usize>(variable: &str, band: &SensorBand<N>) -> String {
    band.sensors
        .iter()
        .enumerate()
        .filter_map(|(index, sensor)| match sensor {
            SensorTest::Below => Some(format!("{variable}[{index}] < {}", band.low)),
            SensorTest::Above => Some(format!("{variable}[{index}] > {}", band.high)),
            SensorTest::Any => None,
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Band around the discretized target angle. At either end of the range
/// the band is open on the outer side.
fn tilt_test(mode: TiltMode, angle: i32) -> String {
    let target = match mode {
        TiltMode::Pitch => angle,
        TiltMode::Roll => -angle,
        TiltMode::Tap => return String::new(),
    };
    let middle = target * TILT_SCALE / TILT_RESOLUTION;
    let low = middle - TILT_HALF_BAND / TILT_RESOLUTION;
    let high = middle + TILT_HALF_BAND / TILT_RESOLUTION;

    let mut clauses = Vec::with_capacity(2);
    if target != -TILT_RESOLUTION {
        clauses.push(format!("angle > {low}"));
    }
    if target != TILT_RESOLUTION {
        clauses.push(format!("angle < {high}"));
    }
    clauses.join(" and ")
}

/// ` and state[i] == v` for every constrained slot, to follow an event test.
pub fn state_filter_conjunction(filter: &StateFilter) -> String {
    filter
        .0
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| required_value(*slot).map(|value| format!(" and state[{index}] == {value}")))
        .collect()
}

/// State filter as a test of its own.
pub fn state_filter_test(filter: &StateFilter) -> String {
    filter
        .0
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| required_value(*slot).map(|value| format!("state[{index}] == {value}")))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn required_value(slot: StateSlot) -> Option<u8> {
    match slot {
        StateSlot::On => Some(1),
        StateSlot::Off => Some(0),
        StateSlot::Any => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_are_joined_in_slot_order() {
        let event = EventBlock::Buttons([false, true, false, true, true]);
        assert_eq!(
            event_test(&event),
            "button.left == 1 and button.right == 1 and button.center == 1"
        );
    }

    #[test]
    fn proximity_uses_low_and_high_thresholds() {
        let mut sensors = [SensorTest::Any; 7];
        sensors[0] = SensorTest::Below;
        sensors[5] = SensorTest::Above;
        let band = SensorBand { sensors, low: 1200, high: 3100 };
        assert_eq!(
            event_test(&EventBlock::Proximity(band)),
            "prox.horizontal[0] < 1200 and prox.horizontal[5] > 3100"
        );
    }

    #[test]
    fn ground_proximity_reads_ground_sensors() {
        let band = SensorBand { sensors: [SensorTest::Above, SensorTest::Below], low: 150, high: 300 };
        assert_eq!(
            event_test(&EventBlock::GroundProximity(band)),
            "prox.ground.delta[0] > 300 and prox.ground.delta[1] < 150"
        );
    }

    #[test]
    fn tilt_band_inside_range_has_both_bounds() {
        for angle in -(TILT_RESOLUTION - 1)..TILT_RESOLUTION {
            let test = tilt_test(TiltMode::Pitch, angle);
            assert!(test.contains("angle > ") && test.contains(" and angle < "), "{angle}: {test}");
        }
        assert_eq!(tilt_test(TiltMode::Pitch, 1), "angle > 2048 and angle < 6144");
    }

    #[test]
    fn tilt_band_at_extremes_is_one_sided() {
        assert_eq!(tilt_test(TiltMode::Pitch, TILT_RESOLUTION), "angle > 14336");
        assert_eq!(tilt_test(TiltMode::Pitch, -TILT_RESOLUTION), "angle < -14336");
    }

    #[test]
    fn roll_negates_target() {
        assert_eq!(tilt_test(TiltMode::Roll, TILT_RESOLUTION), "angle < -14336");
        assert_eq!(tilt_test(TiltMode::Roll, -1), "angle > 2048 and angle < 6144");
        assert_eq!(
            pre_test(&EventBlock::Tilt { mode: TiltMode::Roll, angle: 0 }).as_deref(),
            Some("\tcall math.atan2(angle, acc[0], acc[2])\n")
        );
    }

    #[test]
    fn state_filter_terms_follow_slot_order() {
        let filter = StateFilter([StateSlot::On, StateSlot::Any, StateSlot::Off, StateSlot::Any]);
        assert_eq!(state_filter_test(&filter), "state[0] == 1 and state[2] == 0");
        assert_eq!(state_filter_conjunction(&filter), " and state[0] == 1 and state[2] == 0");
    }
}
