use crate::kinds::{ActionBlock, StateSlot};

use super::Indent;

/// Statements of one action card, each line prefixed with `indent`.
pub fn action_code(action: &ActionBlock, indent: Indent) -> String {
    let indent = indent.as_str();
    statements(action)
        .into_iter()
        .map(|statement| format!("{indent}{statement}\n"))
        .collect()
}

fn statements(action: &ActionBlock) -> Vec<String> {
    match action {
        ActionBlock::Move { left, right } => vec![
            format!("motor.left.target = {left}"),
            format!("motor.right.target = {right}"),
        ],
        ActionBlock::TopColor([r, g, b]) => vec![format!("call leds.top({r},{g},{b})")],
        ActionBlock::BottomColor([r, g, b]) => vec![
            format!("call leds.bottom.left({r},{g},{b})"),
            format!("call leds.bottom.right({r},{g},{b})"),
        ],
        ActionBlock::Sound(notes) => {
            let frequencies = join(notes.iter().map(|note| note.frequency()));
            let durations = join(notes.iter().map(|note| note.duration_ticks()));
            vec![
                format!("call math.copy(notes, [{frequencies}])"),
                format!("call math.copy(durations, [{durations}])"),
                "call sound.freq(notes[0], durations[0])".to_owned(),
                "note_index = 1".to_owned(),
            ]
        }
        ActionBlock::Timer { period } => vec![format!("timer.period[0] = {period}")],
        ActionBlock::SetState(slots) => slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                StateSlot::On => Some(format!("new_state[{index}] = 1")),
                StateSlot::Off => Some(format!("new_state[{index}] = 0")),
                StateSlot::Any => None,
            })
            .collect(),
    }
}

fn join(values: impl Iterator<Item = i32>) -> String {
    values.map(|value| value.to_string()).collect::<Vec<_>>().join(", ")
}
