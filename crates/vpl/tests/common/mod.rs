//! Example programs for the integration tests.
//! Built programmatically, the way the editor would assemble them.

#![allow(dead_code)]

use vpl::{Block, Note, Program, Rule, SensorTest, StateSlot, TiltMode};

pub fn forward() -> Block {
    Block::buttons([true, false, false, false, false])
}

pub fn backward() -> Block {
    Block::buttons([false, false, true, false, false])
}

pub fn any_button() -> Block {
    Block::buttons([false; 5])
}

pub fn near_front(slot: usize) -> Block {
    let mut sensors = [SensorTest::Any; 7];
    sensors[slot] = SensorTest::Below;
    Block::prox(sensors)
}

pub fn any_prox() -> Block {
    Block::prox([SensorTest::Any; 7])
}

pub fn stop() -> Block {
    Block::move_robot(0, 0)
}

pub fn melody() -> Block {
    Block::sound([
        Note::new(0, 1),
        Note::new(2, 1),
        Note::new(4, 2),
        Note::new(2, 1),
        Note::new(0, 1),
        Note::new(0, 0),
    ])
}

/// Forward button drives both wheels at 5.
pub fn button_forward_move() -> Program {
    Program::new(false).with_rule(Rule::new(forward()).with_action(Block::move_robot(5, 5)))
}

/// Unconditional stop on every proximity update, then a red light when
/// something is close to the front-left sensor.
pub fn prox_stop_then_near() -> Program {
    Program::new(false)
        .with_rule(Rule::new(any_prox()).with_action(stop()))
        .with_rule(Rule::new(near_front(0)).with_action(Block::top_color(32, 0, 0)))
}

/// Same rules in the opposite visual order.
pub fn prox_near_then_stop() -> Program {
    Program::new(false)
        .with_rule(Rule::new(near_front(0)).with_action(Block::top_color(32, 0, 0)))
        .with_rule(Rule::new(any_prox()).with_action(stop()))
}

/// Buttons and claps interleaved, so later button rules are inserted in
/// front of the clap handler.
pub fn interleaved_buckets() -> Program {
    Program::new(false)
        .with_rule(Rule::new(forward()).with_action(Block::move_robot(200, 200)))
        .with_rule(Rule::new(Block::clap()).with_action(Block::top_color(0, 32, 0)))
        .with_rule(Rule::new(backward()).with_action(Block::move_robot(-200, -200)))
        .with_rule(Rule::new(Block::timeout()).with_action(stop()))
        .with_rule(Rule::new(any_button()).with_action(Block::bottom_color(0, 0, 32)))
}

/// Two states toggled by the arrow buttons, with a state-filtered clap.
pub fn advanced_toggle() -> Program {
    let off = [StateSlot::Off, StateSlot::Any, StateSlot::Any, StateSlot::Any];
    let on = [StateSlot::On, StateSlot::Any, StateSlot::Any, StateSlot::Any];
    Program::new(true)
        .with_rule(
            Rule::new(forward())
                .with_state_filter(Block::state_filter(off))
                .with_action(Block::set_state(on)),
        )
        .with_rule(
            Rule::new(backward())
                .with_state_filter(Block::state_filter(on))
                .with_action(Block::set_state(off)),
        )
        .with_rule(
            Rule::new(Block::clap())
                .with_state_filter(Block::state_filter(on))
                .with_action(melody()),
        )
}

/// One rule per card kind; touches every feature.
pub fn every_card() -> Program {
    Program::new(false)
        .with_rule(Rule::new(forward()).with_action(Block::move_robot(300, 300)))
        .with_rule(Rule::new(near_front(2)).with_action(stop()))
        .with_rule(Rule::new(Block::prox_ground([SensorTest::Above, SensorTest::Any])).with_action(Block::move_robot(-100, -100)))
        .with_rule(Rule::new(Block::tap()).with_action(melody()))
        .with_rule(Rule::new(Block::acc(TiltMode::Pitch, 2)).with_action(Block::top_color(0, 0, 32)))
        .with_rule(Rule::new(Block::acc(TiltMode::Tap, 0)).with_action(Block::bottom_color(32, 32, 0)))
        .with_rule(Rule::new(Block::clap()).with_action(Block::timer(1000)))
        .with_rule(Rule::new(Block::timeout()).with_action(stop()))
}
