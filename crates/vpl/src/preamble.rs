//! Shared initialisation and runtime support code.
//!
//! Emitted once per program, in front of the first handler, and only for the
//! features the rules actually used.

use crate::features::Features;

/// Samples in the sine wave loaded into the sound synthesizer.
pub const WAVE_SAMPLES: usize = 142;
/// Microphone level counted as a clap.
pub const MIC_THRESHOLD: i32 = 250;

const STATE_VARIABLES: &str = "\
# variables for state
var state[4] = [0,0,0,0]
var new_state[4] = [0,0,0,0]

";

const ANGLE_VARIABLE: &str = "\
# variable for angle
var angle
";

const TIMER_STOP: &str = "\
# stop timer 0
timer.period[0] = 0
";

const OUTPUT_RESET: &str = "\
# reset outputs
call sound.system(-1)
call leds.top(0,0,0)
call leds.bottom.left(0,0,0)
call leds.bottom.right(0,0,0)
call leds.circle(0,0,0,0,0,0,0,0)
";

const DISPLAY_STATE_SUB: &str = "
# subroutine to display the current state
sub display_state
\tcall leds.circle(0,state[1]*32,0,state[3]*32,0,state[2]*32,0,state[0]*32)
";

/// Text placed before the first segment.
pub fn initialisation_code(advanced_mode: bool, features: Features) -> String {
    let mut text = String::new();
    if advanced_mode {
        text.push_str(STATE_VARIABLES);
    }
    if features.tilt_angle {
        text.push_str(ANGLE_VARIABLE);
    }
    if features.sound {
        text.push_str(&sound_setup());
    }
    if features.timer {
        text.push_str(TIMER_STOP);
    }
    if features.microphone {
        text.push_str("# setup threshold for detecting claps\n");
        text.push_str(&format!("mic.threshold = {MIC_THRESHOLD}\n"));
    }
    text.push_str(OUTPUT_RESET);
    if advanced_mode {
        text.push_str(DISPLAY_STATE_SUB);
    }
    if features.sound {
        text.push_str(&note_queue_handler());
    }
    text
}

/// Note buffers plus a sine wave computed on the robot.
fn sound_setup() -> String {
    let last = WAVE_SAMPLES - 1;
    let middle = WAVE_SAMPLES / 2 - 1;
    format!(
        "# variables for notes\n\
         var notes[{notes}]\n\
         var durations[{notes}]\n\
         var note_index = {notes}\n\
         var wave[{WAVE_SAMPLES}]\n\
         var i\n\
         var wave_phase\n\
         var wave_intensity\n\
         \n\
         # compute a sinus wave for sound\n\
         for i in 0:{last} do\n\
         \twave_phase = (i-{middle})*468\n\
         \tcall math.cos(wave_intensity, wave_phase)\n\
         \twave[i] = wave_intensity/256\n\
         end\n\
         call sound.wave(wave)\n",
        notes = crate::block::SOUND_NOTES,
    )
}

/// Plays queued notes one after the other until the queue is exhausted.
fn note_queue_handler() -> String {
    format!(
        "\n# when a note is finished, play the next note\n\
         onevent sound.finished\n\
         \tif note_index != {notes} then\n\
         \t\tcall sound.freq(notes[note_index], durations[note_index])\n\
         \t\tnote_index += 1\n\
         \tend\n",
        notes = crate::block::SOUND_NOTES,
    )
}
