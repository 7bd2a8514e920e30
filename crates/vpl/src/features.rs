//! Usage markers for shared runtime support code.

/// A piece of runtime support that must be emitted once per program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Sound,
    Timer,
    Microphone,
    TiltAngle,
}

/// Feature flags collected during one compile. Flags only ever go from
/// `false` to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    pub sound: bool,
    pub timer: bool,
    pub microphone: bool,
    pub tilt_angle: bool,
}

impl Features {
    pub fn insert(&mut self, feature: Feature) {
        match feature {
            Feature::Sound => self.sound = true,
            Feature::Timer => self.timer = true,
            Feature::Microphone => self.microphone = true,
            Feature::TiltAngle => self.tilt_angle = true,
        }
    }

    pub fn contains(&self, feature: Feature) -> bool {
        match feature {
            Feature::Sound => self.sound,
            Feature::Timer => self.timer,
            Feature::Microphone => self.microphone,
            Feature::TiltAngle => self.tilt_angle,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Features::default()
    }
}
