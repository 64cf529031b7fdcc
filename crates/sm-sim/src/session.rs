//! Explicit, serializable front-end state.
//!
//! Holds the parameter forms and playback position in one place. The
//! generator only ever sees a snapshot taken from it.

use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::params::{EquationKind, InitialConditions, SimulationOptions, SystemParameters};
use crate::playback::{Clock, Playback, PlaybackState};
use crate::presets::Example;
use crate::trajectory::{Trajectory, generate};

/// Default simulated window, in seconds.
pub const DEFAULT_STOP_TIME: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub system: SystemParameters,
    pub initial: InitialConditions,
    #[serde(default)]
    pub options: SimulationOptions,
    #[serde(default)]
    pub playback: PlaybackState,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            system: SystemParameters::new(1.0, 4.0, 0.0, EquationKind::Undamped),
            initial: InitialConditions::new(1.0, 0.0, 0.0, DEFAULT_STOP_TIME),
            options: SimulationOptions::default(),
            playback: PlaybackState::default(),
        }
    }
}

/// Inputs the generator runs on, copied out of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub system: SystemParameters,
    pub initial: InitialConditions,
    pub options: SimulationOptions,
}

impl Snapshot {
    pub fn generate(&self) -> SimResult<Trajectory> {
        generate(&self.system, &self.initial, &self.options)
    }
}

impl SessionState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            system: self.system.clone(),
            initial: self.initial,
            options: self.options,
        }
    }

    /// Load an example's parameters, keeping the time window.
    pub fn apply_example(&mut self, example: &Example) {
        self.system = example.parameters.system.clone();
        self.initial.y0 = example.parameters.y0;
        self.initial.v0 = example.parameters.v0;
        self.playback.frame = 0;
        self.playback.playing = false;
    }

    /// Run the generator on a snapshot and hand the result to `playback`,
    /// which rewinds to frame 0 and takes the session's speed.
    pub fn simulate<C: Clock>(&mut self, playback: &mut Playback<C>) -> SimResult<Trajectory> {
        let trajectory = self.snapshot().generate()?;
        playback.set_speed(self.playback.speed)?;
        playback.load(trajectory.len());
        self.capture(playback);
        Ok(trajectory)
    }

    /// Record the playback's current state.
    pub fn capture<C: Clock>(&mut self, playback: &Playback<C>) {
        self.playback = playback.state();
    }

    /// Restore a stopped playback (no trajectory is reloaded here).
    pub fn reset(&mut self) {
        self.playback.frame = 0;
        self.playback.playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::VirtualClock;
    use crate::presets::find_example;

    #[test]
    fn default_session_is_simple_oscillation() {
        let s = SessionState::default();
        assert_eq!(s.system.kind, EquationKind::Undamped);
        assert_eq!(s.initial.t_stop, 10.0);
        let traj = s.snapshot().generate().unwrap();
        assert_eq!(traj.len(), 1001);
    }

    #[test]
    fn simulate_rewinds_playback() {
        let clock = VirtualClock::new();
        let mut playback = Playback::new(clock);
        playback.load(10);
        playback.seek(5);

        let mut session = SessionState::default();
        let traj = session.simulate(&mut playback).unwrap();
        assert_eq!(playback.frame(), 0);
        assert_eq!(playback.frame_count(), traj.len());
        assert_eq!(session.playback.frame, 0);
    }

    #[test]
    fn simulate_keeps_session_speed() {
        let mut playback = Playback::new(VirtualClock::new());
        let mut session = SessionState::default();
        session.playback.speed = 2.0;

        session.simulate(&mut playback).unwrap();
        assert_eq!(playback.speed(), 2.0);
        assert_eq!(session.playback.speed, 2.0);

        // out-of-range speeds come back clamped
        session.playback.speed = 10.0;
        session.simulate(&mut playback).unwrap();
        assert_eq!(session.playback.speed, 4.0);
    }

    #[test]
    fn apply_example_keeps_window() {
        let mut s = SessionState::default();
        s.initial.t_stop = 4.0;
        s.apply_example(&find_example("Subamortiguado").unwrap());
        assert_eq!(s.system.mass, 2.0);
        assert_eq!(s.initial.y0, 2.0);
        assert_eq!(s.initial.t_stop, 4.0);
    }
}
