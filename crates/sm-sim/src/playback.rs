//! Playback scheduling for the animation and chart cursor.
//!
//! A [`Playback`] advances a frame index through a loaded trajectory at a
//! fixed tick rate. Time comes from an injected [`Clock`], so tests drive it
//! with a [`VirtualClock`] instead of sleeping.
//!
//! Speed scales frames per tick, never the tick rate itself.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

pub const MIN_SPEED: f64 = 0.25;
pub const MAX_SPEED: f64 = 4.0;
/// Target tick rate of the animation loop.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 60;

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<Duration>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Result of one [`Playback::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Frame index after the tick.
    pub frame: usize,
    /// Frames advanced by this tick.
    pub advanced: usize,
    /// Playback reached the last frame and stopped during this tick.
    pub finished: bool,
}

/// Serializable snapshot of a playback's user-visible state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub frame: usize,
    pub playing: bool,
    pub speed: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            frame: 0,
            playing: false,
            speed: 1.0,
        }
    }
}

/// Frame scheduler over a trajectory of `frame_count` samples.
#[derive(Debug)]
pub struct Playback<C: Clock> {
    clock: C,
    interval: Duration,
    speed: f64,
    frame: usize,
    frame_count: usize,
    playing: bool,
    /// Clock reading the next interval is measured from.
    anchor: Duration,
    /// Fractional frames not yet applied.
    carry: f64,
}

impl<C: Clock> Playback<C> {
    /// Scheduler ticking [`DEFAULT_TICKS_PER_SECOND`] times per second.
    pub fn new(clock: C) -> Self {
        let interval = Duration::from_secs(1) / DEFAULT_TICKS_PER_SECOND;
        Self::with_interval(clock, interval)
    }

    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn with_interval(clock: C, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "tick interval must be positive");
        let anchor = clock.now();
        Self {
            clock,
            interval,
            speed: 1.0,
            frame: 0,
            frame_count: 0,
            playing: false,
            anchor,
            carry: 0.0,
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn last_frame(&self) -> usize {
        self.frame_count.saturating_sub(1)
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            frame: self.frame,
            playing: self.playing,
            speed: self.speed,
        }
    }

    /// Replace the trajectory. Frame goes back to 0 and a running schedule
    /// restarts from now.
    pub fn load(&mut self, frame_count: usize) {
        self.frame_count = frame_count;
        self.frame = 0;
        self.carry = 0.0;
        self.anchor = self.clock.now();
        if frame_count < 2 {
            self.playing = false;
        }
    }

    /// Begin advancing. Rewinds first when parked on the last frame.
    /// Returns whether playback is running afterwards.
    pub fn start(&mut self) -> bool {
        if self.frame_count < 2 {
            return false;
        }
        if self.frame >= self.last_frame() {
            self.frame = 0;
        }
        self.playing = true;
        self.carry = 0.0;
        self.anchor = self.clock.now();
        true
    }

    /// Halt advancing. Later ticks are no-ops until [`start`](Self::start).
    pub fn stop(&mut self) {
        self.playing = false;
        self.carry = 0.0;
    }

    /// Stop and rewind to the first frame.
    pub fn reset(&mut self) {
        self.stop();
        self.frame = 0;
    }

    pub fn seek(&mut self, frame: usize) {
        self.frame = frame.min(self.last_frame());
        self.carry = 0.0;
        self.anchor = self.clock.now();
    }

    /// Set the speed multiplier, clamped to `[MIN_SPEED, MAX_SPEED]`.
    /// Returns the applied value.
    pub fn set_speed(&mut self, speed: f64) -> SimResult<f64> {
        if !speed.is_finite() {
            return Err(SimError::NonFinite {
                what: "playback speed",
                value: speed,
            });
        }
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        Ok(self.speed)
    }

    /// Restore speed, frame and running flag from a snapshot.
    pub fn restore(&mut self, state: &PlaybackState) -> SimResult<()> {
        self.set_speed(state.speed)?;
        self.seek(state.frame);
        if state.playing {
            self.start();
        } else {
            self.stop();
        }
        Ok(())
    }

    /// Advance by the number of whole intervals elapsed since the last
    /// applied tick.
    pub fn tick(&mut self) -> Tick {
        let idle = Tick {
            frame: self.frame,
            advanced: 0,
            finished: false,
        };
        if !self.playing {
            return idle;
        }

        let now = self.clock.now();
        let elapsed = now.saturating_sub(self.anchor);
        let intervals = elapsed.as_nanos() / self.interval.as_nanos();
        if intervals == 0 {
            return idle;
        }
        let consumed = self.interval.as_nanos() * intervals;
        self.anchor += Duration::from_nanos(u64::try_from(consumed).unwrap_or(u64::MAX));

        let progress = self.carry + intervals as f64 * self.speed;
        let whole = progress.floor();
        self.carry = progress - whole;

        let before = self.frame;
        let target = before.saturating_add(whole as usize);
        self.frame = target.min(self.last_frame());

        let finished = self.frame >= self.last_frame();
        if finished {
            self.stop();
        }
        Tick {
            frame: self.frame,
            advanced: self.frame - before,
            finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn playback(frames: usize) -> (VirtualClock, Playback<VirtualClock>) {
        let clock = VirtualClock::new();
        let mut p = Playback::with_interval(clock.clone(), ms(10));
        p.load(frames);
        (clock, p)
    }

    #[test]
    fn ticks_advance_one_frame_per_interval() {
        let (clock, mut p) = playback(100);
        assert!(p.start());
        clock.advance(ms(10));
        assert_eq!(p.tick().advanced, 1);
        clock.advance(ms(35));
        let t = p.tick();
        assert_eq!(t.advanced, 3);
        assert_eq!(t.frame, 4);
        // the 5 ms remainder is kept for the next tick
        clock.advance(ms(5));
        assert_eq!(p.tick().frame, 5);
    }

    #[test]
    fn no_advance_before_an_interval_elapses() {
        let (clock, mut p) = playback(100);
        p.start();
        clock.advance(ms(9));
        assert_eq!(p.tick().advanced, 0);
        assert_eq!(p.frame(), 0);
    }

    #[test]
    fn stopped_playback_never_advances() {
        let (clock, mut p) = playback(100);
        p.start();
        clock.advance(ms(20));
        p.tick();
        p.stop();
        clock.advance(ms(1000));
        let t = p.tick();
        assert_eq!(t.advanced, 0);
        assert_eq!(p.frame(), 2);
        assert!(!p.is_playing());
    }

    #[test]
    fn speed_scales_frames_per_tick() {
        let (clock, mut p) = playback(100);
        p.set_speed(4.0).unwrap();
        p.start();
        clock.advance(ms(10));
        assert_eq!(p.tick().advanced, 4);

        p.set_speed(0.25).unwrap();
        let mut total = 0;
        for _ in 0..4 {
            clock.advance(ms(10));
            total += p.tick().advanced;
        }
        assert_eq!(total, 1);
    }

    #[test]
    fn speed_is_clamped() {
        let (_clock, mut p) = playback(10);
        assert_eq!(p.set_speed(10.0).unwrap(), MAX_SPEED);
        assert_eq!(p.set_speed(0.0).unwrap(), MIN_SPEED);
        assert!(p.set_speed(f64::NAN).is_err());
    }

    #[test]
    fn auto_stops_on_last_frame() {
        let (clock, mut p) = playback(5);
        p.start();
        clock.advance(ms(1000));
        let t = p.tick();
        assert_eq!(t.frame, 4);
        assert!(t.finished);
        assert!(!p.is_playing());

        // starting again rewinds
        assert!(p.start());
        assert_eq!(p.frame(), 0);
    }

    #[test]
    fn load_resets_frame_and_restarts_schedule() {
        let (clock, mut p) = playback(100);
        p.start();
        clock.advance(ms(95));
        p.tick();
        assert_eq!(p.frame(), 9);

        clock.advance(ms(7));
        p.load(50);
        assert_eq!(p.frame(), 0);
        assert!(p.is_playing());
        // leftover 2 ms + 7 ms from before the reload do not count
        clock.advance(ms(9));
        assert_eq!(p.tick().advanced, 0);
        clock.advance(ms(1));
        assert_eq!(p.tick().advanced, 1);
    }

    #[test]
    fn single_frame_trajectory_cannot_play() {
        let (_clock, mut p) = playback(1);
        assert!(!p.start());
        assert!(!p.is_playing());
    }

    #[test]
    fn restore_applies_snapshot() {
        let (_clock, mut p) = playback(20);
        p.restore(&PlaybackState {
            frame: 7,
            playing: true,
            speed: 2.0,
        })
        .unwrap();
        assert_eq!(p.frame(), 7);
        assert!(p.is_playing());
        assert_eq!(p.state().speed, 2.0);
    }

    #[test]
    fn default_interval_is_sixty_hertz() {
        let p = Playback::new(VirtualClock::new());
        assert_eq!(p.interval(), Duration::from_secs(1) / 60);
    }
}
