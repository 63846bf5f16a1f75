/// Fixed-tick scheduling
///
/// The simulation advances in whole unit ticks (integrate, then advance
/// animation). This turns elapsed wall time into a number of ticks to run,
/// carrying the remainder over to the next frame.
use crate::engine::config::EngineConfig;
use std::time::{Duration, Instant};

/// Converts wall time into simulation ticks
pub struct TickScheduler {
    /// Wall time covered by one tick
    tick_duration: Duration,

    /// Cap on ticks per frame so a stall cannot spiral
    max_ticks_per_frame: u32,

    /// Time not yet consumed by a tick
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    paused: bool,

    frame_count: u64,

    tick_count: u64,
}

impl TickScheduler {
    /// Create a scheduler running `ticks_per_second` ticks
    pub fn new(ticks_per_second: u32, max_ticks_per_frame: u32) -> Self {
        Self {
            tick_duration: Duration::from_secs(1) / ticks_per_second.max(1),
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_count: 0,
            tick_count: 0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.ticks_per_second, config.max_ticks_per_frame)
    }

    /// Begin a new frame using the wall clock, returns the number of ticks to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance_by(elapsed)
    }

    /// Account for `elapsed` wall time, returns the number of ticks to run
    pub fn advance_by(&mut self, elapsed: Duration) -> u32 {
        self.frame_count += 1;

        if self.paused {
            return 0;
        }

        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.tick_duration && ticks < self.max_ticks_per_frame {
            self.accumulator -= self.tick_duration;
            ticks += 1;
        }

        // Drop whatever the cap left behind instead of replaying it later
        if ticks == self.max_ticks_per_frame && self.accumulator >= self.tick_duration {
            log::debug!(
                "Tick cap hit, dropping {:?} of simulation time",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += ticks as u64;
        ticks
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent a tick burst
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Simulation resumed");
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
