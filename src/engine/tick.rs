/// Fixed-step tick scheduling
///
/// Converts irregular wall-clock frames into a whole number of fixed input
/// ticks, so `InputManager::update` runs at a steady rate no matter how
/// often the window wakes up.
use std::time::{Duration, Instant};

/// Default tick rate (60 ticks per second)
pub const DEFAULT_TICKS_PER_SECOND: u32 = 60;

/// Maximum ticks per frame, so a stall doesn't cause a burst of catch-up ticks
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Fixed-step scheduler state
#[derive(Debug)]
pub struct TickScheduler {
    step: Duration,
    /// Time not yet consumed by a tick
    accumulator: Duration,
    last_frame_time: Instant,
    paused: bool,
    frame_count: u64,
    tick_count: u64,
}

impl TickScheduler {
    /// Create a scheduler ticking at `ticks_per_second` (at least 1)
    pub fn new(ticks_per_second: u32) -> Self {
        Self::starting_at(ticks_per_second, Instant::now())
    }

    /// Create a scheduler whose first frame is measured from `start`
    pub fn starting_at(ticks_per_second: u32, start: Instant) -> Self {
        let step = Duration::from_secs(1) / ticks_per_second.max(1);
        Self {
            step,
            accumulator: Duration::ZERO,
            last_frame_time: start,
            paused: false,
            frame_count: 0,
            tick_count: 0,
        }
    }

    /// Begin a new frame now, returns the number of ticks to run
    pub fn begin_frame(&mut self) -> u32 {
        self.begin_frame_at(Instant::now())
    }

    /// Begin a new frame at `now`, returns the number of ticks to run
    pub fn begin_frame_at(&mut self, now: Instant) -> u32 {
        let frame_time = now.saturating_duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;

        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < MAX_TICKS_PER_FRAME {
            self.accumulator -= self.step;
            ticks += 1;
        }

        // Drop whatever a stall left behind instead of carrying it forward
        if ticks == MAX_TICKS_PER_FRAME && self.accumulator >= self.step {
            log::debug!("Tick scheduler fell behind by {:?}", self.accumulator);
            self.accumulator = Duration::ZERO;
        }

        self.tick_count += u64::from(ticks);
        ticks
    }

    /// Duration of one tick
    pub fn step(&self) -> Duration {
        self.step
    }

    /// When the next tick is due, for `ControlFlow::WaitUntil`
    pub fn next_tick_at(&self) -> Instant {
        self.last_frame_time + self.step.saturating_sub(self.accumulator)
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
            log::info!("Ticks paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent a tick burst
            self.accumulator = Duration::ZERO;
            log::info!("Ticks resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_TICKS_PER_SECOND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_scheduler_creation() {
        let scheduler = TickScheduler::new(100);
        assert_eq!(scheduler.step(), ms(10));
        assert_eq!(scheduler.frame_count(), 0);
        assert_eq!(scheduler.tick_count(), 0);
        assert!(!scheduler.is_paused());
    }

    #[test]
    fn test_zero_rate_is_clamped() {
        let scheduler = TickScheduler::new(0);
        assert_eq!(scheduler.step(), Duration::from_secs(1));
    }

    #[test]
    fn test_ticks_accumulate_across_frames() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::starting_at(100, start);

        assert_eq!(scheduler.begin_frame_at(start + ms(4)), 0);
        assert_eq!(scheduler.begin_frame_at(start + ms(12)), 1);
        assert_eq!(scheduler.begin_frame_at(start + ms(35)), 2);
        assert_eq!(scheduler.tick_count(), 3);
        assert_eq!(scheduler.frame_count(), 3);
    }

    #[test]
    fn test_max_ticks_per_frame() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::starting_at(100, start);

        // 300ms would allow 30 ticks
        assert_eq!(scheduler.begin_frame_at(start + ms(300)), MAX_TICKS_PER_FRAME);
        // The backlog is dropped, not replayed
        assert_eq!(scheduler.begin_frame_at(start + ms(305)), 0);
    }

    #[test]
    fn test_pause_resume() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::starting_at(100, start);

        scheduler.pause();
        assert!(scheduler.is_paused());
        assert_eq!(scheduler.begin_frame_at(start + ms(50)), 0);

        scheduler.resume();
        assert!(!scheduler.is_paused());
        assert_eq!(scheduler.begin_frame_at(start + ms(60)), 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut scheduler = TickScheduler::default();
        scheduler.toggle_pause();
        assert!(scheduler.is_paused());
        scheduler.toggle_pause();
        assert!(!scheduler.is_paused());
    }

    #[test]
    fn test_next_tick_at() {
        let start = Instant::now();
        let mut scheduler = TickScheduler::starting_at(100, start);
        assert_eq!(scheduler.next_tick_at(), start + ms(10));

        scheduler.begin_frame_at(start + ms(14));
        assert_eq!(scheduler.next_tick_at(), start + ms(20));
    }
}
