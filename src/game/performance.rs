//! Tick performance monitoring
//!
//! Tracks how long each engine tick takes against the tick budget so the
//! runner can report when a round is too large for real-time pacing.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Minimum samples before the status moves off `Nominal`
const MIN_SAMPLES: usize = 10;

/// Budget load levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickLoad {
    /// Comfortably inside the budget
    Nominal,
    /// Using most of the budget
    Strained,
    /// Ticks take longer than the budget on average
    Overrun,
}

/// Rolling tick duration monitor
pub struct TickMonitor {
    tick_durations: VecDeque<Duration>,
    max_samples: usize,
    /// Target tick duration (budget)
    budget: Duration,
    /// Fraction of budget above which load is `Strained`
    strained_threshold: f32,
    load: TickLoad,
    tick_start: Option<Instant>,
    ticks_recorded: u64,
}

impl TickMonitor {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            tick_durations: VecDeque::with_capacity(120),
            max_samples: 120,
            budget: Duration::from_secs_f32(1.0 / tick_rate.max(1) as f32),
            strained_threshold: 0.7,
            load: TickLoad::Nominal,
            tick_start: None,
            ticks_recorded: 0,
        }
    }

    /// Start timing a tick
    pub fn tick_start(&mut self) {
        self.tick_start = Some(Instant::now());
    }

    /// End timing a tick and record the duration
    pub fn tick_end(&mut self) {
        if let Some(start) = self.tick_start.take() {
            self.record_tick(start.elapsed());
        }
    }

    fn record_tick(&mut self, duration: Duration) {
        self.tick_durations.push_back(duration);
        while self.tick_durations.len() > self.max_samples {
            self.tick_durations.pop_front();
        }
        self.ticks_recorded += 1;
        self.update_load();
    }

    fn update_load(&mut self) {
        if self.tick_durations.len() < MIN_SAMPLES {
            return;
        }
        let ratio = self.budget_usage();
        self.load = if ratio >= 1.0 {
            TickLoad::Overrun
        } else if ratio >= self.strained_threshold {
            TickLoad::Strained
        } else {
            TickLoad::Nominal
        };
    }

    pub fn average_tick_duration(&self) -> Duration {
        if self.tick_durations.is_empty() {
            return Duration::ZERO;
        }
        let sum: Duration = self.tick_durations.iter().sum();
        sum / self.tick_durations.len() as u32
    }

    /// Get the 95th percentile tick duration
    pub fn p95_tick_duration(&self) -> Duration {
        if self.tick_durations.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted: Vec<_> = self.tick_durations.iter().copied().collect();
        sorted.sort();
        let idx = (sorted.len() as f32 * 0.95) as usize;
        sorted[idx.min(sorted.len() - 1)]
    }

    /// Average tick duration as a fraction of the budget
    pub fn budget_usage(&self) -> f32 {
        self.average_tick_duration().as_secs_f32() / self.budget.as_secs_f32()
    }

    pub fn load(&self) -> TickLoad {
        self.load
    }

    pub fn ticks_recorded(&self) -> u64 {
        self.ticks_recorded
    }

    pub fn status_message(&self) -> String {
        format!(
            "{:?} - {:.1}% budget (avg {:?}, p95 {:?})",
            self.load,
            self.budget_usage() * 100.0,
            self.average_tick_duration(),
            self.p95_tick_duration()
        )
    }
}

impl Default for TickMonitor {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_monitor_is_nominal() {
        let monitor = TickMonitor::new(60);
        assert_eq!(monitor.load(), TickLoad::Nominal);
        assert_eq!(monitor.average_tick_duration(), Duration::ZERO);
    }

    #[test]
    fn test_needs_samples_before_judging() {
        let mut monitor = TickMonitor::new(60);
        for _ in 0..5 {
            monitor.record_tick(Duration::from_millis(50));
        }
        assert_eq!(monitor.load(), TickLoad::Nominal);
    }

    #[test]
    fn test_load_levels() {
        // Budget at 60Hz is ~16.67ms
        let mut monitor = TickMonitor::new(60);
        for _ in 0..20 {
            monitor.record_tick(Duration::from_millis(2));
        }
        assert_eq!(monitor.load(), TickLoad::Nominal);

        let mut monitor = TickMonitor::new(60);
        for _ in 0..20 {
            monitor.record_tick(Duration::from_millis(13));
        }
        assert_eq!(monitor.load(), TickLoad::Strained);

        let mut monitor = TickMonitor::new(60);
        for _ in 0..20 {
            monitor.record_tick(Duration::from_millis(20));
        }
        assert_eq!(monitor.load(), TickLoad::Overrun);
    }

    #[test]
    fn test_p95() {
        let mut monitor = TickMonitor::new(60);
        for ms in 1..=20 {
            monitor.record_tick(Duration::from_millis(ms));
        }
        assert_eq!(monitor.p95_tick_duration(), Duration::from_millis(20));
    }

    #[test]
    fn test_tick_timing() {
        let mut monitor = TickMonitor::new(60);
        monitor.tick_start();
        std::thread::sleep(Duration::from_millis(1));
        monitor.tick_end();
        assert_eq!(monitor.ticks_recorded(), 1);
        assert!(monitor.average_tick_duration() >= Duration::from_millis(1));
    }
}
