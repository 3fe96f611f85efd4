//! Service-phase clock multiplexing the 1-second tick timer and the arrival timer.
//!
//! Both timers live inside the clock, and the clock lives inside the session,
//! so closing the session silences both at once. Timer firings are computed
//! as `k * interval` rather than by accumulation so long days do not drift.
use serde::{Deserialize, Serialize};

use crate::constants::TICK_SECS;
use crate::numbers::i64_to_f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockEvent {
    Tick,
    Spawn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceClock {
    now: f64,
    ticks_fired: i64,
    spawn_interval: Option<f64>,
    spawns_fired: i64,
}

impl ServiceClock {
    /// Clock for a day of `day_length_secs` expecting `arrival_total` customers.
    /// Zero expected arrivals disables the spawner outright.
    #[must_use]
    pub fn new(day_length_secs: u32, arrival_total: u32) -> Self {
        let spawn_interval =
            (arrival_total > 0).then(|| f64::from(day_length_secs) / f64::from(arrival_total));
        Self {
            now: 0.0,
            ticks_fired: 0,
            spawn_interval,
            spawns_fired: 0,
        }
    }

    #[must_use]
    pub const fn now(&self) -> f64 {
        self.now
    }

    #[must_use]
    pub const fn spawn_interval(&self) -> Option<f64> {
        self.spawn_interval
    }

    #[must_use]
    pub fn next_tick_at(&self) -> f64 {
        i64_to_f64(self.ticks_fired + 1) * TICK_SECS
    }

    #[must_use]
    pub fn next_spawn_at(&self) -> Option<f64> {
        self.spawn_interval
            .map(|interval| i64_to_f64(self.spawns_fired + 1) * interval)
    }

    /// Pop the earliest event due at or before `until`, moving the clock to it.
    /// When both timers fire together the tick goes first.
    pub fn next_due(&mut self, until: f64) -> Option<ClockEvent> {
        let tick_at = self.next_tick_at();
        let spawn_at = self.next_spawn_at().unwrap_or(f64::INFINITY);
        let (event, at) = if tick_at <= spawn_at {
            (ClockEvent::Tick, tick_at)
        } else {
            (ClockEvent::Spawn, spawn_at)
        };
        if at > until {
            return None;
        }
        self.now = self.now.max(at);
        match event {
            ClockEvent::Tick => self.ticks_fired += 1,
            ClockEvent::Spawn => self.spawns_fired += 1,
        }
        Some(event)
    }

    /// Fire the tick timer immediately, for hosts that own their own 1 s timer.
    pub fn fire_tick(&mut self) -> f64 {
        let at = self.next_tick_at();
        self.ticks_fired += 1;
        self.now = self.now.max(at);
        self.now
    }

    /// Count a spawn fired by the host's own arrival timer, so the scheduled
    /// spawner skips that slot and the day total stays the same.
    pub fn record_spawn(&mut self) {
        if self.spawn_interval.is_some() {
            self.spawns_fired += 1;
        }
    }

    /// Move the clock forward without firing anything.
    pub fn advance_to(&mut self, at: f64) {
        if at.is_finite() {
            self.now = self.now.max(at);
        }
    }
}
