//! Tick timer bridge
//!
//! Programs a hardware timer to interrupt at a fixed period and
//! advances the toolkit's millisecond clock from the interrupt. The
//! interrupt path does nothing else: it must not touch the shared bus,
//! the draw buffer or touch state, since a transfer may be mid-flight
//! when it fires.

use core::sync::atomic::{AtomicU32, Ordering};

use kolla_core::timer::{TimerConfig, TimerError};
use kolla_core::traits::timer::{PeriodicTimer, TickSink};

/// Recommended tick interval; 1 to 10 ms are acceptable
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 10;

/// Tick timer bridge
///
/// `new` moves the timer from unconfigured to running in one step;
/// there are no further states. [`TickBridge::release`] stops the
/// timer and hands it back.
pub struct TickBridge<T: PeriodicTimer> {
    timer: T,
    config: TimerConfig,
}

impl<T: PeriodicTimer> TickBridge<T> {
    /// Resolve the divider/compare pair for the timer and start it.
    ///
    /// Fails when no supported divider reaches the requested interval
    /// within the timer's counter width; callers must treat that as
    /// fatal, the toolkit cannot track timeouts or animations without
    /// its clock.
    pub fn new(mut timer: T, interval_ms: u32) -> Result<Self, TimerError> {
        let config =
            TimerConfig::resolve(timer.base_clock_hz(), timer.counter_bits(), interval_ms)?;
        timer.configure(&config);
        timer.enable();
        Ok(Self { timer, config })
    }

    /// The resolved configuration the timer was programmed with
    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// Advance the toolkit clock by one tick interval.
    ///
    /// This is the interrupt-side entry point; forward the timer's
    /// compare-match interrupt here and do nothing else in the
    /// handler.
    pub fn on_tick(&self, sink: &impl TickSink) {
        sink.tick_inc(self.config.interval_ms);
    }

    /// Stop the timer, disable its interrupt and hand it back
    pub fn release(mut self) -> T {
        self.timer.disable();
        self.timer
    }
}

/// Atomic millisecond clock
///
/// For toolkits that let the adapter own timekeeping: give the ISR a
/// `&'static TickCounter` and poll [`TickCounter::elapsed_ms`] from
/// the foreground loop.
#[derive(Debug, Default)]
pub struct TickCounter(AtomicU32);

impl TickCounter {
    pub const fn new() -> Self {
        Self(AtomicU32::new(0))
    }

    /// Milliseconds accumulated since construction (wraps at `u32::MAX`)
    pub fn elapsed_ms(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

impl TickSink for TickCounter {
    fn tick_inc(&self, ms: u32) {
        self.0.fetch_add(ms, Ordering::Relaxed);
    }
}
