//! Periodic timer and toolkit clock traits

use crate::timer::TimerConfig;

/// A hardware timer capable of firing a periodic interrupt
///
/// One implementation exists per supported hardware family; the glue
/// only ever drives it through this capability. The interrupt handler
/// itself is registered by the platform crate and must do nothing but
/// forward to the glue's tick handler.
pub trait PeriodicTimer {
    /// Input clock rate of the timer peripheral in Hz
    fn base_clock_hz(&self) -> u32;

    /// Width of the timer's counter register in bits
    fn counter_bits(&self) -> u8;

    /// Program the prescaler and compare value
    fn configure(&mut self, config: &TimerConfig);

    /// Enable the compare-match interrupt and start counting
    fn enable(&mut self);

    /// Stop the timer and disable its interrupt
    fn disable(&mut self);
}

/// The toolkit's internal millisecond clock
///
/// Advanced once per timer interrupt. Implementations must be safe to
/// call from interrupt context; the glue guarantees it performs no
/// other work there.
pub trait TickSink {
    /// Advance the clock by `ms` milliseconds
    fn tick_inc(&self, ms: u32);
}
