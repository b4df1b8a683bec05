//! Hardware timer prescaler/compare resolution
//!
//! Turns a requested tick interval into a (divider, compare) pair for
//! a concrete timer peripheral, given its input clock and counter
//! width. Derived fresh for every platform; nothing here is tied to
//! one chip.

/// Divider candidates, searched in increasing order.
///
/// These are the prescaler steps common to the supported timer
/// peripherals; a platform whose timer lacks one of these steps simply
/// never reports a configuration using it as resolvable.
pub const DIVIDERS: [u32; 8] = [1, 2, 4, 8, 16, 64, 256, 1024];

/// Timer resolution failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Interval of 0 ms, or longer than 1000 ms (frequency rounds to 0)
    InvalidInterval,
    /// No supported divider yields a compare value the counter can hold
    UnreachableFrequency,
}

/// A resolved periodic timer configuration
///
/// Computed once at setup and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    /// Requested tick interval in milliseconds
    pub interval_ms: u32,
    /// Target interrupt frequency in Hz (1000 / interval)
    pub frequency_hz: u32,
    /// Chosen clock divider (prescaler)
    pub divider: u32,
    /// Compare-match value at the divided clock rate
    pub compare: u32,
}

impl TimerConfig {
    /// Resolve the smallest divider whose compare value fits the
    /// counter.
    ///
    /// `compare = (base_clock / divider) / frequency`; a value of 0 or
    /// 1 cannot fire reliably and counts as unreachable, as does one
    /// exceeding `2^counter_bits - 1`.
    pub fn resolve(
        base_clock_hz: u32,
        counter_bits: u8,
        interval_ms: u32,
    ) -> Result<Self, TimerError> {
        if interval_ms == 0 {
            return Err(TimerError::InvalidInterval);
        }
        let frequency_hz = 1000 / interval_ms;
        if frequency_hz == 0 {
            return Err(TimerError::InvalidInterval);
        }

        let max_count = if counter_bits >= 32 {
            u32::MAX
        } else {
            (1u32 << counter_bits) - 1
        };

        for divider in DIVIDERS {
            let compare = base_clock_hz / divider / frequency_hz;
            if compare >= 2 && compare <= max_count {
                return Ok(Self {
                    interval_ms,
                    frequency_hz,
                    divider,
                    compare,
                });
            }
        }

        Err(TimerError::UnreachableFrequency)
    }
}
