//! Pointer state and release debouncing
//!
//! Resistive panels read through an ADC produce spurious zero-pressure
//! samples mid-touch. Since touch is polled periodically, the fix is
//! to believe a release only after several consecutive below-threshold
//! polls; until then the pointer counts as still pressed.

/// Consecutive below-threshold polls required before a release is real
pub const RELEASE_DEBOUNCE_POLLS: u8 = 4;

/// Press state of the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchPhase {
    Pressed,
    #[default]
    Released,
}

/// One normalized pointer sample handed to the toolkit per poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerSample {
    pub phase: TouchPhase,
    /// Last contact point in display coordinates, valid even while
    /// released
    pub x: u16,
    pub y: u16,
    /// The caller should poll again immediately; more controller
    /// samples are queued
    pub more_pending: bool,
}

/// Pointer state owned by the touch normalizer
///
/// Mutated once per poll, never rolled back.
#[derive(Debug, Clone, Copy)]
pub struct PointerState {
    phase: TouchPhase,
    last_x: u16,
    last_y: u16,
    release_count: u8,
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerState {
    pub const fn new() -> Self {
        Self {
            phase: TouchPhase::Released,
            last_x: 0,
            last_y: 0,
            release_count: 0,
        }
    }

    /// Record a valid press at a calibrated point.
    ///
    /// Resets the release counter and caches the point as the last
    /// contact position.
    pub fn press(&mut self, x: u16, y: u16) {
        self.release_count = 0;
        self.phase = TouchPhase::Pressed;
        self.last_x = x;
        self.last_y = y;
    }

    /// Record an unambiguous release (FIFO controllers report these
    /// directly). The last contact point is kept.
    pub fn release(&mut self) {
        self.phase = TouchPhase::Released;
    }

    /// Record one below-threshold ADC poll.
    ///
    /// The counter saturates at 255; the release is believed once it
    /// reaches [`RELEASE_DEBOUNCE_POLLS`], before that the pointer is
    /// still reported pressed.
    pub fn below_threshold(&mut self) {
        self.release_count = self.release_count.saturating_add(1);
        self.phase = if self.release_count >= RELEASE_DEBOUNCE_POLLS {
            TouchPhase::Released
        } else {
            TouchPhase::Pressed
        };
    }

    pub fn phase(&self) -> TouchPhase {
        self.phase
    }

    /// Snapshot the state into a toolkit-facing sample
    pub fn sample(&self, more_pending: bool) -> PointerSample {
        PointerSample {
            phase: self.phase,
            x: self.last_x,
            y: self.last_y,
            more_pending,
        }
    }
}
