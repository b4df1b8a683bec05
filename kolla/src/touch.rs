//! Touch input normalizer
//!
//! Reads raw controller samples, calibrates and rotates them into
//! display coordinates, debounces releases and produces the pointer
//! samples the toolkit polls for. The controller kind is chosen once
//! at configuration time; the ADC kind lives on its own pins while the
//! FIFO kind shares the display bus and needs the bus handoff before
//! every access.

use embedded_hal::delay::DelayNs;
use kolla_core::calibration::{ADC_PROFILE, FIFO_PROFILE};
use kolla_core::pointer::{PointerSample, PointerState};
use kolla_core::traits::display::{BusRelease, DisplayBus};
use kolla_core::traits::touch::{AdcTouchController, BufferedTouchController, NoTouch};

/// Panels with this many pixels on a side have their raw X axis
/// mirrored before calibration (measured on the wide-format panels;
/// the raw axis runs the other way there)
pub const WIDE_PANEL_DIM: u16 = 480;

/// The configured touch controller, if any
pub enum TouchSource<A, B, D> {
    /// Passive widget display, no input device
    None,
    /// Resistive panel on ADC pins
    Adc(A),
    /// FIFO controller on the shared bus
    Buffered {
        controller: B,
        delay: D,
        /// Pause after draining the last queued sample, in ms.
        ///
        /// Workaround for one controller/architecture pairing whose
        /// FIFO-depth register lags freshly queued samples and fakes a
        /// release. Not fully understood; 0 disables it, and only the
        /// affected platform should set it.
        post_drain_delay_ms: u32,
    },
}

/// Delay provider for configurations that never delay
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Touch source type for passive display configurations
pub type PassiveTouch = TouchSource<NoTouch, NoTouch, NoopDelay>;

/// The passive source, spelled as a value
pub const fn no_touch() -> PassiveTouch {
    TouchSource::None
}

/// Touch input normalizer
pub struct TouchNormalizer<A, B, D> {
    source: TouchSource<A, B, D>,
    state: PointerState,
    mirror_raw_x: bool,
}

impl<A, B, D> TouchNormalizer<A, B, D>
where
    A: AdcTouchController,
    B: BufferedTouchController,
    D: DelayNs,
{
    /// Wrap a touch source for a display of the given physical size
    pub fn new(source: TouchSource<A, B, D>, width: u16, height: u16) -> Self {
        Self {
            source,
            state: PointerState::new(),
            mirror_raw_x: width == WIDE_PANEL_DIM || height == WIDE_PANEL_DIM,
        }
    }

    /// Whether an input device is configured
    pub fn has_touch(&self) -> bool {
        !matches!(self.source, TouchSource::None)
    }

    /// Produce one pointer sample.
    ///
    /// `more_pending` in the returned sample asks the caller to poll
    /// again immediately without yielding; only the FIFO kind ever
    /// sets it.
    pub fn poll<Bus: DisplayBus>(&mut self, bus: &mut Bus) -> PointerSample {
        match &mut self.source {
            TouchSource::None => self.state.sample(false),

            TouchSource::Adc(controller) => {
                let p = controller.read_point();
                if p.z < controller.pressure_threshold() {
                    // Zero-ish pressure: tentative release, debounced
                    self.state.below_threshold();
                } else {
                    let (x, y) =
                        ADC_PROFILE.map(bus.rotation(), p, bus.width(), bus.height());
                    self.state.press(x, y);
                }
                self.state.sample(false)
            }

            TouchSource::Buffered {
                controller,
                delay,
                post_drain_delay_ms,
            } => {
                // The controller shares the bus with the display; wait
                // out any in-flight transfer and end that transaction
                // before talking to it.
                bus.release_bus();

                let fifo = controller.buffered_len();
                if fifo > 0 {
                    let mut p = controller.read_point();
                    if self.mirror_raw_x {
                        p.x = FIFO_PROFILE.x_range.mirror(p.x);
                    }
                    let (x, y) =
                        FIFO_PROFILE.map(bus.rotation(), p, bus.width(), bus.height());
                    self.state.press(x, y);

                    let more = fifo > 1;
                    if !more && *post_drain_delay_ms > 0 {
                        // Give late FIFO entries a moment to land
                        delay.delay_ms(*post_drain_delay_ms);
                    }
                    self.state.sample(more)
                } else {
                    self.state.release();
                    self.state.sample(false)
                }
            }
        }
    }

    /// Hand the controller back (teardown)
    pub fn into_source(self) -> TouchSource<A, B, D> {
        self.source
    }
}
