//! Touch controller traits
//!
//! Two controller kinds exist on the supported boards: a resistive
//! panel read through an ADC (one immediate sample per poll, no
//! queueing) and a capacitive/resistive controller on the shared SPI
//! bus with an internal sample FIFO. The glue selects one kind at
//! configuration time and never switches.

/// One raw sample from a touch controller, in controller units.
///
/// `z` is the raw pressure reading; for FIFO controllers it is
/// reported but unused by the glue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPoint {
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

impl RawPoint {
    pub const fn new(x: u16, y: u16, z: u16) -> Self {
        Self { x, y, z }
    }
}

/// Resistive touch panel read through an ADC
pub trait AdcTouchController {
    /// Take one immediate sample. Always succeeds; a sample with
    /// pressure below [`pressure_threshold`](Self::pressure_threshold)
    /// is a tentative release.
    fn read_point(&mut self) -> RawPoint;

    /// Pressure value below which a sample counts as "not touched"
    fn pressure_threshold(&self) -> u16;
}

/// Touch controller with an internal sample FIFO on the shared bus
///
/// Callers must release the display bus before invoking either method;
/// the controller shares the bus with the display.
pub trait BufferedTouchController {
    /// Number of samples currently queued in the controller FIFO
    fn buffered_len(&mut self) -> u8;

    /// Pop the oldest queued sample
    fn read_point(&mut self) -> RawPoint;
}

/// Placeholder controller for passive (display-only) configurations.
///
/// Implements both controller traits so a touchless `Glue` can be
/// spelled without dead generic parameters; none of its methods are
/// ever reached because the touch source is `TouchSource::None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTouch;

impl AdcTouchController for NoTouch {
    fn read_point(&mut self) -> RawPoint {
        RawPoint::default()
    }

    fn pressure_threshold(&self) -> u16 {
        u16::MAX
    }
}

impl BufferedTouchController for NoTouch {
    fn buffered_len(&mut self) -> u8 {
        0
    }

    fn read_point(&mut self) -> RawPoint {
        RawPoint::default()
    }
}
