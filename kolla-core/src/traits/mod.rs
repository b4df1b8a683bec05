//! Hardware abstraction traits
//!
//! These traits define the interface between the glue components and
//! hardware-specific driver implementations. Drivers are expected to be
//! fully initialized before they are handed to the glue.

pub mod display;
pub mod storage;
pub mod timer;
pub mod touch;

pub use display::{Area, BusRelease, DisplayBus};
pub use storage::{BlockStorage, NoStorage};
pub use timer::{PeriodicTimer, TickSink};
pub use touch::{AdcTouchController, BufferedTouchController, NoTouch, RawPoint};
