//! Board-agnostic core logic for the Kolla GUI glue
//!
//! This crate contains everything that does not depend on specific
//! hardware implementations:
//!
//! - Hardware abstraction traits (display bus, touch controllers,
//!   periodic timer, block storage)
//! - Touch calibration tables and the raw-to-display coordinate mapping
//! - Hardware timer prescaler/compare resolution
//! - Pointer state and release debouncing

#![no_std]
#![deny(unsafe_code)]

pub mod calibration;
pub mod pointer;
pub mod timer;
pub mod traits;
