//! Display bus trait and the shared-bus arbitration primitive
//!
//! The display, touch controller and block storage all hang off one
//! non-reentrant bus on the supported boards. Any component that wants
//! the bus must first wait out the previous asynchronous transfer and
//! formally end the previous transaction; [`BusRelease::release_bus`]
//! is that handoff, and it is the system's core correctness invariant.

use crate::calibration::Rotation;

/// A damaged rectangle in display coordinates, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl Area {
    pub const fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Width of the rectangle in pixels
    pub const fn width(&self) -> u16 {
        self.x2 - self.x1 + 1
    }

    /// Height of the rectangle in pixels
    pub const fn height(&self) -> u16 {
        self.y2 - self.y1 + 1
    }

    /// Number of pixels covered by the rectangle
    pub const fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }
}

/// Interface to an already-initialized TFT display driver
///
/// Transactions are explicit: `begin_write` claims the bus,
/// `end_write` releases it. A driver with DMA support may return from
/// [`DisplayBus::write_pixels`] while the transfer is still draining;
/// `dma_wait` blocks until the bus is quiet again.
pub trait DisplayBus {
    /// Panel width in pixels for the current rotation
    fn width(&self) -> u16;

    /// Panel height in pixels for the current rotation
    fn height(&self) -> u16;

    /// Current screen rotation
    fn rotation(&self) -> Rotation;

    /// Whether a non-blocking pixel write hands the transfer to DMA
    fn dma_capable(&self) -> bool {
        false
    }

    /// Start a bus transaction
    fn begin_write(&mut self);

    /// End the current bus transaction
    fn end_write(&mut self);

    /// Block until any in-flight asynchronous transfer has completed.
    ///
    /// Must be a no-op when the bus is idle.
    fn dma_wait(&mut self);

    /// Set the addressable window for subsequent pixel writes
    fn set_addr_window(&mut self, x: u16, y: u16, width: u16, height: u16);

    /// Write 16-bit pixels into the open window.
    ///
    /// With `block = false` a DMA-capable driver may return while the
    /// transfer drains; callers then own the `dma_wait` before the next
    /// bus access. `swap_bytes` swaps the two bytes of each pixel word
    /// on the wire for panels with the opposite endianness.
    fn write_pixels(&mut self, pixels: &[u16], block: bool, swap_bytes: bool);
}

/// The bus arbitration primitive.
///
/// Every component that touches the shared bus calls this before its
/// own access: wait for the previous DMA transfer, then end the
/// previous transaction. Safe to call when nothing is in flight.
pub trait BusRelease: DisplayBus {
    fn release_bus(&mut self) {
        self.dma_wait();
        self.end_write();
    }
}

// Blanket implementation for all DisplayBus types
impl<T: DisplayBus + ?Sized> BusRelease for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_dimensions() {
        let area = Area::new(10, 20, 19, 39);
        assert_eq!(area.width(), 10);
        assert_eq!(area.height(), 20);
        assert_eq!(area.pixel_count(), 200);
    }

    #[test]
    fn test_single_pixel_area() {
        let area = Area::new(5, 5, 5, 5);
        assert_eq!(area.width(), 1);
        assert_eq!(area.height(), 1);
        assert_eq!(area.pixel_count(), 1);
    }
}
