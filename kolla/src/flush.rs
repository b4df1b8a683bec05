//! Display flush synchronizer
//!
//! Owns the draw buffer and turns toolkit flush requests into bus
//! transactions. The bus is shared with touch and storage, so every
//! flush after the first one waits out the previous asynchronous
//! transfer and ends the previous transaction before claiming the bus
//! again. The transaction opened here is deliberately left open; the
//! next bus handoff (flush, touch poll or storage access) closes it.

use kolla_core::traits::display::{Area, BusRelease, DisplayBus};

/// Draw buffer height in scanlines for most targets
pub const DEFAULT_BUFFER_ROWS: u16 = 8;

/// Reduced row count for memory-constrained targets (a full-width
/// 16-bit buffer at 8 rows is too much on the smallest parts)
pub const REDUCED_BUFFER_ROWS: u16 = 4;

/// The caller-provided pixel buffer cannot hold the configured
/// scanline count (doubled when the bus is DMA-capable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferTooSmall {
    /// Pixel words required for this display width and row count
    pub required: usize,
}

/// Display flush synchronizer
///
/// Exclusively owns the pixel buffer. In DMA mode the buffer is split
/// into two equal halves: the toolkit renders into one half while the
/// other drains to hardware, and exactly one write is in flight per
/// half at any time.
pub struct FlushSync<'buf> {
    buffer: &'buf mut [u16],
    half_len: usize,
    active_half: usize,
    dma: bool,
    swap_bytes: bool,
    first_flush: bool,
}

impl<'buf> FlushSync<'buf> {
    /// Validate the buffer and set up single- or double-buffering.
    ///
    /// `width` is the advertised display width in pixels; the buffer
    /// must hold `width * buffer_rows` pixel words, twice that when
    /// `dma` is set.
    pub fn new(
        buffer: &'buf mut [u16],
        width: u16,
        buffer_rows: u16,
        dma: bool,
        swap_bytes: bool,
    ) -> Result<Self, BufferTooSmall> {
        let half_len = width as usize * buffer_rows as usize;
        let required = if dma { half_len * 2 } else { half_len };
        if half_len == 0 || buffer.len() < required {
            return Err(BufferTooSmall { required });
        }

        Ok(Self {
            buffer,
            half_len,
            active_half: 0,
            dma,
            swap_bytes,
            first_flush: true,
        })
    }

    /// Pixels one half can hold; flush areas must not exceed this
    pub fn half_len(&self) -> usize {
        self.half_len
    }

    /// Whether this synchronizer double-buffers over DMA
    pub fn is_double_buffered(&self) -> bool {
        self.dma
    }

    /// The half the toolkit should render the next damaged area into
    pub fn draw_buffer(&mut self) -> &mut [u16] {
        let start = self.active_half * self.half_len;
        &mut self.buffer[start..start + self.half_len]
    }

    /// Write the rendered area to the display and signal completion.
    ///
    /// `ready` is invoked exactly once, unconditionally; the toolkit
    /// has no separate error channel for flush failures and must never
    /// be left waiting. The first flush after setup skips the
    /// wait-for-prior-transfer step since no transfer can be in
    /// flight; every later flush performs the full bus handoff.
    pub fn flush<D: DisplayBus>(&mut self, bus: &mut D, area: &Area, ready: impl FnOnce()) {
        if self.first_flush {
            self.first_flush = false;
        } else {
            bus.release_bus();
        }

        let count = area.pixel_count().min(self.half_len);
        let start = self.active_half * self.half_len;
        let pixels = &self.buffer[start..start + count];

        bus.begin_write();
        bus.set_addr_window(area.x1, area.y1, area.width(), area.height());
        if self.dma {
            // Hand the active half to DMA and flip so the toolkit
            // renders into the other one while this drains.
            bus.write_pixels(pixels, false, self.swap_bytes);
            self.active_half ^= 1;
        } else {
            bus.write_pixels(pixels, true, self.swap_bytes);
        }

        ready();
    }
}
