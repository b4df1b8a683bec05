//! GUI toolkit glue for shared-bus display hardware
//!
//! This crate binds a retained-mode embedded GUI toolkit to its
//! hardware without the toolkit knowing about any specific device:
//!
//! - Display flush synchronization against a DMA-capable bus
//! - Touch sample calibration, rotation and release debouncing
//! - A periodic hardware timer driving the toolkit's clock
//! - A read-only virtual filesystem over block storage
//!
//! Display, touch controller and storage share one non-reentrant bus
//! on the supported boards. Whoever wants the bus first waits out the
//! previous asynchronous transfer and ends the previous transaction;
//! every component here follows that handoff and nothing else locks.
//!
//! Drivers are handed in already initialized; [`Glue::new`] wires them
//! together and fails fast on the two fatal setup conditions (pixel
//! buffer too small, tick timer frequency unreachable). Run-time
//! operations are best-effort.

#![no_std]
#![deny(unsafe_code)]

pub mod flush;
pub mod storage;
pub mod tick;
pub mod touch;

#[cfg(test)]
pub(crate) mod mock;

pub use kolla_core::calibration::Rotation;
pub use kolla_core::pointer::{PointerSample, TouchPhase};
pub use kolla_core::timer::{TimerConfig, TimerError};
pub use kolla_core::traits::display::{Area, BusRelease, DisplayBus};
pub use kolla_core::traits::storage::{BlockStorage, NoStorage};
pub use kolla_core::traits::timer::{PeriodicTimer, TickSink};
pub use kolla_core::traits::touch::{
    AdcTouchController, BufferedTouchController, NoTouch, RawPoint,
};

pub use flush::{FlushSync, DEFAULT_BUFFER_ROWS, REDUCED_BUFFER_ROWS};
pub use storage::{FsMode, ReadOnlyVfs, VfsError, VfsFile, DRIVE_LETTER, MAX_OPEN_FILES};
pub use tick::{TickBridge, TickCounter, DEFAULT_TICK_INTERVAL_MS};
pub use touch::{no_touch, NoopDelay, PassiveTouch, TouchNormalizer, TouchSource};

use embedded_hal::delay::DelayNs;

/// Glue configuration
///
/// Everything here is fixed for the lifetime of the glue; there is no
/// persisted configuration.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Toolkit tick interval in milliseconds (1-10 ms acceptable)
    pub tick_interval_ms: u32,
    /// Draw buffer height in scanlines; use [`REDUCED_BUFFER_ROWS`] on
    /// memory-constrained targets
    pub buffer_rows: u16,
    /// Swap the two bytes of each 16-bit pixel on the wire
    pub swap_color_bytes: bool,
    /// Advertise this resolution to the toolkit instead of the
    /// driver's reported size.
    ///
    /// Some panels are driven by a controller rigged for a larger
    /// frame (a 240x240 panel on a 240x320 controller); the driver
    /// then reports the controller's size, not the glass.
    pub logical_size: Option<(u16, u16)>,
    /// Emit setup debug logs (defmt feature only)
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            buffer_rows: DEFAULT_BUFFER_ROWS,
            swap_color_bytes: false,
            logical_size: None,
            debug: false,
        }
    }
}

/// Fatal setup failures
///
/// Callers must not drive the display after either of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    /// The pixel buffer cannot hold the configured scanline count
    Alloc,
    /// No timer divider reaches the requested tick frequency
    Timer(TimerError),
}

/// The assembled adapter
///
/// Owns the display bus and arbitrates it between flushing, touch
/// polling and storage access. All generic parameters beyond the
/// display and timer default to the "not fitted" placeholders, so a
/// passive display spells as `Glue<'_, MyBus, MyTimer>`.
pub struct Glue<'buf, D, T, A = NoTouch, B = NoTouch, DL = NoopDelay, S = NoStorage>
where
    T: PeriodicTimer,
    S: BlockStorage,
{
    display: D,
    flush: FlushSync<'buf>,
    touch: TouchNormalizer<A, B, DL>,
    tick: TickBridge<T>,
    vfs: Option<ReadOnlyVfs<S>>,
    logical_size: (u16, u16),
}

impl<'buf, D, T, A, B, DL, S> Glue<'buf, D, T, A, B, DL, S>
where
    D: DisplayBus,
    T: PeriodicTimer,
    A: AdcTouchController,
    B: BufferedTouchController,
    DL: DelayNs,
    S: BlockStorage,
{
    /// Wire already-initialized drivers into a running adapter.
    ///
    /// The buffer must hold `width * buffer_rows` pixel words, twice
    /// that when the display bus is DMA-capable (`width` being the
    /// advertised width, after any logical-size override). The tick
    /// timer is programmed and started before this returns.
    pub fn new(
        display: D,
        timer: T,
        touch: TouchSource<A, B, DL>,
        storage: Option<S>,
        buffer: &'buf mut [u16],
        config: Config,
    ) -> Result<Self, SetupError> {
        let logical_size = config
            .logical_size
            .unwrap_or((display.width(), display.height()));

        let flush = FlushSync::new(
            buffer,
            logical_size.0,
            config.buffer_rows,
            display.dma_capable(),
            config.swap_color_bytes,
        )
        .map_err(|_| SetupError::Alloc)?;

        let tick = TickBridge::new(timer, config.tick_interval_ms).map_err(SetupError::Timer)?;

        // Calibration maps into the driver's own coordinate space, not
        // the advertised one
        let touch = TouchNormalizer::new(touch, display.width(), display.height());

        #[cfg(feature = "defmt")]
        if config.debug {
            defmt::debug!(
                "glue up: {}x{}, {} px per buffer half, double={}, tick divider {} compare {}",
                logical_size.0,
                logical_size.1,
                flush.half_len(),
                flush.is_double_buffered(),
                tick.config().divider,
                tick.config().compare,
            );
        }

        Ok(Self {
            display,
            flush,
            touch,
            tick,
            vfs: storage.map(ReadOnlyVfs::new),
            logical_size,
        })
    }

    /// Resolution to advertise to the toolkit
    pub fn size(&self) -> (u16, u16) {
        self.logical_size
    }

    /// Whether an input device is configured
    pub fn has_touch(&self) -> bool {
        self.touch.has_touch()
    }

    /// The timer configuration the tick bridge resolved
    pub fn tick_config(&self) -> &TimerConfig {
        self.tick.config()
    }

    /// The buffer half the toolkit should render the next area into
    pub fn draw_buffer(&mut self) -> &mut [u16] {
        self.flush.draw_buffer()
    }

    /// Flush the rendered area to the display.
    ///
    /// `ready` is the toolkit's flush-done signal; it fires exactly
    /// once before this returns, regardless of hardware outcome.
    pub fn flush(&mut self, area: &Area, ready: impl FnOnce()) {
        self.flush.flush(&mut self.display, area, ready);
    }

    /// Poll the touch controller for one pointer sample.
    ///
    /// Poll again immediately (without yielding) while the sample
    /// reports `more_pending`.
    pub fn poll_touch(&mut self) -> PointerSample {
        self.touch.poll(&mut self.display)
    }

    /// Advance the toolkit clock by one tick interval; ISR entry point
    pub fn on_tick(&self, sink: &impl TickSink) {
        self.tick.on_tick(sink);
    }

    /// Open a file on the registered drive
    pub fn fs_open(&mut self, path: &str, mode: FsMode) -> Result<VfsFile<S::Handle>, VfsError> {
        match &mut self.vfs {
            Some(vfs) => vfs.open(&mut self.display, path, mode),
            None => Err(VfsError::NotRegistered),
        }
    }

    /// Read from an open file
    pub fn fs_read(
        &mut self,
        file: &mut VfsFile<S::Handle>,
        buf: &mut [u8],
    ) -> Result<usize, VfsError> {
        match &mut self.vfs {
            Some(vfs) => vfs.read(&mut self.display, file, buf),
            None => Err(VfsError::NotRegistered),
        }
    }

    /// Seek within an open file
    pub fn fs_seek(&mut self, file: &mut VfsFile<S::Handle>, pos: u32) -> Result<(), VfsError> {
        match &mut self.vfs {
            Some(vfs) => vfs.seek(&mut self.display, file, pos),
            None => Err(VfsError::NotRegistered),
        }
    }

    /// Current position within an open file
    pub fn fs_tell(&mut self, file: &mut VfsFile<S::Handle>) -> Result<u32, VfsError> {
        match &mut self.vfs {
            Some(vfs) => vfs.tell(&mut self.display, file),
            None => Err(VfsError::NotRegistered),
        }
    }

    /// Close an open file
    pub fn fs_close(&mut self, file: VfsFile<S::Handle>) -> Result<(), VfsError> {
        match &mut self.vfs {
            Some(vfs) => vfs.close(&mut self.display, file),
            None => Err(VfsError::NotRegistered),
        }
    }

    /// Tear down: stop the tick timer and hand every driver back
    pub fn release(self) -> (D, T, TouchSource<A, B, DL>, Option<S>) {
        (
            self.display,
            self.tick.release(),
            self.touch.into_source(),
            self.vfs.map(ReadOnlyVfs::into_storage),
        )
    }
}
