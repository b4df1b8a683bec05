//! Mock hardware for host-side tests
//!
//! Minimal trait implementations that record what the glue did to
//! them. Only compiled for tests.

use embedded_hal::delay::DelayNs;
use kolla_core::calibration::Rotation;
use kolla_core::timer::TimerConfig;
use kolla_core::traits::display::DisplayBus;
use kolla_core::traits::storage::BlockStorage;
use kolla_core::traits::timer::PeriodicTimer;
use kolla_core::traits::touch::{AdcTouchController, BufferedTouchController, RawPoint};

/// One recorded bus operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    DmaWait,
    EndWrite,
    BeginWrite,
    SetWindow {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    },
    WritePixels(PixelWrite),
}

/// Summary of one write_pixels call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWrite {
    pub count: usize,
    pub block: bool,
    pub swap: bool,
    pub first: u16,
    pub last: u16,
}

/// Recording display bus
pub struct MockBus {
    width: u16,
    height: u16,
    pub rotation: Rotation,
    dma: bool,
    pub ops: heapless::Vec<BusOp, 64>,
}

impl MockBus {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            rotation: Rotation::Deg0,
            dma: false,
            ops: heapless::Vec::new(),
        }
    }

    pub fn with_dma(mut self) -> Self {
        self.dma = true;
        self
    }

    pub fn last_write(&self) -> Option<PixelWrite> {
        self.ops.iter().rev().find_map(|op| match op {
            BusOp::WritePixels(w) => Some(*w),
            _ => None,
        })
    }

    fn record(&mut self, op: BusOp) {
        self.ops.push(op).expect("mock op log full");
    }
}

impl DisplayBus for MockBus {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn dma_capable(&self) -> bool {
        self.dma
    }

    fn begin_write(&mut self) {
        self.record(BusOp::BeginWrite);
    }

    fn end_write(&mut self) {
        self.record(BusOp::EndWrite);
    }

    fn dma_wait(&mut self) {
        self.record(BusOp::DmaWait);
    }

    fn set_addr_window(&mut self, x: u16, y: u16, width: u16, height: u16) {
        self.record(BusOp::SetWindow {
            x,
            y,
            width,
            height,
        });
    }

    fn write_pixels(&mut self, pixels: &[u16], block: bool, swap_bytes: bool) {
        self.record(BusOp::WritePixels(PixelWrite {
            count: pixels.len(),
            block,
            swap: swap_bytes,
            first: pixels.first().copied().unwrap_or(0),
            last: pixels.last().copied().unwrap_or(0),
        }));
    }
}

/// ADC touch controller fed from a canned sample queue.
///
/// Repeats the last sample once the queue runs dry.
pub struct MockAdcTouch {
    pub samples: heapless::Deque<RawPoint, 16>,
    pub threshold: u16,
    last: RawPoint,
}

impl MockAdcTouch {
    pub fn new(threshold: u16) -> Self {
        Self {
            samples: heapless::Deque::new(),
            threshold,
            last: RawPoint::default(),
        }
    }

    pub fn queue(&mut self, p: RawPoint) {
        self.samples.push_back(p).expect("mock sample queue full");
    }
}

impl AdcTouchController for MockAdcTouch {
    fn read_point(&mut self) -> RawPoint {
        if let Some(p) = self.samples.pop_front() {
            self.last = p;
        }
        self.last
    }

    fn pressure_threshold(&self) -> u16 {
        self.threshold
    }
}

/// FIFO touch controller with an inspectable queue
#[derive(Default)]
pub struct MockFifoTouch {
    pub fifo: heapless::Deque<RawPoint, 16>,
}

impl MockFifoTouch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, p: RawPoint) {
        self.fifo.push_back(p).expect("mock fifo full");
    }
}

impl BufferedTouchController for MockFifoTouch {
    fn buffered_len(&mut self) -> u8 {
        self.fifo.len() as u8
    }

    fn read_point(&mut self) -> RawPoint {
        self.fifo.pop_front().unwrap_or_default()
    }
}

/// Delay provider that just tallies requested time
#[derive(Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

/// Periodic timer that records what the glue programmed
pub struct MockTimer {
    pub base_clock_hz: u32,
    pub counter_bits: u8,
    pub configured: Option<TimerConfig>,
    pub enabled: bool,
}

impl MockTimer {
    pub fn new(base_clock_hz: u32, counter_bits: u8) -> Self {
        Self {
            base_clock_hz,
            counter_bits,
            configured: None,
            enabled: false,
        }
    }
}

impl PeriodicTimer for MockTimer {
    fn base_clock_hz(&self) -> u32 {
        self.base_clock_hz
    }

    fn counter_bits(&self) -> u8 {
        self.counter_bits
    }

    fn configure(&mut self, config: &TimerConfig) {
        self.configured = Some(*config);
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }
}

/// Block storage holding a single file
pub struct MockStorage {
    pub path: &'static str,
    pub data: &'static [u8],
    /// Driver-side handles currently open
    pub open_handles: usize,
    /// Force the next seek to fail
    pub fail_seek: bool,
}

#[derive(Debug)]
pub struct MockFile {
    pos: usize,
}

impl MockStorage {
    pub fn new(path: &'static str, data: &'static [u8]) -> Self {
        Self {
            path,
            data,
            open_handles: 0,
            fail_seek: false,
        }
    }
}

impl BlockStorage for MockStorage {
    type Handle = MockFile;
    type Error = ();

    fn open(&mut self, path: &str) -> Option<MockFile> {
        if path == self.path {
            self.open_handles += 1;
            Some(MockFile { pos: 0 })
        } else {
            None
        }
    }

    fn read(&mut self, handle: &mut MockFile, buf: &mut [u8]) -> Result<usize, ()> {
        let remaining = &self.data[handle.pos.min(self.data.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        handle.pos += n;
        Ok(n)
    }

    fn seek(&mut self, handle: &mut MockFile, pos: u32) -> Result<(), ()> {
        if self.fail_seek || pos as usize > self.data.len() {
            return Err(());
        }
        handle.pos = pos as usize;
        Ok(())
    }

    fn tell(&mut self, handle: &mut MockFile) -> Result<u32, ()> {
        Ok(handle.pos as u32)
    }

    fn close(&mut self, _handle: MockFile) -> Result<(), ()> {
        self.open_handles -= 1;
        Ok(())
    }
}
