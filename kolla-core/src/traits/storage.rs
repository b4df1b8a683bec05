//! Block storage trait
//!
//! Interface to an already-initialized storage driver (typically an SD
//! card on the shared bus). The glue only ever reads.

use core::convert::Infallible;

/// Read-only access to files on block storage
pub trait BlockStorage {
    /// Driver-side handle for an open file
    type Handle;

    /// Driver-side error for read/seek/close failures
    type Error;

    /// Open an existing file for reading.
    ///
    /// Returns `None` when the path does not resolve; driver-level
    /// failures beyond that are indistinguishable from absence here,
    /// matching the underlying card APIs.
    fn open(&mut self, path: &str) -> Option<Self::Handle>;

    /// Read up to `buf.len()` bytes, returning the number read
    fn read(&mut self, handle: &mut Self::Handle, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Seek to an absolute byte offset
    fn seek(&mut self, handle: &mut Self::Handle, pos: u32) -> Result<(), Self::Error>;

    /// Current byte offset within the file
    fn tell(&mut self, handle: &mut Self::Handle) -> Result<u32, Self::Error>;

    /// Close the file, consuming the handle
    fn close(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;
}

/// Storage placeholder for configurations without block storage.
///
/// Every open fails to resolve, so no handle ever exists and the
/// remaining methods are unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStorage;

impl BlockStorage for NoStorage {
    type Handle = Infallible;
    type Error = Infallible;

    fn open(&mut self, _path: &str) -> Option<Infallible> {
        None
    }

    fn read(&mut self, handle: &mut Infallible, _buf: &mut [u8]) -> Result<usize, Infallible> {
        match *handle {}
    }

    fn seek(&mut self, handle: &mut Infallible, _pos: u32) -> Result<(), Infallible> {
        match *handle {}
    }

    fn tell(&mut self, handle: &mut Infallible) -> Result<u32, Infallible> {
        match *handle {}
    }

    fn close(&mut self, handle: Infallible) -> Result<(), Infallible> {
        match handle {}
    }
}
