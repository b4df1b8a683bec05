//! Read-only storage shim
//!
//! Exposes block storage to the toolkit's virtual filesystem under a
//! single drive letter, read-only. Storage shares the physical bus
//! with the display on the supported boards, so every operation that
//! reaches the card performs the bus handoff first. Write-mode opens
//! are refused before the bus is touched at all.

use kolla_core::traits::display::{BusRelease, DisplayBus};
use kolla_core::traits::storage::BlockStorage;

/// Drive letter the shim registers under
pub const DRIVE_LETTER: char = 'S';

/// Maximum simultaneously open files
pub const MAX_OPEN_FILES: usize = 4;

/// File access mode requested by the toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FsMode {
    Read,
    Write,
}

/// Storage shim errors, mapped to the toolkit's filesystem result codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VfsError {
    /// Write support is not implemented
    NotImplemented,
    /// Path did not resolve to a file
    NotFound,
    /// Too many files open at once
    TooManyOpen,
    /// Driver-level read/seek/close failure
    Io,
    /// No storage driver was configured
    NotRegistered,
}

/// An open file: the driver handle plus its tracking record id
#[derive(Debug)]
pub struct VfsFile<H> {
    id: u8,
    handle: H,
}

impl<H> VfsFile<H> {
    /// Tracking record id, unique among currently open files
    pub fn id(&self) -> u8 {
        self.id
    }
}

/// Read-only virtual filesystem over block storage
pub struct ReadOnlyVfs<S: BlockStorage> {
    storage: S,
    /// Tracking records for live handles
    open: heapless::Vec<u8, MAX_OPEN_FILES>,
}

impl<S: BlockStorage> ReadOnlyVfs<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            open: heapless::Vec::new(),
        }
    }

    /// Number of currently open files
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    /// Open a file for reading.
    ///
    /// Write mode fails immediately, before the bus handoff. A path
    /// that does not resolve, or a file that cannot be rewound to
    /// offset 0, fails without leaving a handle open.
    pub fn open<D: DisplayBus>(
        &mut self,
        bus: &mut D,
        path: &str,
        mode: FsMode,
    ) -> Result<VfsFile<S::Handle>, VfsError> {
        if mode != FsMode::Read {
            return Err(VfsError::NotImplemented);
        }

        bus.release_bus();

        let Some(mut handle) = self.storage.open(path) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("vfs: failed to open {=str}", path);
            return Err(VfsError::NotFound);
        };

        if self.storage.seek(&mut handle, 0).is_err() {
            let _ = self.storage.close(handle);
            return Err(VfsError::Io);
        }

        let id = match self.alloc_record() {
            Some(id) => id,
            None => {
                let _ = self.storage.close(handle);
                return Err(VfsError::TooManyOpen);
            }
        };

        Ok(VfsFile { id, handle })
    }

    /// Read up to `buf.len()` bytes, returning the number read
    pub fn read<D: DisplayBus>(
        &mut self,
        bus: &mut D,
        file: &mut VfsFile<S::Handle>,
        buf: &mut [u8],
    ) -> Result<usize, VfsError> {
        bus.release_bus();
        self.storage
            .read(&mut file.handle, buf)
            .map_err(|_| VfsError::Io)
    }

    /// Seek to an absolute byte offset
    pub fn seek<D: DisplayBus>(
        &mut self,
        bus: &mut D,
        file: &mut VfsFile<S::Handle>,
        pos: u32,
    ) -> Result<(), VfsError> {
        bus.release_bus();
        self.storage
            .seek(&mut file.handle, pos)
            .map_err(|_| VfsError::Io)
    }

    /// Current byte offset within the file
    pub fn tell<D: DisplayBus>(
        &mut self,
        bus: &mut D,
        file: &mut VfsFile<S::Handle>,
    ) -> Result<u32, VfsError> {
        bus.release_bus();
        self.storage
            .tell(&mut file.handle)
            .map_err(|_| VfsError::Io)
    }

    /// Close the file, releasing the driver handle and its tracking
    /// record
    pub fn close<D: DisplayBus>(
        &mut self,
        bus: &mut D,
        file: VfsFile<S::Handle>,
    ) -> Result<(), VfsError> {
        bus.release_bus();
        self.open.retain(|&id| id != file.id);
        self.storage.close(file.handle).map_err(|_| VfsError::Io)
    }

    /// Hand the storage driver back (teardown)
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn alloc_record(&mut self) -> Option<u8> {
        let id = (0..MAX_OPEN_FILES as u8).find(|id| !self.open.contains(id))?;
        self.open.push(id).ok()?;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{BusOp, MockBus, MockStorage};

    const DATA: &[u8] = b"BM_bitmap_payload";

    fn vfs() -> ReadOnlyVfs<MockStorage> {
        ReadOnlyVfs::new(MockStorage::new("S:/icons/logo.bin", DATA))
    }

    #[test]
    fn test_write_mode_fails_without_touching_bus() {
        let mut bus = MockBus::new(320, 240);
        let mut vfs = vfs();

        let err = vfs
            .open(&mut bus, "S:/icons/logo.bin", FsMode::Write)
            .unwrap_err();
        assert_eq!(err, VfsError::NotImplemented);
        assert!(bus.ops.is_empty());
        assert_eq!(vfs.open_count(), 0);
    }

    #[test]
    fn test_missing_path_fails_without_handle() {
        let mut bus = MockBus::new(320, 240);
        let mut vfs = vfs();

        let err = vfs
            .open(&mut bus, "S:/icons/missing.bin", FsMode::Read)
            .unwrap_err();
        assert_eq!(err, VfsError::NotFound);
        assert_eq!(vfs.open_count(), 0);
        assert_eq!(vfs.storage.open_handles, 0);
    }

    #[test]
    fn test_open_releases_bus_first() {
        let mut bus = MockBus::new(320, 240);
        let mut vfs = vfs();

        vfs.open(&mut bus, "S:/icons/logo.bin", FsMode::Read)
            .unwrap();
        assert_eq!(bus.ops[0], BusOp::DmaWait);
        assert_eq!(bus.ops[1], BusOp::EndWrite);
    }

    #[test]
    fn test_failed_rewind_closes_the_handle() {
        let mut bus = MockBus::new(320, 240);
        let mut vfs = vfs();
        vfs.storage.fail_seek = true;

        let err = vfs
            .open(&mut bus, "S:/icons/logo.bin", FsMode::Read)
            .unwrap_err();
        assert_eq!(err, VfsError::Io);
        assert_eq!(vfs.storage.open_handles, 0, "handle not leaked");
        assert_eq!(vfs.open_count(), 0);
    }

    #[test]
    fn test_read_seek_tell_roundtrip() {
        let mut bus = MockBus::new(320, 240);
        let mut vfs = vfs();
        let mut file = vfs
            .open(&mut bus, "S:/icons/logo.bin", FsMode::Read)
            .unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(vfs.read(&mut bus, &mut file, &mut buf).unwrap(), 2);
        assert_eq!(&buf, b"BM");
        assert_eq!(vfs.tell(&mut bus, &mut file).unwrap(), 2);

        vfs.seek(&mut bus, &mut file, 3).unwrap();
        assert_eq!(vfs.tell(&mut bus, &mut file).unwrap(), 3);

        // Every card access performed the bus handoff
        let waits = bus.ops.iter().filter(|&&op| op == BusOp::DmaWait).count();
        assert_eq!(waits, 5, "open, read, tell, seek, tell");
    }

    #[test]
    fn test_short_read_at_end_of_file() {
        let mut bus = MockBus::new(320, 240);
        let mut vfs = vfs();
        let mut file = vfs
            .open(&mut bus, "S:/icons/logo.bin", FsMode::Read)
            .unwrap();

        let mut buf = [0u8; 64];
        assert_eq!(
            vfs.read(&mut bus, &mut file, &mut buf).unwrap(),
            DATA.len()
        );
        assert_eq!(vfs.read(&mut bus, &mut file, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_close_releases_tracking_record() {
        let mut bus = MockBus::new(320, 240);
        let mut vfs = vfs();
        let file = vfs
            .open(&mut bus, "S:/icons/logo.bin", FsMode::Read)
            .unwrap();
        assert_eq!(vfs.open_count(), 1);

        vfs.close(&mut bus, file).unwrap();
        assert_eq!(vfs.open_count(), 0);
        assert_eq!(vfs.storage.open_handles, 0);
    }

    #[test]
    fn test_open_file_limit() {
        let mut bus = MockBus::new(320, 240);
        let mut vfs = vfs();

        let mut files = heapless::Vec::<_, MAX_OPEN_FILES>::new();
        for _ in 0..MAX_OPEN_FILES {
            let file = vfs
                .open(&mut bus, "S:/icons/logo.bin", FsMode::Read)
                .unwrap();
            files.push(file).ok().unwrap();
        }

        let err = vfs
            .open(&mut bus, "S:/icons/logo.bin", FsMode::Read)
            .unwrap_err();
        assert_eq!(err, VfsError::TooManyOpen);
        // The over-limit driver handle was closed again
        assert_eq!(vfs.storage.open_handles, MAX_OPEN_FILES);
    }
}
