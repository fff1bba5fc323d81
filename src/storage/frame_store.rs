//! Frame store
//!
//! Maps the one logical frame of the store onto a fixed-size circular region of
//! backup memory.
//!
//! # Physical Layout
//!
//! ```text
//!  0                      data_pointer                         Size
//!  ├──────────────────────┼─────────┬──────────────┬──────────┤
//!  │  abandoned bytes     │ count   │ payload      │ checksum │
//!  └──────────────────────┴─────────┴──────────────┴──────────┘
//! ```
//!
//! A frame may start anywhere in `[0, Size)`. When it runs past the end of the
//! region it continues at offset 0, so a single logical access can issue
//! several device calls.
//!
//! # Power Loss
//!
//! There is exactly one physical frame and no shadow copy. Each write picks a
//! fresh offset without checking whether the new frame overlaps the live one,
//! so an interrupted write can destroy the only copy. The next load then sees
//! a checksum mismatch and reports `FrameStatus::Corrupted`.

use super::config::StoreConfig;
use super::error::{FrameError, Result, StoreError};
use crate::platform::{BackupMemory, MemoryError, PlatformError};
use alloc::vec;
use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use retained_kv_core::{
    calculate_crc16, decode_payload, encode_frame, encode_payload, frame_len, EntryMap,
    FieldWidth, CRC_SIZE,
};

/// Bytes shown per row of a dump
pub const DUMP_ROW_LEN: usize = 16;

/// Outcome of the most recent load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// No frame has been written (or the map was cleared)
    Empty,
    /// A valid frame was read and decoded
    Loaded,
    /// The frame at `data_pointer` could not be read or failed validation
    Corrupted,
}

/// Map read from the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFrame {
    pub entries: EntryMap,
    /// Physical bytes occupied by the frame (0 when the payload is empty)
    pub used_bytes: u32,
    pub status: FrameStatus,
}

impl LoadedFrame {
    fn empty(status: FrameStatus) -> Self {
        Self {
            entries: EntryMap::new(),
            used_bytes: 0,
            status,
        }
    }
}

/// Frame store statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Frames committed (verified and pointed to)
    pub frames_written: u32,
    /// Writes whose read-back did not match
    pub verify_failures: u32,
    /// Loads that found an unreadable or damaged frame
    pub integrity_failures: u32,
    /// Offset of the last committed frame
    pub last_write_offset: Option<u32>,
}

/// Circular, checksum-protected frame storage over a backup memory device
///
/// # Example
///
/// ```
/// use retained_kv::platform::SliceMemory;
/// use retained_kv::storage::{FrameStatus, FrameStore};
/// use retained_kv::{EntryMap, TypedValue};
///
/// let mut region = [0u8; 256];
/// let mut store = FrameStore::new(SliceMemory::new(&mut region));
///
/// let mut entries = EntryMap::new();
/// entries.insert(1, TypedValue::U32(100));
/// store.persist(&entries).unwrap();
///
/// let loaded = store.load().unwrap();
/// assert_eq!(loaded.status, FrameStatus::Loaded);
/// assert_eq!(loaded.entries, entries);
/// ```
pub struct FrameStore<M: BackupMemory> {
    memory: M,
    /// Region size, queried once from the device
    size: u32,
    /// Width of `count` and dynamic `length` fields
    width: FieldWidth,
    /// Start of the current frame
    data_pointer: Option<u32>,
    /// Bytes used by the frame seen by the latest load or persist
    used_bytes: u32,
    status: FrameStatus,
    config: StoreConfig,
    rng: SmallRng,
    stats: StoreStats,
}

impl<M: BackupMemory> FrameStore<M> {
    /// Create an empty store with the default configuration
    pub fn new(memory: M) -> Self {
        Self::with_config(memory, StoreConfig::default())
    }

    /// Create an empty store
    ///
    /// The capacity is read from the device once and fixes the field width for
    /// the lifetime of the store.
    pub fn with_config(memory: M, config: StoreConfig) -> Self {
        let size = memory.capacity();
        Self {
            memory,
            size,
            width: FieldWidth::for_capacity(size),
            data_pointer: None,
            used_bytes: 0,
            status: FrameStatus::Empty,
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            stats: StoreStats::default(),
        }
    }

    /// Reattach to a frame written before a reset
    ///
    /// `data_pointer` is the value previously returned by
    /// [`data_pointer`](Self::data_pointer). It is validated by the next load
    /// like any other pointer; an offset outside the region is discarded.
    pub fn resume(memory: M, config: StoreConfig, data_pointer: Option<u32>) -> Self {
        let mut store = Self::with_config(memory, config);
        store.data_pointer = data_pointer.filter(|&offset| offset < store.size);
        store
    }

    /// Region size in bytes
    pub fn capacity(&self) -> u32 {
        self.size
    }

    /// Width of the length fields
    pub fn field_width(&self) -> FieldWidth {
        self.width
    }

    /// Start offset of the current frame, `None` when empty
    pub fn data_pointer(&self) -> Option<u32> {
        self.data_pointer
    }

    /// Bytes used by the frame seen by the latest load or persist
    pub fn used_bytes(&self) -> u32 {
        self.used_bytes
    }

    /// Outcome of the latest load or persist
    pub fn status(&self) -> FrameStatus {
        self.status
    }

    /// Store statistics
    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// Backup memory reference
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutable backup memory reference (for testing)
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Release the backup memory
    pub fn into_memory(self) -> M {
        self.memory
    }

    /// Load the current frame into a map
    ///
    /// An empty pointer yields an empty map. A frame that cannot be read or
    /// fails its checksum also yields an empty map, with status
    /// `FrameStatus::Corrupted`; the pointer itself is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Codec` if a checksum-valid payload holds an entry
    /// that cannot be decoded (unknown type tag, truncated entry).
    pub fn load(&mut self) -> Result<LoadedFrame> {
        let Some(pointer) = self.data_pointer else {
            self.used_bytes = 0;
            self.status = FrameStatus::Empty;
            return Ok(LoadedFrame::empty(FrameStatus::Empty));
        };

        let payload = match self.read(pointer) {
            Ok(payload) => payload,
            Err(_) => {
                self.stats.integrity_failures += 1;
                if self.config.warn_on_corruption {
                    crate::log_warn!(
                        "Frame at offset {} failed validation, treating store as empty",
                        pointer
                    );
                }
                self.used_bytes = 0;
                self.status = FrameStatus::Corrupted;
                return Ok(LoadedFrame::empty(FrameStatus::Corrupted));
            }
        };

        let entries = match decode_payload(&payload, self.width) {
            Ok(entries) => entries,
            Err(e) => {
                crate::log_error!(
                    "Frame at offset {} passed checksum but holds an undecodable entry",
                    pointer
                );
                self.used_bytes = 0;
                self.status = FrameStatus::Corrupted;
                return Err(e.into());
            }
        };

        self.used_bytes = if payload.is_empty() {
            0
        } else {
            frame_len(payload.len(), self.width) as u32
        };
        self.status = FrameStatus::Loaded;

        Ok(LoadedFrame {
            entries,
            used_bytes: self.used_bytes,
            status: FrameStatus::Loaded,
        })
    }

    /// Persist `entries` as a brand-new frame
    ///
    /// An empty map clears the pointer without touching the device.
    ///
    /// # Errors
    ///
    /// - `StoreError::Capacity` if the frame does not fit; nothing is written
    /// - `StoreError::Codec` if an entry cannot be encoded
    /// - `StoreError::VerifyFailed` / `StoreError::Device` from [`write`](Self::write)
    pub fn persist(&mut self, entries: &EntryMap) -> Result<()> {
        if entries.is_empty() {
            self.data_pointer = None;
            self.used_bytes = 0;
            self.status = FrameStatus::Empty;
            crate::log_debug!("Store cleared");
            return Ok(());
        }

        let payload = encode_payload(entries, self.width)?;
        let required = frame_len(payload.len(), self.width);
        if required > self.size as usize {
            return Err(StoreError::Capacity {
                required,
                capacity: self.size,
            });
        }

        let frame = encode_frame(&payload, self.width)?;
        self.write(&frame, self.config.fixed_offset)?;

        self.used_bytes = required as u32;
        self.status = FrameStatus::Loaded;
        Ok(())
    }

    /// Write a complete frame and commit it after verification
    ///
    /// Writes at `offset`, or at a pseudo-random offset in `[0, Size)` when
    /// `None`, then reads the frame back. Only a read-back that passes its
    /// checksum and matches the written payload moves `data_pointer`.
    ///
    /// The old frame is not protected: if the new frame overlaps it and the
    /// write is interrupted or fails, both may be lost.
    ///
    /// Returns the committed offset.
    pub fn write(&mut self, frame: &[u8], offset: Option<u32>) -> Result<u32> {
        if frame.len() > self.size as usize {
            return Err(StoreError::Capacity {
                required: frame.len(),
                capacity: self.size,
            });
        }
        if frame.len() < self.width.size() + CRC_SIZE {
            return Err(StoreError::InvalidArgument(
                "frame shorter than header and checksum",
            ));
        }

        let offset = match offset {
            Some(offset) if offset >= self.size => {
                return Err(StoreError::InvalidArgument("write offset outside region"));
            }
            Some(offset) => offset,
            None => self.rng.gen_range(0..self.size),
        };

        if let Err(e) = self.core_write(offset, frame) {
            crate::log_error!("Frame write at offset {} failed", offset);
            return Err(e.into());
        }

        let written_payload = &frame[self.width.size()..frame.len() - CRC_SIZE];
        match self.read(offset) {
            Ok(payload) if payload == written_payload => {}
            _ => {
                self.stats.verify_failures += 1;
                crate::log_error!("Frame read-back at offset {} did not verify", offset);
                return Err(StoreError::VerifyFailed { offset });
            }
        }

        self.data_pointer = Some(offset);
        self.stats.frames_written += 1;
        self.stats.last_write_offset = Some(offset);
        crate::log_debug!("Committed {}-byte frame at offset {}", frame.len(), offset);

        Ok(offset)
    }

    /// Read and validate the frame starting at `index`
    ///
    /// Returns the payload (empty for a zero-length frame).
    pub fn read(&mut self, index: u32) -> core::result::Result<Vec<u8>, FrameError> {
        let header_len = self.width.size();
        let mut header = [0u8; 4];
        self.core_read(index, &mut header[..header_len])?;

        // Slice length always equals the field width
        let count = self.width.read(&header[..header_len]).unwrap_or(u32::MAX);
        if count as u64 + (header_len + CRC_SIZE) as u64 > self.size as u64 {
            return Err(FrameError::LengthOutOfRange { count });
        }
        if count == 0 {
            return Ok(Vec::new());
        }

        let count = count as usize;
        let mut body = vec![0u8; count + CRC_SIZE];
        self.core_read(self.advance(index, header_len), &mut body)?;

        let stored = u16::from_le_bytes([body[count], body[count + 1]]);
        let computed = calculate_crc16(&body[..count]);
        if stored != computed {
            return Err(FrameError::ChecksumMismatch { stored, computed });
        }

        body.truncate(count);
        Ok(body)
    }

    /// Read `buf.len()` bytes starting at `index`, wrapping at the end of the region
    pub fn core_read(&mut self, index: u32, buf: &mut [u8]) -> core::result::Result<(), PlatformError> {
        self.check_span(buf.len())?;

        let mut cursor = index % self.size.max(1);
        let mut done = 0;
        while done < buf.len() {
            let chunk = ((self.size - cursor) as usize).min(buf.len() - done);
            let read = self.memory.read(cursor, &mut buf[done..done + chunk])?;
            if read != chunk {
                return Err(MemoryError::ShortRead {
                    requested: chunk,
                    read,
                }
                .into());
            }
            done += chunk;
            cursor = self.advance(cursor, chunk);
        }

        Ok(())
    }

    /// Write `data` starting at `index`, wrapping at the end of the region
    pub fn core_write(&mut self, index: u32, data: &[u8]) -> core::result::Result<(), PlatformError> {
        self.check_span(data.len())?;

        let mut cursor = index % self.size.max(1);
        let mut done = 0;
        while done < data.len() {
            let chunk = ((self.size - cursor) as usize).min(data.len() - done);
            self.memory.write(cursor, &data[done..done + chunk])?;
            done += chunk;
            cursor = self.advance(cursor, chunk);
        }

        Ok(())
    }

    /// Hex dump of every physical byte, one row per callback
    ///
    /// Rows look like `000040* 01 02 ...`; the `*` marks the row holding
    /// `data_pointer`. Diagnostics only.
    pub fn dump_rows<F: FnMut(&str)>(&mut self, mut emit: F) -> core::result::Result<(), PlatformError> {
        use core::fmt::Write;

        let mut offset = 0u32;
        while offset < self.size {
            let len = ((self.size - offset) as usize).min(DUMP_ROW_LEN);
            let mut bytes = [0u8; DUMP_ROW_LEN];
            self.core_read(offset, &mut bytes[..len])?;

            let marked = self
                .data_pointer
                .is_some_and(|pointer| (offset..offset + len as u32).contains(&pointer));

            let mut line = heapless::String::<64>::new();
            // 8 + 3 * DUMP_ROW_LEN characters always fit
            let _ = write!(line, "{:06X}{}", offset, if marked { '*' } else { ' ' });
            for byte in &bytes[..len] {
                let _ = write!(line, " {:02X}", byte);
            }
            emit(line.as_str());

            offset += len as u32;
        }

        Ok(())
    }

    fn check_span(&self, len: usize) -> core::result::Result<(), PlatformError> {
        if len > self.size as usize {
            return Err(MemoryError::OutOfBounds.into());
        }
        Ok(())
    }

    /// Offset `by` bytes after `index`, modulo the region size
    fn advance(&self, index: u32, by: usize) -> u32 {
        ((index as u64 + by as u64) % self.size.max(1) as u64) as u32
    }
}
