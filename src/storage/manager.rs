//! Store manager
//!
//! Public key/value API over the frame store. Every operation loads the whole
//! map, and every mutation rewrites it as one new frame.

use super::config::StoreConfig;
use super::error::Result;
use super::frame_store::{FrameStatus, FrameStore, StoreStats};
use crate::platform::{BackupMemory, PlatformError};
use alloc::string::String;
use retained_kv_core::{EntryMap, TypedValue};

/// Key/value store persisted in backup memory
///
/// # Example
///
/// ```
/// use retained_kv::platform::SliceMemory;
/// use retained_kv::{KeyValueStore, TypedValue};
///
/// let mut region = [0u8; 512];
/// let mut store = KeyValueStore::new(SliceMemory::new(&mut region));
///
/// store.add_or_replace(1, 42u32).unwrap();
/// store.add_or_replace(2, "boot-count").unwrap();
///
/// assert_eq!(store.recall(1).unwrap(), Some(TypedValue::U32(42)));
/// assert!(store.remove(2).unwrap());
/// assert_eq!(store.recall(2).unwrap(), None);
/// ```
pub struct KeyValueStore<M: BackupMemory> {
    frames: FrameStore<M>,
}

impl<M: BackupMemory> KeyValueStore<M> {
    /// Create an empty store with the default configuration
    pub fn new(memory: M) -> Self {
        Self::from_frame_store(FrameStore::new(memory))
    }

    /// Create an empty store
    pub fn with_config(memory: M, config: StoreConfig) -> Self {
        Self::from_frame_store(FrameStore::with_config(memory, config))
    }

    /// Wrap an existing frame store (e.g. one built with [`FrameStore::resume`])
    pub fn from_frame_store(frames: FrameStore<M>) -> Self {
        Self { frames }
    }

    /// Look up `key`
    ///
    /// Returns `Ok(None)` when the key is absent, including when the stored
    /// frame is damaged (see [`status`](Self::status)).
    pub fn recall(&mut self, key: u8) -> Result<Option<TypedValue>> {
        let mut frame = self.frames.load()?;
        Ok(frame.entries.remove(&key))
    }

    /// Store `value` under `key`, replacing any existing entry
    ///
    /// # Errors
    ///
    /// - `StoreError::Capacity` if the map no longer fits; the previous map stays intact
    /// - `StoreError::Codec` if the value cannot be encoded or the current frame cannot be decoded
    /// - `StoreError::VerifyFailed` / `StoreError::Device` if the new frame could not be committed
    pub fn add_or_replace(&mut self, key: u8, value: impl Into<TypedValue>) -> Result<()> {
        let value = value.into();
        let mut entries = self.frames.load()?.entries;

        entries.remove(&key);
        entries.insert(key, value);

        self.frames.persist(&entries)
    }

    /// Remove `key`
    ///
    /// Returns `Ok(false)` if the key was not present.
    pub fn remove(&mut self, key: u8) -> Result<bool> {
        let mut entries = self.frames.load()?.entries;

        if entries.remove(&key).is_none() {
            return Ok(false);
        }

        self.frames.persist(&entries)?;
        Ok(true)
    }

    /// Remaining physical capacity in bytes
    ///
    /// Computed from the latest load or persist.
    pub fn free(&self) -> u32 {
        self.frames.capacity() - self.frames.used_bytes()
    }

    /// Remove every entry
    pub fn clear(&mut self) -> Result<()> {
        self.frames.persist(&EntryMap::new())
    }

    /// Current map
    pub fn entries(&mut self) -> Result<EntryMap> {
        Ok(self.frames.load()?.entries)
    }

    /// Check whether `key` is present
    pub fn contains_key(&mut self, key: u8) -> Result<bool> {
        Ok(self.frames.load()?.entries.contains_key(&key))
    }

    /// Number of stored entries
    pub fn len(&mut self) -> Result<usize> {
        Ok(self.frames.load()?.entries.len())
    }

    /// Check whether the store holds no entries
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Outcome of the latest load or persist
    ///
    /// Distinguishes a store that was never written (`Empty`) from one whose
    /// frame was lost (`Corrupted`); both read as zero entries.
    pub fn status(&self) -> FrameStatus {
        self.frames.status()
    }

    /// Region size in bytes
    pub fn capacity(&self) -> u32 {
        self.frames.capacity()
    }

    /// Frame store statistics
    pub fn stats(&self) -> StoreStats {
        self.frames.stats()
    }

    /// Human-readable hex map of every physical byte
    ///
    /// Diagnostics only; see [`FrameStore::dump_rows`] for the row format.
    pub fn dump(&mut self) -> core::result::Result<String, PlatformError> {
        let mut out = String::new();
        self.frames.dump_rows(|row| {
            out.push_str(row);
            out.push('\n');
        })?;
        Ok(out)
    }

    /// Hex map of every physical byte, one row per callback
    pub fn dump_rows<F: FnMut(&str)>(&mut self, emit: F) -> core::result::Result<(), PlatformError> {
        self.frames.dump_rows(emit)
    }

    /// Underlying frame store
    pub fn frame_store(&self) -> &FrameStore<M> {
        &self.frames
    }

    /// Mutable underlying frame store
    pub fn frame_store_mut(&mut self) -> &mut FrameStore<M> {
        &mut self.frames
    }

    /// Release the frame store
    pub fn into_inner(self) -> FrameStore<M> {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockBackupMemory;
    use crate::storage::StoreError;
    use alloc::vec;

    fn store(capacity: u32) -> KeyValueStore<MockBackupMemory> {
        KeyValueStore::new(MockBackupMemory::new(capacity))
    }

    #[test]
    fn test_empty_store() {
        let mut store = store(128);

        assert_eq!(store.free(), 128);
        assert_eq!(store.recall(0).unwrap(), None);
        assert_eq!(store.recall(255).unwrap(), None);
        assert!(store.is_empty().unwrap());
        assert_eq!(store.status(), FrameStatus::Empty);
    }

    #[test]
    fn test_add_and_recall() {
        let mut store = store(128);

        store.add_or_replace(5, 42i32).unwrap();

        assert_eq!(store.recall(5).unwrap(), Some(TypedValue::I32(42)));
        assert_eq!(store.recall(6).unwrap(), None);
        // header 2 + entry 6 + crc 2
        assert_eq!(store.free(), 128 - 10);
    }

    #[test]
    fn test_replace_keeps_single_entry() {
        let mut store = store(128);

        store.add_or_replace(3, "first").unwrap();
        store.add_or_replace(3, 7u8).unwrap();

        assert_eq!(store.recall(3).unwrap(), Some(TypedValue::U8(7)));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_remove() {
        let mut store = store(128);
        store.add_or_replace(5, 42u32).unwrap();
        store.add_or_replace(6, true).unwrap();
        let free_with_two = store.free();

        assert!(store.remove(5).unwrap());
        assert_eq!(store.recall(5).unwrap(), None);
        assert!(store.free() > free_with_two);

        assert!(store.remove(6).unwrap());
        assert_eq!(store.free(), 128);
        assert_eq!(store.frame_store().data_pointer(), None);
    }

    #[test]
    fn test_remove_absent_key() {
        let mut store = store(128);
        store.add_or_replace(1, 1u8).unwrap();
        store.frame_store_mut().memory_mut().reset_counters();

        assert!(!store.remove(2).unwrap());
        assert_eq!(store.frame_store().memory().write_calls(), 0);
    }

    #[test]
    fn test_capacity_rejection_keeps_prior_entry() {
        let mut store = store(32);
        store.add_or_replace(1, 100u16).unwrap();

        let result = store.add_or_replace(2, vec![0u8; 64]);

        assert!(matches!(result, Err(StoreError::Capacity { .. })));
        assert_eq!(store.recall(1).unwrap(), Some(TypedValue::U16(100)));
        assert_eq!(store.recall(2).unwrap(), None);
    }

    #[test]
    fn test_unencodable_value_rejected() {
        let mut store = store(64);

        let result = store.add_or_replace(1, '\u{1F980}');

        assert!(matches!(result, Err(StoreError::Codec(_))));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_corruption_reads_as_missing() {
        let mut store = KeyValueStore::with_config(
            MockBackupMemory::new(64),
            StoreConfig::with_fixed_offset(8),
        );
        store.add_or_replace(1, 100i32).unwrap();

        // Flip a byte of the value
        store.frame_store_mut().memory_mut().inject_corruption(8 + 2 + 3, 1);

        assert_eq!(store.recall(1).unwrap(), None);
        assert_eq!(store.status(), FrameStatus::Corrupted);
        assert_eq!(store.free(), 64);

        // A new write repopulates the store
        store.add_or_replace(2, 5u8).unwrap();
        assert_eq!(store.recall(2).unwrap(), Some(TypedValue::U8(5)));
        assert_eq!(store.status(), FrameStatus::Loaded);
    }

    #[test]
    fn test_clear() {
        let mut store = store(64);
        store.add_or_replace(1, 1.5f32).unwrap();

        store.clear().unwrap();

        assert_eq!(store.recall(1).unwrap(), None);
        assert_eq!(store.free(), 64);
        assert_eq!(store.status(), FrameStatus::Empty);
    }

    #[test]
    fn test_entries_and_contains_key() {
        let mut store = store(128);
        store.add_or_replace(10, -1i64).unwrap();
        store.add_or_replace(20, 'x').unwrap();

        let entries = store.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get(&20), Some(&TypedValue::Char('x')));
        assert!(store.contains_key(10).unwrap());
        assert!(!store.contains_key(30).unwrap());
    }

    #[test]
    fn test_dump_covers_every_byte() {
        let mut store = store(48);
        store.add_or_replace(1, 1u8).unwrap();

        let dump = store.dump().unwrap();
        let rows: alloc::vec::Vec<&str> = dump.lines().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().filter(|row| row.contains('*')).count(), 1);
    }
}
