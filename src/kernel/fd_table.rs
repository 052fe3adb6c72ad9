// CLASSIFICATION: COMMUNITY
// Filename: fd_table.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! Per-process file descriptor table.
//!
//! A fixed array of 128 slots. Slot 0 is stdin, slot 1 stdout, slot 2 is
//! reserved and never populated; slots 3..=127 each hold at most one
//! [`FileHandle`]. Every lookup is fallible: out-of-range, reserved and
//! empty slots are an explicit miss, never an unchecked index.

use crate::kernel::memfs::FileHandle;

/// Total slots per process, standard streams included.
pub const FD_MAX: usize = 128;

/// Lowest descriptor eligible for a file handle.
pub const FD_FIRST_FILE: usize = 3;

pub const FD_STDIN: i32 = 0;
pub const FD_STDOUT: i32 = 1;

pub struct FdTable {
    slots: Vec<Option<FileHandle>>,
}

impl Default for FdTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FdTable {
    pub fn new() -> Self {
        FdTable {
            slots: (0..FD_MAX).map(|_| None).collect(),
        }
    }

    /// Install `handle` in the lowest free slot >= 3 and return its index.
    /// When the table is full the handle is handed back to the caller.
    pub fn install(&mut self, handle: FileHandle) -> Result<i32, FileHandle> {
        for fd in FD_FIRST_FILE..FD_MAX {
            if self.slots[fd].is_none() {
                self.slots[fd] = Some(handle);
                return Ok(fd as i32);
            }
        }
        Err(handle)
    }

    /// True when `fd` names a populated file slot.
    pub fn is_open(&self, fd: i32) -> bool {
        self.index(fd)
            .map(|i| self.slots[i].is_some())
            .unwrap_or(false)
    }

    pub fn get_mut(&mut self, fd: i32) -> Option<&mut FileHandle> {
        let i = self.index(fd)?;
        self.slots[i].as_mut()
    }

    /// Clear slot `fd`, yielding its handle so the caller can close it.
    pub fn remove(&mut self, fd: i32) -> Option<FileHandle> {
        let i = self.index(fd)?;
        self.slots[i].take()
    }

    /// Empty every populated slot >= 3 (exit cleanup).
    pub fn drain_open(&mut self) -> Vec<FileHandle> {
        self.slots
            .iter_mut()
            .skip(FD_FIRST_FILE)
            .filter_map(Option::take)
            .collect()
    }

    fn index(&self, fd: i32) -> Option<usize> {
        let fd = usize::try_from(fd).ok()?;
        (FD_FIRST_FILE..FD_MAX).contains(&fd).then_some(fd)
    }
}
