// CLASSIFICATION: COMMUNITY
// Filename: memfs.rs v0.5
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! In-memory filesystem standing in for the on-disk one.
//!
//! The kernel sees only this surface: create / remove / open on names, and
//! read / write / len on opaque [`FileHandle`]s. Removing a name unlinks it
//! from the directory while existing handles keep working against the same
//! node, so an open file survives its own removal.
//!
//! `MemFs` is not internally serialized against other filesystem users; the
//! syscall layer holds the kernel's global filesystem lock around every call
//! in here.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("file {0:?} already exists")]
    Exists(String),
    #[error("no such file {0:?}")]
    NotFound(String),
}

#[derive(Debug)]
struct FileNode {
    data: Mutex<Vec<u8>>,
    open_handles: AtomicUsize,
}

/// Opaque handle returned by `open`. Each handle carries its own position;
/// dropping it is what closes it.
#[derive(Debug)]
pub struct FileHandle {
    node: Arc<FileNode>,
    pos: usize,
}

impl FileHandle {
    /// Read up to `buf.len()` bytes at the current position. Short counts
    /// happen at end-of-file.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let data = self.node.data.lock().unwrap();
        let avail = data.len().saturating_sub(self.pos);
        let n = avail.min(buf.len());
        buf[..n].copy_from_slice(&data[self.pos..self.pos + n]);
        self.pos += n;
        n
    }

    /// Write `buf` at the current position, growing the file as needed.
    pub fn write(&mut self, buf: &[u8]) -> usize {
        let mut data = self.node.data.lock().unwrap();
        let end = self.pos + buf.len();
        if data.len() < end {
            data.resize(end, 0);
        }
        data[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        buf.len()
    }

    /// Current file length in bytes.
    pub fn len(&self) -> usize {
        self.node.data.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        self.node.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct MemFs {
    files: Mutex<HashMap<String, Arc<FileNode>>>,
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemFs {
    pub fn new() -> Self {
        MemFs {
            files: Mutex::new(HashMap::new()),
        }
    }

    /// Create `name` with `initial_size` zero bytes. Fails if it exists.
    pub fn create(&self, name: &str, initial_size: usize) -> Result<(), FsError> {
        let mut files = self.files.lock().unwrap();
        if files.contains_key(name) {
            return Err(FsError::Exists(name.to_string()));
        }
        files.insert(
            name.to_string(),
            Arc::new(FileNode {
                data: Mutex::new(vec![0; initial_size]),
                open_handles: AtomicUsize::new(0),
            }),
        );
        Ok(())
    }

    /// Unlink `name`. Handles already open on it remain usable.
    pub fn remove(&self, name: &str) -> Result<(), FsError> {
        self.files
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| FsError::NotFound(name.to_string()))
    }

    /// Open `name`, yielding a fresh handle positioned at byte 0.
    pub fn open(&self, name: &str) -> Result<FileHandle, FsError> {
        let files = self.files.lock().unwrap();
        let node = files
            .get(name)
            .cloned()
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        node.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(FileHandle { node, pos: 0 })
    }

    pub fn exists(&self, name: &str) -> bool {
        self.files.lock().unwrap().contains_key(name)
    }

    /// Number of live handles on `name`, if it is still linked. Used by the
    /// host to verify exit cleanup released everything.
    pub fn open_count(&self, name: &str) -> Option<usize> {
        self.files
            .lock()
            .unwrap()
            .get(name)
            .map(|n| n.open_handles.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_is_exclusive() {
        let fs = MemFs::new();
        fs.create("a", 0).unwrap();
        assert_eq!(fs.create("a", 0), Err(FsError::Exists("a".into())));
    }

    #[test]
    fn write_grows_and_read_hits_eof() {
        let fs = MemFs::new();
        fs.create("f", 0).unwrap();
        let mut w = fs.open("f").unwrap();
        assert_eq!(w.write(b"ab"), 2);
        assert_eq!(w.len(), 2);
        let mut r = fs.open("f").unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(r.read(&mut buf), 2);
        assert_eq!(&buf[..2], b"ab");
        assert_eq!(r.read(&mut buf), 0);
    }

    #[test]
    fn removed_file_keeps_open_handles_alive() {
        let fs = MemFs::new();
        fs.create("f", 0).unwrap();
        let mut h = fs.open("f").unwrap();
        h.write(b"xyz");
        fs.remove("f").unwrap();
        assert!(!fs.exists("f"));
        let mut buf = [0u8; 3];
        let mut again = h;
        again.pos = 0;
        assert_eq!(again.read(&mut buf), 3);
        assert_eq!(&buf, b"xyz");
    }

    #[test]
    fn open_count_tracks_handle_lifetime() {
        let fs = MemFs::new();
        fs.create("f", 1).unwrap();
        assert_eq!(fs.open_count("f"), Some(0));
        let h = fs.open("f").unwrap();
        let h2 = fs.open("f").unwrap();
        assert_eq!(fs.open_count("f"), Some(2));
        drop(h);
        drop(h2);
        assert_eq!(fs.open_count("f"), Some(0));
        assert_eq!(fs.open_count("missing"), None);
    }
}
