// CLASSIFICATION: COMMUNITY
// Filename: usermem.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! Simulated per-process user address space.
//!
//! Each process owns one flat region mapped at [`USER_BASE`]. The kernel
//! never hands out references into it; data crosses the boundary only
//! through `copy_in` / `copy_out` / `copy_in_str`, each of which runs the
//! validation gate first. An address that passes the gate but is not backed
//! by the region behaves like a page fault: [`AddrError::Unmapped`].

use crate::kernel::vaddr::{check_uaddr, AddrError, USER_BASE, USER_MEM_SIZE};

pub struct UserMem {
    bytes: Vec<u8>,
}

impl Default for UserMem {
    fn default() -> Self {
        Self::new()
    }
}

impl UserMem {
    pub fn new() -> Self {
        UserMem {
            bytes: vec![0; USER_MEM_SIZE],
        }
    }

    /// Validate `[addr, addr + len)` without touching memory.
    pub fn check(&self, addr: u64, len: usize) -> Result<(), AddrError> {
        check_uaddr(addr, len)?;
        self.offset(addr, len)?;
        Ok(())
    }

    /// Copy `len` bytes out of user memory into a kernel buffer.
    pub fn copy_in(&self, addr: u64, len: usize) -> Result<Vec<u8>, AddrError> {
        check_uaddr(addr, len)?;
        let off = self.offset(addr, len)?;
        Ok(self.bytes[off..off + len].to_vec())
    }

    /// Copy a kernel buffer into user memory at `addr`.
    pub fn copy_out(&mut self, addr: u64, data: &[u8]) -> Result<(), AddrError> {
        check_uaddr(addr, data.len())?;
        let off = self.offset(addr, data.len())?;
        self.bytes[off..off + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Copy a NUL-terminated user string, walking byte by byte so a string
    /// that runs off the mapped region (or into kernel space) faults instead
    /// of reading past the boundary.
    pub fn copy_in_str(&self, addr: u64) -> Result<String, AddrError> {
        let mut out = Vec::new();
        let mut at = addr;
        loop {
            check_uaddr(at, 1)?;
            let off = self.offset(at, 1)?;
            let byte = self.bytes[off];
            if byte == 0 {
                return Ok(String::from_utf8_lossy(&out).into_owned());
            }
            out.push(byte);
            at += 1;
        }
    }

    fn offset(&self, addr: u64, len: usize) -> Result<usize, AddrError> {
        if addr < USER_BASE {
            return Err(AddrError::Unmapped(addr));
        }
        let off = (addr - USER_BASE) as usize;
        if off.checked_add(len).map_or(true, |end| end > self.bytes.len()) {
            return Err(AddrError::Unmapped(addr));
        }
        Ok(off)
    }
}
