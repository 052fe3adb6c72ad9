// CLASSIFICATION: COMMUNITY
// Filename: vaddr.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! Virtual address layout and the user-pointer validation gate.
//!
//! Every address a user program hands the kernel (the trap frame's stack
//! pointer, buffer and string arguments) passes through [`check_uaddr`]
//! before anything dereferences it. A failure here is fatal
//! to the calling process, never to the kernel.

use thiserror::Error;

/// First byte of kernel space. User addresses live strictly below this.
pub const KERN_BASE: u64 = 0x80_0400_0000;

/// Base of the simulated user address space region.
pub const USER_BASE: u64 = 0x40_0000;

/// Bytes of user memory mapped for each process.
pub const USER_MEM_SIZE: usize = 0x1_0000;

/// Initial user stack pointer handed to a freshly loaded program.
pub const USER_STACK_TOP: u64 = USER_BASE + USER_MEM_SIZE as u64;

/// Why a user-supplied address was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrError {
    #[error("null user pointer")]
    Null,
    #[error("address {0:#x} lies in kernel space")]
    KernelSpace(u64),
    #[error("unmapped user address {0:#x}")]
    Unmapped(u64),
}

/// True when `addr` falls inside the kernel's reserved range.
pub fn is_kernel_vaddr(addr: u64) -> bool {
    addr >= KERN_BASE
}

/// Validate the full span `[addr, addr + len)` as user-dereferenceable.
///
/// Rejects the null pointer and any span whose start or end reaches kernel
/// space, including spans that begin in user space and cross the boundary.
/// `len == 0` still rejects null and kernel starting addresses.
pub fn check_uaddr(addr: u64, len: usize) -> Result<(), AddrError> {
    if addr == 0 {
        return Err(AddrError::Null);
    }
    if is_kernel_vaddr(addr) {
        return Err(AddrError::KernelSpace(addr));
    }
    if len > 1 {
        let end = addr
            .checked_add(len as u64 - 1)
            .ok_or(AddrError::KernelSpace(u64::MAX))?;
        if is_kernel_vaddr(end) {
            return Err(AddrError::KernelSpace(end));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_rejected() {
        assert_eq!(check_uaddr(0, 1), Err(AddrError::Null));
        assert_eq!(check_uaddr(0, 0), Err(AddrError::Null));
    }

    #[test]
    fn kernel_addresses_are_rejected() {
        assert_eq!(
            check_uaddr(KERN_BASE, 1),
            Err(AddrError::KernelSpace(KERN_BASE))
        );
        assert!(check_uaddr(KERN_BASE + 0x1000, 8).is_err());
    }

    #[test]
    fn span_crossing_into_kernel_space_is_rejected() {
        let start = KERN_BASE - 4;
        assert!(check_uaddr(start, 4).is_ok());
        assert_eq!(
            check_uaddr(start, 8),
            Err(AddrError::KernelSpace(KERN_BASE + 3))
        );
    }

    #[test]
    fn overflowing_span_is_rejected() {
        assert!(check_uaddr(u64::MAX - 2, 16).is_err());
    }

    #[test]
    fn user_range_is_accepted() {
        assert!(check_uaddr(USER_BASE, USER_MEM_SIZE).is_ok());
    }
}
