// CLASSIFICATION: COMMUNITY
// Filename: frame.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! Trap frame and syscall numbering for the x86-64 `syscall` convention:
//! number in rax, arguments in rdi, rsi, rdx, r10, r8, r9, return value
//! written back to rax.

use bitflags::bitflags;

bitflags! {
    /// rflags bits the syscall entry masks off before entering the kernel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RFlags: u64 {
        const TF   = 0x100;
        const IF   = 0x200;
        const DF   = 0x400;
        const IOPL = 0x3000;
        const NT   = 0x4000;
        const AC   = 0x40000;
    }
}

/// Flags cleared on kernel entry so user state cannot leak into the handler.
pub const SYSCALL_FLAG_MASK: RFlags = RFlags::IF
    .union(RFlags::TF)
    .union(RFlags::DF)
    .union(RFlags::IOPL)
    .union(RFlags::AC)
    .union(RFlags::NT);

/// Register state captured on trap entry. Ephemeral: lives for one trap.
#[derive(Debug, Clone)]
pub struct IntrFrame {
    pub rax: u64,
    pub rdi: u64,
    pub rsi: u64,
    pub rdx: u64,
    pub r10: u64,
    pub r8: u64,
    pub r9: u64,
    pub rsp: u64,
    pub rip: u64,
    pub rflags: RFlags,
}

impl IntrFrame {
    /// Build the frame a user program presents when issuing `nr` with up to
    /// six arguments, stack at `rsp`.
    pub fn syscall(nr: SyscallNr, args: &[u64], rsp: u64) -> Self {
        let mut padded = [0u64; 6];
        padded[..args.len()].copy_from_slice(args);
        IntrFrame {
            rax: nr as u64,
            rdi: padded[0],
            rsi: padded[1],
            rdx: padded[2],
            r10: padded[3],
            r8: padded[4],
            r9: padded[5],
            rsp,
            rip: 0,
            // entry already applied SYSCALL_FLAG_MASK
            rflags: RFlags::empty(),
        }
    }

    /// Argument registers in ABI order.
    pub fn args(&self) -> [u64; 6] {
        [self.rdi, self.rsi, self.rdx, self.r10, self.r8, self.r9]
    }
}

/// Syscall numbers, matching the userland syscall stubs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum SyscallNr {
    Halt = 0,
    Exit = 1,
    Fork = 2,
    Exec = 3,
    Wait = 4,
    Create = 5,
    Remove = 6,
    Open = 7,
    Filesize = 8,
    Read = 9,
    Write = 10,
    Seek = 11,
    Tell = 12,
    Close = 13,
}

impl SyscallNr {
    pub fn from_raw(raw: u64) -> Option<Self> {
        use SyscallNr::*;
        Some(match raw {
            0 => Halt,
            1 => Exit,
            2 => Fork,
            3 => Exec,
            4 => Wait,
            5 => Create,
            6 => Remove,
            7 => Open,
            8 => Filesize,
            9 => Read,
            10 => Write,
            11 => Seek,
            12 => Tell,
            13 => Close,
            _ => return None,
        })
    }
}
