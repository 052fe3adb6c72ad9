// CLASSIFICATION: COMMUNITY
// Filename: syscall.rs v0.7
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! Syscall entry point: the first kernel code that runs after the
//! architecture stub captures an [`IntrFrame`].
//!
//! The frame's stack pointer goes through the validation gate before the
//! syscall number or any argument is trusted. A gate failure never reaches a
//! handler; the process is terminated with status -1 and the trap is over.

use log::{debug, warn};
use thiserror::Error;

use crate::kernel::machine::Kernel;
use crate::kernel::proc_mgr::Pid;
use crate::kernel::syscalls::frame::IntrFrame;
use crate::kernel::syscalls::syscall_table::dispatch;
use crate::kernel::vaddr::{check_uaddr, AddrError};

/// Fatal-to-process conditions. Anything here terminates the caller; it is
/// never surfaced as a return value in user space.
#[derive(Error, Debug)]
pub enum Fault {
    #[error("invalid user pointer: {0}")]
    BadAddress(#[from] AddrError),
    #[error("unknown or unimplemented syscall {0}")]
    UnknownSyscall(u64),
    #[error("no such process {0}")]
    NoProcess(Pid),
}

/// What the scheduler glue should do with the calling thread once the trap
/// has been serviced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapOutcome {
    /// Resume the caller; the value has been written to the frame's rax.
    Resume(i64),
    /// The process was terminated with this status and never resumes.
    Exit(i32),
    /// The machine powered off.
    Halt,
}

/// Service one trap for process `pid`. Performs exactly one handler
/// invocation and returns synchronously.
pub fn handle_trap(kernel: &Kernel, pid: Pid, frame: &mut IntrFrame) -> TrapOutcome {
    if let Err(e) = check_uaddr(frame.rsp, 1) {
        warn!("pid {pid}: bad user stack pointer: {e}");
        kernel.terminate(pid, -1);
        return TrapOutcome::Exit(-1);
    }

    let args = frame.args();
    debug!("pid {pid}: syscall {} args={args:#x?}", frame.rax);

    let outcome = dispatch(kernel, pid, frame.rax, &args);
    if let TrapOutcome::Resume(value) = outcome {
        frame.rax = value as u64;
    }
    outcome
}
