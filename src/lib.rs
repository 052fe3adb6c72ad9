// CLASSIFICATION: COMMUNITY
// Filename: lib.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! Root library for the AcornOS teaching kernel.
//!
//! AcornOS runs hosted: user address spaces, the console device and the
//! filesystem are simulated in ordinary memory, so the syscall trust
//! boundary can be driven and inspected from integration tests without
//! booting hardware.

/// Kernel modules: syscall boundary, processes, descriptors, devices.
pub mod kernel;

pub use kernel::machine::Kernel;
pub use kernel::syscalls::frame::{IntrFrame, SyscallNr};
pub use kernel::syscalls::syscall::{handle_trap, TrapOutcome};
