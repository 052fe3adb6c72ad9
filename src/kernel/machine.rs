// CLASSIFICATION: COMMUNITY
// Filename: machine.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! The simulated machine: one kernel instance owning every shared subsystem.
//!
//! Construction is kernel init. The filesystem lock lives here for the whole
//! kernel lifetime and is the single serialization point for every
//! filesystem-touching syscall. Lock order is filesystem lock before process
//! table, everywhere.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard};

use log::info;

use crate::kernel::console::Console;
use crate::kernel::memfs::MemFs;
use crate::kernel::proc_mgr::ProcTable;
use crate::kernel::usermem::UserMem;
use crate::kernel::vaddr::AddrError;
use crate::kernel::syscalls::syscall::Fault;

pub struct Kernel {
    pub(crate) procs: Mutex<ProcTable>,
    pub(crate) proc_exit: Condvar,
    filesys: MemFs,
    filesys_lock: Mutex<()>,
    console: Console,
    halted: AtomicBool,
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel {
    /// Kernel init: bring up the console, the filesystem and the global
    /// filesystem lock, with an empty process table.
    pub fn new() -> Self {
        info!("acornos: kernel init");
        Kernel {
            procs: Mutex::new(ProcTable::new()),
            proc_exit: Condvar::new(),
            filesys: MemFs::new(),
            filesys_lock: Mutex::new(()),
            console: Console::new(),
            halted: AtomicBool::new(false),
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn filesys(&self) -> &MemFs {
        &self.filesys
    }

    /// Acquire the global filesystem lock. Held for the full duration of
    /// every create/remove/open/read/write/filesize/close that reaches the
    /// filesystem.
    pub(crate) fn filesys_guard(&self) -> MutexGuard<'_, ()> {
        self.filesys_lock.lock().unwrap()
    }

    /// Power the machine off. Nothing resumes afterwards.
    pub fn power_off(&self) {
        info!("acornos: power off");
        self.halted.store(true, Ordering::SeqCst);
    }

    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Host-side poke into a process's user memory (the "loader" writing
    /// argument strings and buffers before the program traps).
    pub fn write_user(&self, pid: u32, addr: u64, data: &[u8]) -> Result<(), Fault> {
        self.with_user_mem(pid, |mem| mem.copy_out(addr, data))
    }

    /// Host-side read of a process's user memory.
    pub fn read_user(&self, pid: u32, addr: u64, len: usize) -> Result<Vec<u8>, Fault> {
        self.with_user_mem(pid, |mem| mem.copy_in(addr, len))
    }

    fn with_user_mem<T>(
        &self,
        pid: u32,
        f: impl FnOnce(&mut UserMem) -> Result<T, AddrError>,
    ) -> Result<T, Fault> {
        let mut procs = self.procs.lock().unwrap();
        let proc = procs.get_mut(pid).ok_or(Fault::NoProcess(pid))?;
        f(&mut proc.mem).map_err(Fault::from)
    }
}
