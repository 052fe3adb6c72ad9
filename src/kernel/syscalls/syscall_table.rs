// CLASSIFICATION: COMMUNITY
// Filename: syscall_table.rs v0.8
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! Syscall handlers and the number → handler table.
//!
//! Handlers return `Result<i64, Fault>`: the Ok value lands in the caller's
//! rax, a Fault terminates the caller with status -1. Recoverable failures
//! (missing files, bad descriptors) never become Faults; they are the
//! sentinel return values the syscall ABI defines (false / -1 / 0).
//!
//! Lock discipline: the global filesystem lock is taken before the process
//! table and held across the whole filesystem call, for every handler that
//! touches the filesystem.

use log::{debug, warn};

use crate::kernel::fd_table::{FD_STDIN, FD_STDOUT};
use crate::kernel::machine::Kernel;
use crate::kernel::proc_mgr::Pid;
use crate::kernel::syscalls::frame::SyscallNr;
use crate::kernel::syscalls::syscall::{Fault, TrapOutcome};

pub(crate) fn dispatch(kernel: &Kernel, pid: Pid, raw: u64, args: &[u64; 6]) -> TrapOutcome {
    use SyscallNr::*;

    let result = match SyscallNr::from_raw(raw) {
        Some(Halt) => {
            kernel.power_off();
            return TrapOutcome::Halt;
        }
        Some(Exit) => {
            let status = args[0] as i32;
            kernel.terminate(pid, status);
            return TrapOutcome::Exit(status);
        }
        Some(Exec) => sys_exec(kernel, pid, args),
        Some(Wait) => sys_wait(kernel, pid, args),
        Some(Create) => sys_create(kernel, pid, args),
        Some(Remove) => sys_remove(kernel, pid, args),
        Some(Open) => sys_open(kernel, pid, args),
        Some(Filesize) => sys_filesize(kernel, pid, args),
        Some(Read) => sys_read(kernel, pid, args),
        Some(Write) => sys_write(kernel, pid, args),
        Some(Close) => sys_close(kernel, pid, args),
        // Fork, Seek and Tell are not part of this kernel's surface.
        Some(Fork) | Some(Seek) | Some(Tell) | None => Err(Fault::UnknownSyscall(raw)),
    };

    match result {
        Ok(value) => TrapOutcome::Resume(value),
        Err(fault) => {
            warn!("pid {pid}: fatal syscall fault: {fault}");
            kernel.terminate(pid, -1);
            TrapOutcome::Exit(-1)
        }
    }
}

fn sys_exec(kernel: &Kernel, pid: Pid, args: &[u64; 6]) -> Result<i64, Fault> {
    let cmd_line = copy_in_str(kernel, pid, args[0])?;
    Ok(kernel
        .process_exec(pid, &cmd_line)
        .map(i64::from)
        .unwrap_or(-1))
}

fn sys_wait(kernel: &Kernel, pid: Pid, args: &[u64; 6]) -> Result<i64, Fault> {
    let child = args[0] as u32;
    Ok(kernel
        .process_wait(pid, child)
        .map(i64::from)
        .unwrap_or(-1))
}

fn sys_create(kernel: &Kernel, pid: Pid, args: &[u64; 6]) -> Result<i64, Fault> {
    let name = copy_in_str(kernel, pid, args[0])?;
    let initial_size = args[1] as usize;
    let _fs = kernel.filesys_guard();
    Ok(match kernel.filesys().create(&name, initial_size) {
        Ok(()) => 1,
        Err(e) => {
            debug!("pid {pid}: create failed: {e}");
            0
        }
    })
}

fn sys_remove(kernel: &Kernel, pid: Pid, args: &[u64; 6]) -> Result<i64, Fault> {
    let name = copy_in_str(kernel, pid, args[0])?;
    let _fs = kernel.filesys_guard();
    Ok(match kernel.filesys().remove(&name) {
        Ok(()) => 1,
        Err(e) => {
            debug!("pid {pid}: remove failed: {e}");
            0
        }
    })
}

fn sys_open(kernel: &Kernel, pid: Pid, args: &[u64; 6]) -> Result<i64, Fault> {
    let name = copy_in_str(kernel, pid, args[0])?;
    let _fs = kernel.filesys_guard();
    let handle = match kernel.filesys().open(&name) {
        Ok(handle) => handle,
        Err(e) => {
            debug!("pid {pid}: open failed: {e}");
            return Ok(-1);
        }
    };
    let mut procs = kernel.procs.lock().unwrap();
    let proc = procs.get_mut(pid).ok_or(Fault::NoProcess(pid))?;
    match proc.fds.install(handle) {
        Ok(fd) => Ok(i64::from(fd)),
        Err(handle) => {
            warn!("pid {pid}: descriptor table full, closing {name:?}");
            drop(handle);
            Ok(-1)
        }
    }
}

fn sys_filesize(kernel: &Kernel, pid: Pid, args: &[u64; 6]) -> Result<i64, Fault> {
    let fd = args[0] as i32;
    let _fs = kernel.filesys_guard();
    let mut procs = kernel.procs.lock().unwrap();
    let proc = procs.get_mut(pid).ok_or(Fault::NoProcess(pid))?;
    Ok(proc.fds.get_mut(fd).map(|h| h.len() as i64).unwrap_or(-1))
}

fn sys_read(kernel: &Kernel, pid: Pid, args: &[u64; 6]) -> Result<i64, Fault> {
    let fd = args[0] as i32;
    let buffer = args[1];
    let size = args[2] as usize;

    if fd == FD_STDIN {
        // one keyboard character per call, by convention
        return Ok(i64::from(kernel.console().getc()));
    }
    if fd == FD_STDOUT {
        return Ok(0);
    }

    let _fs = kernel.filesys_guard();
    let mut procs = kernel.procs.lock().unwrap();
    let proc = procs.get_mut(pid).ok_or(Fault::NoProcess(pid))?;
    if !proc.fds.is_open(fd) {
        return Ok(-1);
    }
    proc.mem.check(buffer, size)?;
    let mut data = vec![0u8; size];
    let Some(handle) = proc.fds.get_mut(fd) else {
        return Ok(-1);
    };
    let n = handle.read(&mut data);
    proc.mem.copy_out(buffer, &data[..n])?;
    Ok(n as i64)
}

fn sys_write(kernel: &Kernel, pid: Pid, args: &[u64; 6]) -> Result<i64, Fault> {
    let fd = args[0] as i32;
    let buffer = args[1];
    let size = args[2] as usize;

    if fd == FD_STDIN {
        return Ok(0);
    }
    if fd == FD_STDOUT {
        let data = copy_in(kernel, pid, buffer, size)?;
        kernel.console().putbuf(&data);
        return Ok(size as i64);
    }

    let _fs = kernel.filesys_guard();
    let mut procs = kernel.procs.lock().unwrap();
    let proc = procs.get_mut(pid).ok_or(Fault::NoProcess(pid))?;
    if !proc.fds.is_open(fd) {
        return Ok(0);
    }
    let data = proc.mem.copy_in(buffer, size)?;
    let Some(handle) = proc.fds.get_mut(fd) else {
        return Ok(0);
    };
    Ok(handle.write(&data) as i64)
}

fn sys_close(kernel: &Kernel, pid: Pid, args: &[u64; 6]) -> Result<i64, Fault> {
    let fd = args[0] as i32;
    let _fs = kernel.filesys_guard();
    let mut procs = kernel.procs.lock().unwrap();
    let proc = procs.get_mut(pid).ok_or(Fault::NoProcess(pid))?;
    match proc.fds.remove(fd) {
        Some(handle) => {
            drop(handle);
            Ok(0)
        }
        None => {
            debug!("pid {pid}: close on bad fd {fd}");
            Ok(-1)
        }
    }
}

/// Copy a NUL-terminated string argument across the boundary, running the
/// validation gate on every byte it touches.
fn copy_in_str(kernel: &Kernel, pid: Pid, addr: u64) -> Result<String, Fault> {
    let procs = kernel.procs.lock().unwrap();
    let proc = procs.get(pid).ok_or(Fault::NoProcess(pid))?;
    Ok(proc.mem.copy_in_str(addr)?)
}

/// Copy a buffer argument across the boundary after validating its full span.
fn copy_in(kernel: &Kernel, pid: Pid, addr: u64, len: usize) -> Result<Vec<u8>, Fault> {
    let procs = kernel.procs.lock().unwrap();
    let proc = procs.get(pid).ok_or(Fault::NoProcess(pid))?;
    Ok(proc.mem.copy_in(addr, len)?)
}
