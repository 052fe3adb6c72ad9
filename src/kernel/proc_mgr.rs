// CLASSIFICATION: COMMUNITY
// Filename: proc_mgr.rs v0.6
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! Process table and the process-control operations behind exec/wait/exit.
//!
//! Each process owns its descriptor table and user memory outright; nothing
//! here is shared between processes except the table map itself. Exit is the
//! single teardown path: it releases every open descriptor, prints the
//! termination notice and wakes any parent blocked in wait.

use std::collections::HashMap;

use log::{info, warn};

use crate::kernel::fd_table::FdTable;
use crate::kernel::machine::Kernel;
use crate::kernel::usermem::UserMem;

pub type Pid = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcState {
    Ready,
    Running,
    Exited,
}

pub struct KProc {
    pub pid: Pid,
    pub parent: Option<Pid>,
    pub name: String,
    pub state: ProcState,
    pub exit_code: i32,
    pub fds: FdTable,
    pub mem: UserMem,
}

pub struct ProcTable {
    next_pid: Pid,
    procs: HashMap<Pid, KProc>,
}

impl ProcTable {
    pub fn new() -> Self {
        ProcTable {
            next_pid: 1,
            procs: HashMap::new(),
        }
    }

    pub fn get(&self, pid: Pid) -> Option<&KProc> {
        self.procs.get(&pid)
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut KProc> {
        self.procs.get_mut(&pid)
    }

    fn insert(&mut self, name: &str, parent: Option<Pid>) -> Pid {
        let pid = self.next_pid;
        self.next_pid += 1;
        self.procs.insert(
            pid,
            KProc {
                pid,
                parent,
                name: name.to_string(),
                state: ProcState::Ready,
                exit_code: -1,
                fds: FdTable::new(),
                mem: UserMem::new(),
            },
        );
        pid
    }
}

impl Default for ProcTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel {
    /// Load an initial process (no parent). Host-side entry, not a syscall.
    pub fn spawn(&self, name: &str) -> Pid {
        let pid = self.procs.lock().unwrap().insert(name, None);
        info!("spawn {name:?} pid={pid}");
        pid
    }

    /// exec collaborator: run the program named by the first token of
    /// `cmd_line` as a child of `parent`. Fails when the program file does
    /// not exist in the filesystem.
    pub fn process_exec(&self, parent: Pid, cmd_line: &str) -> Option<Pid> {
        let name = cmd_line.split_whitespace().next()?;
        {
            let _fs = self.filesys_guard();
            if !self.filesys().exists(name) {
                warn!("exec {name:?}: no such program");
                return None;
            }
        }
        let pid = self.procs.lock().unwrap().insert(name, Some(parent));
        info!("exec {name:?} pid={pid} parent={parent}");
        Some(pid)
    }

    /// wait collaborator: block until the named child of `caller` exits,
    /// then reap it and return its status. Non-children, unknown pids and
    /// already-reaped children return None without blocking.
    pub fn process_wait(&self, caller: Pid, child: Pid) -> Option<i32> {
        let mut procs = self.procs.lock().unwrap();
        loop {
            match procs.get(child) {
                Some(p) if p.parent == Some(caller) => {
                    if p.state == ProcState::Exited {
                        let reaped = procs.procs.remove(&child)?;
                        return Some(reaped.exit_code);
                    }
                }
                _ => return None,
            }
            procs = self.proc_exit.wait(procs).unwrap();
        }
    }

    /// Terminate `pid` with `status`: close every open descriptor, print
    /// the termination notice, mark the process exited and wake waiters.
    /// The process entry stays in the table until its parent reaps it.
    pub fn terminate(&self, pid: Pid, status: i32) {
        let (name, handles) = {
            let mut procs = self.procs.lock().unwrap();
            let Some(proc) = procs.get_mut(pid) else {
                warn!("terminate: unknown pid {pid}");
                return;
            };
            proc.exit_code = status;
            (proc.name.clone(), proc.fds.drain_open())
        };

        if !handles.is_empty() {
            let _fs = self.filesys_guard();
            drop(handles);
        }

        self.console()
            .putbuf(format!("{name}: exit({status})\n").as_bytes());
        info!("{name}: exit({status})");

        let mut procs = self.procs.lock().unwrap();
        if let Some(proc) = procs.get_mut(pid) {
            proc.state = ProcState::Exited;
        }
        drop(procs);
        self.proc_exit.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_requires_an_existing_program() {
        let kernel = Kernel::new();
        let parent = kernel.spawn("init");
        assert_eq!(kernel.process_exec(parent, "ghost"), None);
        kernel.filesys().create("child.bin", 0).unwrap();
        let pid = kernel.process_exec(parent, "child.bin arg1").unwrap();
        assert_eq!(
            kernel.procs.lock().unwrap().get(pid).unwrap().name,
            "child.bin"
        );
    }

    #[test]
    fn wait_rejects_non_children_without_blocking() {
        let kernel = Kernel::new();
        let a = kernel.spawn("a");
        let b = kernel.spawn("b");
        assert_eq!(kernel.process_wait(a, b), None);
        assert_eq!(kernel.process_wait(a, 999), None);
    }

    #[test]
    fn wait_collects_exit_status_once() {
        let kernel = Kernel::new();
        let parent = kernel.spawn("init");
        kernel.filesys().create("c", 0).unwrap();
        let child = kernel.process_exec(parent, "c").unwrap();
        kernel.terminate(child, 42);
        assert_eq!(kernel.process_wait(parent, child), Some(42));
        // second wait finds the child already reaped
        assert_eq!(kernel.process_wait(parent, child), None);
    }

    #[test]
    fn terminate_emits_one_notice() {
        let kernel = Kernel::new();
        let pid = kernel.spawn("prog");
        kernel.terminate(pid, 7);
        let out = String::from_utf8(kernel.console().take_output()).unwrap();
        assert_eq!(out, "prog: exit(7)\n");
    }
}
