// CLASSIFICATION: COMMUNITY
// Filename: mod.rs v0.3
// Author: Lukas Bower
// Date Modified: 2026-03-18

pub mod console;
pub mod fd_table;
pub mod fixed_point;
pub mod machine;
pub mod memfs;
pub mod proc_mgr;
pub mod usermem;
pub mod vaddr;

pub mod syscalls {
    pub mod frame;
    pub mod syscall;
    pub mod syscall_table;
}
