// CLASSIFICATION: COMMUNITY
// Filename: usermem_guard.rs v0.4
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! The pointer-validation gate, exercised end to end: every user-supplied
//! address that is null, kernel-resident or dangling must terminate the
//! caller with status -1 before the requested operation runs.

use acornos::kernel::vaddr::{KERN_BASE, USER_BASE, USER_STACK_TOP};
use acornos::{handle_trap, IntrFrame, Kernel, SyscallNr, TrapOutcome};
use once_cell::sync::Lazy;

static LOG: Lazy<()> = Lazy::new(|| {
    let _ = env_logger::builder().is_test(true).try_init();
});

fn kernel_with_proc(name: &str) -> (Kernel, u32) {
    Lazy::force(&LOG);
    let kernel = Kernel::new();
    let pid = kernel.spawn(name);
    (kernel, pid)
}

fn trap(kernel: &Kernel, pid: u32, nr: SyscallNr, args: &[u64]) -> TrapOutcome {
    let mut frame = IntrFrame::syscall(nr, args, USER_STACK_TOP);
    handle_trap(kernel, pid, &mut frame)
}

fn assert_killed(kernel: &Kernel, outcome: TrapOutcome, name: &str) {
    assert_eq!(outcome, TrapOutcome::Exit(-1));
    let out = String::from_utf8(kernel.console().take_output()).unwrap();
    assert_eq!(out, format!("{name}: exit(-1)\n"));
}

#[test]
fn invalid_stack_pointer_is_fatal_before_dispatch() {
    for rsp in [0u64, KERN_BASE, KERN_BASE + 0xdead] {
        let (kernel, pid) = kernel_with_proc("p");
        let mut frame = IntrFrame::syscall(SyscallNr::Halt, &[], rsp);
        assert_eq!(handle_trap(&kernel, pid, &mut frame), TrapOutcome::Exit(-1));
        // the gate ran before the handler: the machine did not halt
        assert!(!kernel.is_halted());
        assert_killed(&kernel, TrapOutcome::Exit(-1), "p");
    }
}

#[test]
fn null_and_kernel_string_pointers_are_fatal() {
    for bad in [0u64, KERN_BASE + 0x10] {
        for nr in [SyscallNr::Create, SyscallNr::Remove, SyscallNr::Open, SyscallNr::Exec] {
            let (kernel, pid) = kernel_with_proc("p");
            let outcome = trap(&kernel, pid, nr, &[bad, 0]);
            assert_killed(&kernel, outcome, "p");
        }
    }
}

#[test]
fn fatal_create_leaves_no_file_behind() {
    let (kernel, pid) = kernel_with_proc("p");
    let outcome = trap(&kernel, pid, SyscallNr::Create, &[KERN_BASE, 16]);
    assert_killed(&kernel, outcome, "p");
    assert!(!kernel.filesys().exists(""));
}

#[test]
fn kernel_space_buffers_are_fatal_for_console_writes() {
    let (kernel, pid) = kernel_with_proc("p");
    let outcome = trap(&kernel, pid, SyscallNr::Write, &[1, KERN_BASE, 8]);
    assert_killed(&kernel, outcome, "p");
    assert!(kernel.console().take_output().is_empty());
}

#[test]
fn buffer_spans_crossing_into_kernel_space_are_fatal() {
    let (kernel, pid) = kernel_with_proc("p");
    // starts in user space, ends past KERN_BASE
    let start = KERN_BASE - 4;
    let outcome = trap(&kernel, pid, SyscallNr::Write, &[1, start, 8]);
    assert_killed(&kernel, outcome, "p");
}

#[test]
fn dangling_user_pointers_fault_like_a_page_miss() {
    let (kernel, pid) = kernel_with_proc("p");
    // below the mapped region, still a user address
    let outcome = trap(&kernel, pid, SyscallNr::Open, &[0x10]);
    assert_killed(&kernel, outcome, "p");
}

#[test]
fn fatal_buffer_faults_run_descriptor_cleanup() {
    let (kernel, pid) = kernel_with_proc("p");
    kernel.filesys().create("f", 4).unwrap();
    kernel.write_user(pid, USER_BASE, b"f\0").unwrap();
    let fd = match trap(&kernel, pid, SyscallNr::Open, &[USER_BASE]) {
        TrapOutcome::Resume(fd) => fd as u64,
        other => panic!("open failed: {other:?}"),
    };
    assert_eq!(kernel.filesys().open_count("f"), Some(1));

    // read into a kernel-space buffer through a valid descriptor
    let outcome = trap(&kernel, pid, SyscallNr::Read, &[fd, KERN_BASE, 4]);
    assert_killed(&kernel, outcome, "p");
    assert_eq!(kernel.filesys().open_count("f"), Some(0));
}

#[test]
fn terminated_process_reports_minus_one_to_its_parent() {
    let (kernel, parent) = kernel_with_proc("init");
    kernel.filesys().create("victim", 0).unwrap();
    kernel.write_user(parent, USER_BASE, b"victim\0").unwrap();
    let child = match trap(&kernel, parent, SyscallNr::Exec, &[USER_BASE]) {
        TrapOutcome::Resume(pid) => pid as u32,
        other => panic!("exec failed: {other:?}"),
    };

    let outcome = trap(&kernel, child, SyscallNr::Open, &[0]);
    assert_eq!(outcome, TrapOutcome::Exit(-1));
    match trap(&kernel, parent, SyscallNr::Wait, &[u64::from(child)]) {
        TrapOutcome::Resume(status) => assert_eq!(status, -1),
        other => panic!("wait failed: {other:?}"),
    }
}
