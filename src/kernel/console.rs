// CLASSIFICATION: COMMUNITY
// Filename: console.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-03-18

//! Simulated console device backing descriptors 0 and 1.
//!
//! The input side is a byte queue fed by the host (tests play the keyboard);
//! `getc` blocks until a byte arrives. The output side is an append-only
//! sink the host drains.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

pub struct Console {
    input: Mutex<VecDeque<u8>>,
    input_ready: Condvar,
    output: Mutex<Vec<u8>>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    pub fn new() -> Self {
        Console {
            input: Mutex::new(VecDeque::new()),
            input_ready: Condvar::new(),
            output: Mutex::new(Vec::new()),
        }
    }

    /// Queue keyboard bytes (device side).
    pub fn push_input(&self, bytes: &[u8]) {
        let mut q = self.input.lock().unwrap();
        q.extend(bytes.iter().copied());
        self.input_ready.notify_all();
    }

    /// Pop one input byte, blocking until one is available.
    pub fn getc(&self) -> u8 {
        let mut q = self.input.lock().unwrap();
        loop {
            if let Some(b) = q.pop_front() {
                return b;
            }
            q = self.input_ready.wait(q).unwrap();
        }
    }

    /// Append bytes to the console output.
    pub fn putbuf(&self, bytes: &[u8]) {
        self.output.lock().unwrap().extend_from_slice(bytes);
    }

    /// Snapshot the output written so far.
    pub fn output(&self) -> Vec<u8> {
        self.output.lock().unwrap().clone()
    }

    /// Drain the output sink (host side).
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut *self.output.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_is_fifo() {
        let con = Console::new();
        con.push_input(b"ab");
        assert_eq!(con.getc(), b'a');
        assert_eq!(con.getc(), b'b');
    }

    #[test]
    fn output_accumulates_in_order() {
        let con = Console::new();
        con.putbuf(b"hel");
        con.putbuf(b"lo");
        assert_eq!(con.take_output(), b"hello");
        assert!(con.take_output().is_empty());
    }
}
