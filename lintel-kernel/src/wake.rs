//! Self-pipe used to interrupt the loop's blocking wait.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};

use nix::fcntl::OFlag;
use nix::unistd::pipe2;

use crate::error::LoopError;

#[derive(Debug)]
pub struct WakePipe {
    read: File,
    write: File,
}

impl WakePipe {
    pub fn new() -> Result<Self, LoopError> {
        let (read, write) = pipe2(OFlag::O_NONBLOCK | OFlag::O_CLOEXEC)?;
        Ok(Self {
            read: File::from(read),
            write: File::from(write),
        })
    }

    /// Make the next wait return. A full pipe already guarantees that.
    pub fn wake(&self) {
        let _ = (&self.write).write(&[1]);
    }

    /// Raw write end, for the signal handler.
    pub fn write_fd(&self) -> RawFd {
        self.write.as_raw_fd()
    }

    /// Consume all pending wake bytes. Returns how many were read.
    pub fn drain(&self) -> usize {
        let mut buf = [0u8; 64];
        let mut total = 0;
        loop {
            match (&self.read).read(&mut buf) {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        total
    }
}

impl AsFd for WakePipe {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.read.as_fd()
    }
}
