//! Running user commands.
//!
//! Commands go through `sh -c` in a new session so they outlive the panel
//! and do not receive signals aimed at its process group. Children are
//! never waited on here; the event loop reaps them.

use std::io::{self, Read};
use std::os::fd::AsRawFd;
use std::os::unix::process::CommandExt;
use std::process::{ChildStdout, Command, Stdio};

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use tracing::{debug, warn};

fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).stdin(Stdio::null());
    // SAFETY: setsid is async-signal-safe and touches no shared state.
    unsafe {
        cmd.pre_exec(|| {
            nix::unistd::setsid().map_err(io::Error::from)?;
            Ok(())
        });
    }
    cmd
}

/// Start `command` detached. Returns the child's PID.
pub fn spawn(command: &str) -> io::Result<i32> {
    let child = shell(command).spawn()?;
    let pid = child.id() as i32;
    debug!("spawned {}: {}", pid, command);
    Ok(pid)
}

/// Like [`spawn`], logging instead of returning the error.
pub fn launch(command: &str) -> Option<i32> {
    match spawn(command) {
        Ok(pid) => Some(pid),
        Err(e) => {
            warn!("failed to run '{}': {}", command, e);
            None
        }
    }
}

/// Start `command` with its stdout connected to a non-blocking pipe.
pub fn spawn_captured(command: &str) -> io::Result<(i32, CapturedOutput)> {
    let mut child = shell(command).stdout(Stdio::piped()).spawn()?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("child stdout was not captured"))?;
    fcntl(stdout.as_raw_fd(), FcntlArg::F_SETFL(OFlag::O_NONBLOCK)).map_err(io::Error::from)?;
    let pid = child.id() as i32;
    debug!("spawned {} with captured output: {}", pid, command);
    Ok((pid, CapturedOutput::new(stdout)))
}

/// A child's stdout, accumulated across reads.
///
/// The pipe must be drained while the child runs: a writer that fills the
/// kernel buffer blocks until someone reads.
pub struct CapturedOutput {
    pipe: ChildStdout,
    buffer: Vec<u8>,
}

impl CapturedOutput {
    fn new(pipe: ChildStdout) -> Self {
        Self {
            pipe,
            buffer: Vec::new(),
        }
    }

    /// Append whatever is buffered in the pipe without blocking. Returns
    /// the number of bytes read.
    pub fn drain(&mut self) -> usize {
        let before = self.buffer.len();
        let mut buf = [0u8; 4096];
        loop {
            match self.pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => self.buffer.extend_from_slice(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    warn!("reading command output: {}", e);
                    break;
                }
            }
        }
        self.buffer.len() - before
    }

    /// Everything read so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Do a last read and return the whole output.
    pub fn finish(mut self) -> String {
        self.drain();
        String::from_utf8_lossy(&self.buffer).into_owned()
    }
}
