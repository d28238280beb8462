//! Non-blocking collection of exited children.

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::{debug, warn};

/// How a reaped child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildExit {
    pub pid: i32,
    /// Exit code when the child exited normally.
    pub code: Option<i32>,
    /// Signal number when the child was killed.
    pub signal: Option<i32>,
}

impl ChildExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Reap every child that has already exited. Never blocks.
pub fn reap_children() -> Vec<ChildExit> {
    let mut exits = Vec::new();
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(pid, code)) => {
                debug!("child {} exited with code {}", pid, code);
                exits.push(ChildExit {
                    pid: pid.as_raw(),
                    code: Some(code),
                    signal: None,
                });
            }
            Ok(WaitStatus::Signaled(pid, signal, _)) => {
                debug!("child {} killed by {:?}", pid, signal);
                exits.push(ChildExit {
                    pid: pid.as_raw(),
                    code: None,
                    signal: Some(signal as i32),
                });
            }
            Ok(WaitStatus::StillAlive) => break,
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => break,
            Err(e) => {
                warn!("waitpid failed: {}", e);
                break;
            }
        }
    }
    exits
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use std::time::{Duration, Instant};

    fn reap_until(pid: i32) -> Option<ChildExit> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(exit) = reap_children().into_iter().find(|e| e.pid == pid) {
                return Some(exit);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn test_reaps_exit_code() {
        let child = Command::new("sh").args(["-c", "exit 3"]).spawn().unwrap();
        let exit = reap_until(child.id() as i32).unwrap();
        assert_eq!(exit.code, Some(3));
        assert!(!exit.success());
    }
}
