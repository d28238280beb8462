//! Signal handling through flags polled by the event loop.
//!
//! The handler only stores into atomics and writes one byte to the wake
//! pipe. Everything else happens on the loop thread.

use std::os::fd::RawFd;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use tracing::debug;

use crate::error::LoopError;

/// Signals the loop reacts to.
pub const HANDLED_SIGNALS: [Signal; 6] = [
    Signal::SIGUSR1,
    Signal::SIGUSR2,
    Signal::SIGINT,
    Signal::SIGTERM,
    Signal::SIGHUP,
    Signal::SIGCHLD,
];

#[derive(Debug)]
pub struct SignalFlags {
    pending: AtomicI32,
    child_exited: AtomicBool,
    wake_fd: AtomicI32,
}

impl Default for SignalFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalFlags {
    pub const fn new() -> Self {
        Self {
            pending: AtomicI32::new(0),
            child_exited: AtomicBool::new(false),
            wake_fd: AtomicI32::new(-1),
        }
    }

    /// Record `signal`. Async-signal-safe.
    pub fn raise(&self, signal: i32) {
        if signal == libc::SIGCHLD {
            self.child_exited.store(true, Ordering::SeqCst);
        } else {
            self.pending.store(signal, Ordering::SeqCst);
        }
        let fd = self.wake_fd.load(Ordering::SeqCst);
        if fd >= 0 {
            let byte = 1u8;
            // SAFETY: write(2) is async-signal-safe; a full or closed pipe
            // only loses a redundant wakeup.
            unsafe {
                libc::write(fd, (&byte as *const u8).cast(), 1);
            }
        }
    }

    /// Take the last recorded signal, if any.
    pub fn take_signal(&self) -> Option<i32> {
        match self.pending.swap(0, Ordering::SeqCst) {
            0 => None,
            signal => Some(signal),
        }
    }

    pub fn take_child_exited(&self) -> bool {
        self.child_exited.swap(false, Ordering::SeqCst)
    }

    pub fn set_wake_fd(&self, fd: RawFd) {
        self.wake_fd.store(fd, Ordering::SeqCst);
    }

    pub fn clear_wake_fd(&self) {
        self.wake_fd.store(-1, Ordering::SeqCst);
    }
}

/// Process-wide flags the installed handler writes to.
pub static SIGNALS: SignalFlags = SignalFlags::new();

extern "C" fn on_signal(signal: libc::c_int) {
    SIGNALS.raise(signal);
}

/// Route every signal in [`HANDLED_SIGNALS`] to [`SIGNALS`].
pub fn install_handlers() -> Result<(), LoopError> {
    let action = SigAction::new(
        SigHandler::Handler(on_signal),
        SaFlags::SA_RESTART | SaFlags::SA_NOCLDSTOP,
        SigSet::empty(),
    );
    for signal in HANDLED_SIGNALS {
        // SAFETY: the handler only touches atomics and calls write(2).
        unsafe { sigaction(signal, &action) }?;
    }
    debug!("signal handlers installed");
    Ok(())
}

/// True for the signals that end the loop in a reload or restart rather
/// than a plain exit.
pub fn is_reload_or_restart(signal: i32) -> bool {
    signal == libc::SIGUSR1 || signal == libc::SIGUSR2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_signal_consumes() {
        let flags = SignalFlags::new();
        assert_eq!(flags.take_signal(), None);
        flags.raise(libc::SIGUSR1);
        assert_eq!(flags.take_signal(), Some(libc::SIGUSR1));
        assert_eq!(flags.take_signal(), None);
    }

    #[test]
    fn test_sigchld_sets_child_flag_only() {
        let flags = SignalFlags::new();
        flags.raise(libc::SIGCHLD);
        assert_eq!(flags.take_signal(), None);
        assert!(flags.take_child_exited());
        assert!(!flags.take_child_exited());
    }

    #[test]
    fn test_reload_classification() {
        assert!(is_reload_or_restart(libc::SIGUSR1));
        assert!(is_reload_or_restart(libc::SIGUSR2));
        assert!(!is_reload_or_restart(libc::SIGTERM));
    }
}
