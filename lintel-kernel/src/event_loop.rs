//! Single-threaded event loop.
//!
//! Each iteration redraws if the host asks for it, waits on the display
//! and wake descriptors until the next timer deadline, then handles
//! signals, reaps children, dispatches queued events, redraws again and
//! fires expired timers.

use std::collections::HashMap;
use std::os::fd::AsFd;
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use tracing::{debug, info, trace};

use crate::display::Display;
use crate::error::LoopError;
use crate::event::{Event, EventKind};
use crate::reaper::{reap_children, ChildExit};
use crate::scheduler::Scheduler;
use crate::signals::{is_reload_or_restart, SignalFlags};
use crate::wake::WakePipe;

/// Hooks the loop calls on the state it drives.
pub trait LoopHost<D: Display>: Sized {
    /// Look at an event before its registered handler. Returning true
    /// consumes it.
    fn intercept(&mut self, _display: &mut D, _scheduler: &mut Scheduler<Self>, _event: &Event) -> bool {
        false
    }

    fn needs_redraw(&self) -> bool {
        false
    }

    fn redraw(&mut self, _display: &mut D) {}

    /// Called for reaped children nobody registered a callback for.
    fn child_exited(&mut self, _scheduler: &mut Scheduler<Self>, _exit: &ChildExit) {}
}

pub type Handler<S, D> = Box<dyn FnMut(&mut S, &mut D, &mut Scheduler<S>, &Event)>;

pub struct EventLoop<S, D: Display> {
    display: D,
    scheduler: Scheduler<S>,
    handlers: HashMap<EventKind, Handler<S, D>>,
    wake: WakePipe,
    signals: &'static SignalFlags,
    last_signal: Option<i32>,
}

impl<S: LoopHost<D>, D: Display> EventLoop<S, D> {
    pub fn new(display: D, scheduler: Scheduler<S>, signals: &'static SignalFlags) -> Result<Self, LoopError> {
        let wake = WakePipe::new()?;
        signals.set_wake_fd(wake.write_fd());
        Ok(Self {
            display,
            scheduler,
            handlers: HashMap::new(),
            wake,
            signals,
            last_signal: None,
        })
    }

    /// Set the handler for one kind of event. A later registration for
    /// the same kind replaces the earlier one.
    pub fn register_handler<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&mut S, &mut D, &mut Scheduler<S>, &Event) + 'static,
    {
        if self.handlers.insert(kind, Box::new(handler)).is_some() {
            debug!("replaced handler for {:?}", kind);
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn scheduler(&self) -> &Scheduler<S> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler<S> {
        &mut self.scheduler
    }

    /// Force the current or next wait to return.
    pub fn wake(&self) {
        self.wake.wake();
    }

    /// The signal that ended the last run, if one did.
    pub fn last_signal(&self) -> Option<i32> {
        self.last_signal
    }

    /// Run until a signal ends the loop. Returns true for reload and
    /// restart signals, false for the fatal ones.
    pub fn run(&mut self, state: &mut S) -> Result<bool, LoopError> {
        info!("event loop started");
        loop {
            if let Some(reload) = self.run_once(state)? {
                return Ok(reload);
            }
        }
    }

    /// One iteration. `Some(reload)` means a signal asked the loop to end.
    pub fn run_once(&mut self, state: &mut S) -> Result<Option<bool>, LoopError> {
        if let Some(reload) = self.check_signal() {
            return Ok(Some(reload));
        }
        if state.needs_redraw() {
            state.redraw(&mut self.display);
        }
        self.display.flush()?;

        if !self.display.pending() {
            self.wait()?;
        }
        self.wake.drain();

        if let Some(reload) = self.check_signal() {
            return Ok(Some(reload));
        }
        if self.signals.take_child_exited() {
            for exit in reap_children() {
                if !self.scheduler.complete_child(state, &exit) {
                    state.child_exited(&mut self.scheduler, &exit);
                }
            }
        }

        self.display.read_events()?;
        while let Some(event) = self.display.next_event() {
            self.dispatch(state, &event);
        }

        if state.needs_redraw() {
            state.redraw(&mut self.display);
        }
        self.scheduler.process_expired(state);
        Ok(None)
    }

    fn dispatch(&mut self, state: &mut S, event: &Event) {
        if state.intercept(&mut self.display, &mut self.scheduler, event) {
            trace!("event {:?} intercepted", event.kind());
            return;
        }
        match self.handlers.get_mut(&event.kind()) {
            Some(handler) => handler(state, &mut self.display, &mut self.scheduler, event),
            None => trace!("no handler for {:?}", event.kind()),
        }
    }

    fn check_signal(&mut self) -> Option<bool> {
        let signal = self.signals.take_signal()?;
        self.last_signal = Some(signal);
        let reload = is_reload_or_restart(signal);
        info!("received signal {}, reload: {}", signal, reload);
        Some(reload)
    }

    fn wait(&self) -> Result<(), LoopError> {
        let timeout = match self.scheduler.time_until_next() {
            None => PollTimeout::NONE,
            Some(left) => PollTimeout::from(millis_rounded_up(left)),
        };
        let mut fds = [
            PollFd::new(self.display.as_fd(), PollFlags::POLLIN),
            PollFd::new(self.wake.as_fd(), PollFlags::POLLIN),
        ];
        match poll(&mut fds, timeout) {
            Ok(_) | Err(Errno::EINTR) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl<S, D: Display> Drop for EventLoop<S, D> {
    fn drop(&mut self) {
        self.signals.clear_wake_fd();
    }
}

fn millis_rounded_up(d: Duration) -> u16 {
    let millis = d.as_micros().div_ceil(1000);
    u16::try_from(millis).unwrap_or(u16::MAX)
}
