//! Event loop behavior against the headless display.

use std::process::Command;
use std::time::{Duration, Instant};

use lintel_kernel::{
    ChildExit, Event, EventKind, EventLoop, HeadlessDisplay, LoopHost, ManualClock, PointerEvent,
    Scheduler, SignalFlags,
};

#[derive(Default)]
struct Host {
    log: Vec<String>,
    dirty: bool,
    redraws: usize,
    swallow_enter: bool,
    orphan_exits: Vec<ChildExit>,
}

impl LoopHost<HeadlessDisplay> for Host {
    fn intercept(
        &mut self,
        _display: &mut HeadlessDisplay,
        _scheduler: &mut Scheduler<Self>,
        event: &Event,
    ) -> bool {
        if self.swallow_enter && event.kind() == EventKind::Enter {
            self.log.push("intercepted".into());
            return true;
        }
        false
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
    }

    fn redraw(&mut self, _display: &mut HeadlessDisplay) {
        self.redraws += 1;
        self.dirty = false;
    }

    fn child_exited(&mut self, _scheduler: &mut Scheduler<Self>, exit: &ChildExit) {
        self.orphan_exits.push(*exit);
    }
}

fn flags() -> &'static SignalFlags {
    Box::leak(Box::new(SignalFlags::new()))
}

fn new_loop(clock: &ManualClock) -> (EventLoop<Host, HeadlessDisplay>, &'static SignalFlags) {
    let flags = flags();
    let display = HeadlessDisplay::new().unwrap();
    let event_loop = EventLoop::new(display, Scheduler::new(clock.clone()), flags).unwrap();
    (event_loop, flags)
}

#[test]
fn test_events_reach_registered_handler() {
    let clock = ManualClock::new();
    let (mut ev, _) = new_loop(&clock);
    let mut host = Host::default();

    ev.register_handler(EventKind::ButtonPress, |host: &mut Host, _, _, event| {
        if let Event::ButtonPress(p) = event {
            host.log.push(format!("press {} {}", p.x, p.y));
        }
    });
    ev.display_mut()
        .push_event(Event::ButtonPress(PointerEvent::new(1, 10, 5, 1)));
    ev.display_mut().push_event(Event::Expose { window: 1 });

    assert_eq!(ev.run_once(&mut host).unwrap(), None);
    assert_eq!(host.log, vec!["press 10 5"]);
}

#[test]
fn test_last_registration_wins() {
    let clock = ManualClock::new();
    let (mut ev, _) = new_loop(&clock);
    let mut host = Host::default();

    ev.register_handler(EventKind::Leave, |host: &mut Host, _, _, _| {
        host.log.push("first".into())
    });
    ev.register_handler(EventKind::Leave, |host: &mut Host, _, _, _| {
        host.log.push("second".into())
    });
    ev.display_mut().push_event(Event::Leave { window: 1 });
    ev.run_once(&mut host).unwrap();
    assert_eq!(host.log, vec!["second"]);
}

#[test]
fn test_intercept_consumes_event() {
    let clock = ManualClock::new();
    let (mut ev, _) = new_loop(&clock);
    let mut host = Host {
        swallow_enter: true,
        ..Default::default()
    };
    ev.register_handler(EventKind::Enter, |host: &mut Host, _, _, _| {
        host.log.push("handler".into())
    });
    ev.display_mut().push_event(Event::Enter { window: 1 });
    ev.run_once(&mut host).unwrap();
    assert_eq!(host.log, vec!["intercepted"]);
}

#[test]
fn test_expired_timers_fire_after_events() {
    let clock = ManualClock::new();
    let (mut ev, _) = new_loop(&clock);
    let mut host = Host::default();

    ev.register_handler(EventKind::Expose, |host: &mut Host, _, _, _| {
        host.log.push("expose".into())
    });
    ev.scheduler_mut()
        .set_timeout(Duration::from_millis(50), |host: &mut Host, _| {
            host.log.push("timeout".into())
        });
    clock.advance(Duration::from_millis(50));
    ev.display_mut().push_event(Event::Expose { window: 1 });

    ev.run_once(&mut host).unwrap();
    assert_eq!(host.log, vec!["expose", "timeout"]);
    assert_eq!(ev.scheduler().timeout_count(), 0);
}

#[test]
fn test_redraw_only_when_requested() {
    let clock = ManualClock::new();
    let (mut ev, _) = new_loop(&clock);
    let mut host = Host {
        dirty: true,
        ..Default::default()
    };

    ev.register_handler(EventKind::Expose, |host: &mut Host, _, _, _| host.dirty = true);
    ev.display_mut().push_event(Event::Expose { window: 1 });
    ev.run_once(&mut host).unwrap();
    // Once before waiting, once after the handler dirtied the host.
    assert_eq!(host.redraws, 2);

    ev.display_mut().push_event(Event::Leave { window: 1 });
    ev.run_once(&mut host).unwrap();
    assert_eq!(host.redraws, 2);
}

#[test]
fn test_reload_signal_ends_run() {
    let clock = ManualClock::new();
    let (mut ev, flags) = new_loop(&clock);
    let mut host = Host::default();

    flags.raise(libc::SIGUSR1);
    assert!(ev.run(&mut host).unwrap());
    assert_eq!(ev.last_signal(), Some(libc::SIGUSR1));
}

#[test]
fn test_fatal_signal_ends_run_without_reload() {
    let clock = ManualClock::new();
    let (mut ev, flags) = new_loop(&clock);
    let mut host = Host::default();

    ev.scheduler_mut().set_timeout(Duration::ZERO, move |_: &mut Host, _| {
        flags.raise(libc::SIGTERM)
    });
    assert!(!ev.run(&mut host).unwrap());
    assert_eq!(ev.last_signal(), Some(libc::SIGTERM));
}

#[test]
fn test_child_callback_runs_on_reap() {
    let clock = ManualClock::new();
    let (mut ev, flags) = new_loop(&clock);
    let mut host = Host::default();

    let child = Command::new("sh").args(["-c", "exit 4"]).spawn().unwrap();
    let pid = child.id() as i32;
    ev.scheduler_mut()
        .watch_child(pid, |host: &mut Host, _, exit: &ChildExit| {
            host.log.push(format!("exit {:?}", exit.code));
        });

    let deadline = Instant::now() + Duration::from_secs(5);
    while host.log.is_empty() && Instant::now() < deadline {
        flags.raise(libc::SIGCHLD);
        ev.run_once(&mut host).unwrap();
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(host.log, vec!["exit Some(4)"]);
    assert!(!ev.scheduler().is_watching(pid));
    assert!(host.orphan_exits.iter().all(|e| e.pid != pid));
}

#[test]
fn test_queued_events_skip_the_wait() {
    let clock = ManualClock::new();
    let (mut ev, _) = new_loop(&clock);
    let mut host = Host::default();

    // Neither the wake pipe nor the display descriptor is readable; only
    // the already-queued event keeps the loop from waiting.
    ev.scheduler_mut()
        .set_timeout(Duration::from_secs(10), |_: &mut Host, _| {});
    ev.register_handler(EventKind::Leave, |host: &mut Host, _, _, _| {
        host.log.push("leave".into())
    });
    ev.display_mut().push_buffered_event(Event::Leave { window: 1 });

    let start = Instant::now();
    assert_eq!(ev.run_once(&mut host).unwrap(), None);
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(host.log, vec!["leave"]);
}

#[test]
fn test_wakes_interrupt_the_wait_and_coalesce() {
    let clock = ManualClock::new();
    let (mut ev, _) = new_loop(&clock);
    let mut host = Host::default();
    ev.scheduler_mut()
        .set_timeout(Duration::from_secs(1), |_: &mut Host, _| {});

    ev.wake();
    ev.wake();
    ev.wake();
    let start = Instant::now();
    ev.run_once(&mut host).unwrap();
    assert!(start.elapsed() < Duration::from_millis(500));

    // All three wakes were consumed by the first iteration.
    let start = Instant::now();
    ev.run_once(&mut host).unwrap();
    assert!(start.elapsed() >= Duration::from_millis(500));
}
