//! Keeping taskbars in step with the window manager, and carrying out
//! task button actions.

use std::collections::HashMap;
use std::rc::Rc;

use lintel_area::widgets::{Task, TaskState, TaskStyle};
use lintel_area::{Area, AreaId, AreaTree, Padding, Renderer, SizeMode, TaskAction, Widget};
use lintel_kernel::{ClientInfo, WindowAction, WindowId, WindowSystem};
use tracing::{debug, trace};

use crate::config::TaskbarMode;

pub fn task_state(client: &ClientInfo) -> TaskState {
    if client.urgent {
        TaskState::Urgent
    } else if client.active {
        TaskState::Active
    } else if client.iconified {
        TaskState::Iconified
    } else {
        TaskState::Normal
    }
}

/// What the window manager currently reports.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub clients: Vec<ClientInfo>,
    pub current_desktop: usize,
    pub desktop_names: Vec<String>,
}

impl Snapshot {
    pub fn read<W: WindowSystem + ?Sized>(ws: &W) -> Self {
        let count = ws.desktop_count().max(1);
        let mut desktop_names = ws.desktop_names();
        desktop_names.resize_with(count, String::new);
        for (i, name) in desktop_names.iter_mut().enumerate() {
            if name.is_empty() {
                *name = (i + 1).to_string();
            }
        }
        Self {
            clients: ws.client_list(),
            current_desktop: ws.current_desktop(),
            desktop_names,
        }
    }

    pub fn client(&self, window: WindowId) -> Option<&ClientInfo> {
        self.clients.iter().find(|c| c.window == window)
    }
}

/// How new task areas are made.
pub struct TaskFactory {
    pub style: Rc<TaskStyle>,
    pub padding: Padding,
    pub mouse_effects: bool,
    pub mode: TaskbarMode,
}

impl TaskFactory {
    fn create(&self, tree: &mut AreaTree, client: &ClientInfo) -> AreaId {
        let mut task = Task::new(client.window, client.title.clone(), Rc::clone(&self.style));
        task.desktop = client.desktop;
        let mut area = Area::new(format!("task {:#x}", client.window), SizeMode::ByLayout)
            .with_padding(self.padding)
            .with_mouse_effects(self.mouse_effects);
        task.set_state(&mut area, task_state(client));
        tree.insert(area, Widget::Task(task))
    }

    /// Bring the tasks of every taskbar in line with `snapshot`. Returns
    /// true if anything changed.
    pub fn sync(
        &self,
        tree: &mut AreaTree,
        taskbars: &[AreaId],
        snapshot: &Snapshot,
        renderer: &mut dyn Renderer,
    ) -> bool {
        let mut changed = false;
        for &taskbar in taskbars {
            changed |= self.sync_taskbar(tree, taskbar, snapshot, renderer);
        }
        changed
    }

    fn sync_taskbar(
        &self,
        tree: &mut AreaTree,
        taskbar: AreaId,
        snapshot: &Snapshot,
        renderer: &mut dyn Renderer,
    ) -> bool {
        let Some(node) = tree.node_mut(taskbar) else {
            return false;
        };
        let Widget::Taskbar(bar) = &mut node.widget else {
            return false;
        };
        let desktop = bar.desktop;
        let current = desktop == snapshot.current_desktop;
        let mut changed = bar.set_active(&mut node.area, current);
        if self.mode == TaskbarMode::SingleDesktop {
            tree.set_on_screen(taskbar, current);
        }

        let mut existing: HashMap<WindowId, AreaId> = HashMap::new();
        let mut name_area = None;
        for child in tree.children(taskbar) {
            match tree.widget(child) {
                Some(Widget::Task(task)) => {
                    existing.insert(task.window, child);
                }
                Some(Widget::TaskbarName(_)) => name_area = Some(child),
                _ => {}
            }
        }

        if let (Some(id), Some(name)) = (name_area, snapshot.desktop_names.get(desktop)) {
            let renamed = tree.node_mut(id).is_some_and(|n| match &mut n.widget {
                Widget::TaskbarName(label) => label.set_name(&mut n.area, name),
                _ => false,
            });
            if renamed {
                tree.request_resize(id);
                changed = true;
            }
        }

        let wanted: Vec<&ClientInfo> = snapshot
            .clients
            .iter()
            .filter(|c| !c.skip_taskbar)
            .filter(|c| c.desktop.is_none_or(|d| d == desktop))
            .collect();

        for (&window, &id) in &existing {
            if !wanted.iter().any(|c| c.window == window) {
                trace!("task {:#x} removed from desktop {}", window, desktop);
                tree.destroy(id, renderer);
                changed = true;
            }
        }

        for client in wanted {
            match existing.get(&client.window) {
                Some(&id) => {
                    let Some(node) = tree.node_mut(id) else {
                        continue;
                    };
                    let Widget::Task(task) = &mut node.widget else {
                        continue;
                    };
                    task.desktop = client.desktop;
                    let mut dirty = task.set_title(&mut node.area, &client.title);
                    dirty |= task.set_state(&mut node.area, task_state(client));
                    if dirty {
                        tree.set_redraw(id);
                        changed = true;
                    }
                }
                None => {
                    trace!("task {:#x} added to desktop {}", client.window, desktop);
                    let id = self.create(tree, client);
                    tree.add_child(taskbar, id);
                    changed = true;
                }
            }
        }
        if changed {
            tree.request_resize(taskbar);
            tree.set_redraw(taskbar);
        }
        changed
    }
}

/// The task area's neighbour in its taskbar, wrapping around.
fn neighbour(tree: &AreaTree, task: AreaId, forward: bool) -> Option<WindowId> {
    let taskbar = tree.parent(task)?;
    let tasks: Vec<(AreaId, WindowId)> = tree
        .children(taskbar)
        .into_iter()
        .filter_map(|id| tree.widget(id)?.as_task().map(|t| (id, t.window)))
        .collect();
    let pos = tasks.iter().position(|(id, _)| *id == task)?;
    let len = tasks.len();
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    Some(tasks[next].1)
}

/// Translate a task button action into window manager requests.
pub fn perform<W: WindowSystem + ?Sized>(
    ws: &mut W,
    tree: &AreaTree,
    task: AreaId,
    window: WindowId,
    action: TaskAction,
    snapshot: &Snapshot,
) {
    let client = snapshot.client(window);
    let active = client.is_some_and(|c| c.active);
    let iconified = client.is_some_and(|c| c.iconified);
    debug!("task action on {:#x}: {:?}", window, action);

    let request = match action {
        TaskAction::None => None,
        TaskAction::Close => Some(WindowAction::Close),
        TaskAction::Toggle => Some(if active && !iconified {
            WindowAction::Iconify
        } else {
            WindowAction::Activate
        }),
        TaskAction::Iconify => Some(WindowAction::Iconify),
        TaskAction::ToggleIconify => Some(if iconified {
            WindowAction::Activate
        } else {
            WindowAction::Iconify
        }),
        TaskAction::Shade | TaskAction::ToggleShade => Some(WindowAction::ToggleShade),
        TaskAction::MaximizeRestore => Some(WindowAction::ToggleMaximize),
        TaskAction::DesktopLeft => {
            let desktop = client.and_then(|c| c.desktop).unwrap_or(snapshot.current_desktop);
            (desktop > 0).then(|| WindowAction::MoveToDesktop(desktop - 1))
        }
        TaskAction::DesktopRight => {
            let desktop = client.and_then(|c| c.desktop).unwrap_or(snapshot.current_desktop);
            (desktop + 1 < snapshot.desktop_names.len())
                .then(|| WindowAction::MoveToDesktop(desktop + 1))
        }
        TaskAction::NextTask | TaskAction::PrevTask => {
            if let Some(other) = neighbour(tree, task, action == TaskAction::NextTask) {
                ws.window_action(other, WindowAction::Activate);
            }
            None
        }
    };
    if let Some(request) = request {
        ws.window_action(window, request);
    }
}
