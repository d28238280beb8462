//! Layout, drawing, hit-testing and mouse-state tests over whole trees.

use std::rc::Rc;

use chrono::{TimeZone, Utc};
use lintel_area::widgets::{
    ButtonCommands, Clock, Container, Execp, Launcher, LauncherIcon, Panel, Task, TaskStyle,
    Taskbar,
};
use lintel_area::{
    Alignment, Area, AreaId, AreaTree, ClickAction, ClickEvent, Color, FontSpec, HeadlessRenderer,
    MouseButton, MouseState, Orientation, Padding, PanelItems, Rect, Renderer, SizeMode, Theme,
    Widget,
};

// ============================================================================
// Helpers
// ============================================================================

fn panel(tree: &mut AreaTree, width: i32, height: i32) -> AreaId {
    tree.insert(
        Area::new("panel", SizeMode::ByLayout)
            .with_rect(Rect::new(0, 0, width, height))
            .with_padding(Padding::new(2, 1, 4)),
        Widget::Panel(Panel::new(Orientation::Horizontal, 0)),
    )
}

fn container(tree: &mut AreaTree, name: &str, rect: Rect) -> AreaId {
    tree.insert(
        Area::new(name, SizeMode::ByContent).with_rect(rect),
        Widget::Container(Container),
    )
}

fn clock_at(tree: &mut AreaTree, hour: u32, minute: u32) -> AreaId {
    let id = tree.insert(
        Area::new("clock", SizeMode::ByContent),
        Widget::Clock(Clock::new("%H:%M", FontSpec::new("sans 10"))),
    );
    let now = Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap();
    let node = tree.node_mut(id).unwrap();
    if let Widget::Clock(clock) = &mut node.widget {
        clock.update(&mut node.area, &now);
    }
    id
}

fn taskbar(tree: &mut AreaTree, desktop: usize) -> AreaId {
    tree.insert(
        Area::new(format!("taskbar {desktop}"), SizeMode::ByLayout),
        Widget::Taskbar(Taskbar::new(desktop)),
    )
}

fn rect_of(tree: &AreaTree, id: AreaId) -> Rect {
    tree.get(id).unwrap().rect()
}

fn click(x: i32, y: i32, button: MouseButton) -> ClickEvent {
    ClickEvent { x, y, button }
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_layout_shares_space_between_taskbars() {
    let mut tree = AreaTree::new();
    let theme = Theme::new();
    let r = HeadlessRenderer::new();

    let p = panel(&mut tree, 301, 30);
    let tb1 = taskbar(&mut tree, 0);
    let tb2 = taskbar(&mut tree, 1);
    let clock = clock_at(&mut tree, 12, 5);
    let items = PanelItems {
        taskbars: vec![tb1, tb2],
        clock: Some(clock),
        ..Default::default()
    };
    tree.set_items_order(p, "TC", &items);
    tree.relayout(p, &r, &theme);

    // "12:05" is 5 chars at 6px in the headless renderer
    assert_eq!(rect_of(&tree, clock), Rect::new(269, 1, 30, 28));
    // 301 - 2*2 padding - 30 clock - 2*4 spacing = 259, split 130 + 129
    assert_eq!(rect_of(&tree, tb1), Rect::new(2, 1, 130, 28));
    assert_eq!(rect_of(&tree, tb2), Rect::new(136, 1, 129, 28));
}

#[test]
fn test_content_change_reflows_siblings() {
    let mut tree = AreaTree::new();
    let theme = Theme::new();
    let r = HeadlessRenderer::new();

    let p = panel(&mut tree, 300, 30);
    let tb = taskbar(&mut tree, 0);
    let clock = tree.insert(
        Area::new("clock", SizeMode::ByContent),
        Widget::Clock(Clock::new("%H:%M:%S", FontSpec::new("sans 10"))),
    );
    let items = PanelItems {
        taskbars: vec![tb],
        clock: Some(clock),
        ..Default::default()
    };
    tree.set_items_order(p, "TC", &items);

    let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    {
        let node = tree.node_mut(clock).unwrap();
        if let Widget::Clock(c) = &mut node.widget {
            c.update(&mut node.area, &now);
        }
    }
    tree.relayout(p, &r, &theme);
    assert_eq!(rect_of(&tree, clock).width, 48);
    assert_eq!(rect_of(&tree, tb).width, 300 - 4 - 48 - 4);

    {
        let node = tree.node_mut(clock).unwrap();
        if let Widget::Clock(c) = &mut node.widget {
            c.time1_format = "%H".into();
            c.update(&mut node.area, &now);
        }
    }
    tree.relayout(p, &r, &theme);
    assert_eq!(rect_of(&tree, clock).width, 12);
    assert_eq!(rect_of(&tree, tb).width, 300 - 4 - 12 - 4);
    assert_eq!(rect_of(&tree, clock).x, 2 + 280 + 4);
}

#[test]
fn test_task_share_is_capped() {
    let mut tree = AreaTree::new();
    let theme = Theme::new();
    let r = HeadlessRenderer::new();

    let p = panel(&mut tree, 400, 30);
    let tb = tree.insert(
        Area::new("taskbar", SizeMode::ByLayout),
        Widget::Taskbar(Taskbar {
            max_task_extent: 100,
            ..Taskbar::new(0)
        }),
    );
    let style = Rc::new(TaskStyle::default());
    let tasks: Vec<AreaId> = (0..2)
        .map(|i| {
            let id = tree.insert(
                Area::new(format!("task {i}"), SizeMode::ByLayout),
                Widget::Task(Task::new(i, "term", style.clone())),
            );
            tree.add_child(tb, id);
            id
        })
        .collect();
    let items = PanelItems {
        taskbars: vec![tb],
        ..Default::default()
    };
    tree.set_items_order(p, "T", &items);
    tree.relayout(p, &r, &theme);

    assert_eq!(rect_of(&tree, tb).width, 396);
    assert_eq!(rect_of(&tree, tasks[0]).width, 100);
    assert_eq!(rect_of(&tree, tasks[1]).width, 100);
    assert_eq!(rect_of(&tree, tasks[0]).x, 2);
    assert_eq!(rect_of(&tree, tasks[1]).x, 2 + 100);
}

#[test]
fn test_alignment_right_and_center() {
    let mut tree = AreaTree::new();
    let theme = Theme::new();
    let r = HeadlessRenderer::new();

    for (alignment, expected_x) in [(Alignment::Right, 300 - 2 - 30), (Alignment::Center, 135)] {
        let p = tree.insert(
            Area::new("panel", SizeMode::ByLayout)
                .with_rect(Rect::new(0, 0, 300, 30))
                .with_padding(Padding::new(2, 1, 4))
                .with_alignment(alignment),
            Widget::Panel(Panel::new(Orientation::Horizontal, 0)),
        );
        let clock = clock_at(&mut tree, 1, 2);
        tree.set_items_order(
            p,
            "C",
            &PanelItems {
                clock: Some(clock),
                ..Default::default()
            },
        );
        tree.relayout(p, &r, &theme);
        assert_eq!(rect_of(&tree, clock).x, expected_x, "{alignment:?}");
    }
}

#[test]
fn test_vertical_panel_lays_out_along_y() {
    let mut tree = AreaTree::new();
    let theme = Theme::new();
    let r = HeadlessRenderer::new();

    let p = tree.insert(
        Area::new("panel", SizeMode::ByLayout).with_rect(Rect::new(0, 0, 40, 200)),
        Widget::Panel(Panel::new(Orientation::Vertical, 0)),
    );
    let clock = clock_at(&mut tree, 10, 30);
    let tb = taskbar(&mut tree, 0);
    tree.set_items_order(
        p,
        "CT",
        &PanelItems {
            clock: Some(clock),
            taskbars: vec![tb],
            ..Default::default()
        },
    );
    tree.relayout(p, &r, &theme);

    assert_eq!(rect_of(&tree, clock), Rect::new(0, 0, 40, 14));
    assert_eq!(rect_of(&tree, tb), Rect::new(0, 14, 40, 186));
}

#[test]
fn test_launcher_grid_wraps() {
    let mut tree = AreaTree::new();
    let theme = Theme::new();
    let r = HeadlessRenderer::new();

    let p = panel(&mut tree, 300, 30);
    let launcher = tree.insert(
        Area::new("launcher", SizeMode::ByContent),
        Widget::Launcher(Launcher::new(10, 2)),
    );
    let icons: Vec<AreaId> = (0..3)
        .map(|i| {
            let id = tree.insert(
                Area::new(format!("icon {i}"), SizeMode::ByContent),
                Widget::LauncherIcon(LauncherIcon::new(format!("app{i}"), "true")),
            );
            tree.add_child(launcher, id);
            id
        })
        .collect();
    tree.set_items_order(
        p,
        "L",
        &PanelItems {
            launcher: Some(launcher),
            ..Default::default()
        },
    );
    tree.relayout(p, &r, &theme);

    // 28px of cross space fits two 10px icons with 2px spacing per column
    assert_eq!(rect_of(&tree, launcher), Rect::new(2, 1, 22, 28));
    assert_eq!(rect_of(&tree, icons[0]), Rect::new(2, 4, 10, 10));
    assert_eq!(rect_of(&tree, icons[1]), Rect::new(2, 16, 10, 10));
    assert_eq!(rect_of(&tree, icons[2]), Rect::new(14, 4, 10, 10));
}

// ============================================================================
// Item ordering
// ============================================================================

#[test]
fn test_items_order_truncates_exhausted_pools() {
    let mut tree = AreaTree::new();
    let p = panel(&mut tree, 300, 30);
    let execps: Vec<AreaId> = (0..3)
        .map(|i| {
            tree.insert(
                Area::new(format!("execp {i}"), SizeMode::ByContent),
                Widget::Execp(Execp::new("date", 1, FontSpec::default())),
            )
        })
        .collect();
    let items = PanelItems {
        execps: execps.clone(),
        ..Default::default()
    };

    tree.set_items_order(p, "EEEE", &items);
    assert_eq!(tree.children(p), execps);
}

#[test]
fn test_items_order_skips_unknown_and_missing() {
    let mut tree = AreaTree::new();
    let p = panel(&mut tree, 300, 30);
    let clock = container(&mut tree, "clock", Rect::ZERO);
    let tb = container(&mut tree, "taskbar", Rect::ZERO);
    let items = PanelItems {
        clock: Some(clock),
        taskbars: vec![tb],
        ..Default::default()
    };

    tree.set_items_order(p, "CxLST", &items);
    assert_eq!(tree.children(p), vec![clock, tb]);

    // reordering detaches and reattaches
    tree.set_items_order(p, "TC", &items);
    assert_eq!(tree.children(p), vec![tb, clock]);
    assert_eq!(tree.parent(clock), Some(p));
    assert_eq!(tree.panel_of(clock), Some(p));
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_zero_size_area_is_never_drawn() {
    let mut tree = AreaTree::new();
    let theme = Theme::new();
    let mut r = HeadlessRenderer::new();
    let empty = container(&mut tree, "empty", Rect::new(0, 0, 0, 30));

    tree.draw(empty, &mut r, &theme);
    assert_eq!(r.created_pixmaps(), 0);
    assert_eq!(r.paint_count(), 0);
    assert!(tree.get(empty).unwrap().pixmap().is_none());
    assert!(tree.get(empty).unwrap().need_redraw);
}

#[test]
fn test_collapsed_area_keeps_its_pixmap() {
    let mut theme = Theme::new();
    let bg = theme.add_background(lintel_area::Background {
        fill: Color::BLACK,
        ..Default::default()
    });

    let collapses: [fn(&mut Area); 2] = [|a| a.height = 0, |a| a.width = 0];
    for collapse in collapses {
        let mut tree = AreaTree::new();
        let mut r = HeadlessRenderer::new();
        let id = container(&mut tree, "item", Rect::new(0, 0, 10, 10));
        tree.get_mut(id).unwrap().background = bg;

        tree.draw(id, &mut r, &theme);
        let drawn = tree.get(id).unwrap().pixmap();
        assert!(drawn.is_some());
        assert!(r.paint_count() > 0);
        r.take_ops();

        collapse(tree.get_mut(id).unwrap());
        tree.get_mut(id).unwrap().need_redraw = true;
        tree.draw(id, &mut r, &theme);
        assert_eq!(tree.get(id).unwrap().pixmap(), drawn);
        assert_eq!(r.paint_count(), 0);
        assert_eq!(r.created_pixmaps(), 1);
        assert_eq!(r.freed_pixmaps(), 0);
    }
}

#[test]
fn test_hidden_area_is_never_drawn() {
    let mut tree = AreaTree::new();
    let theme = Theme::new();
    let mut r = HeadlessRenderer::new();
    let hidden = container(&mut tree, "hidden", Rect::new(0, 0, 10, 10));
    tree.get_mut(hidden).unwrap().on_screen = false;

    tree.draw(hidden, &mut r, &theme);
    assert_eq!(r.created_pixmaps(), 0);
}

#[test]
fn test_refresh_only_redraws_dirty_areas() {
    let mut tree = AreaTree::new();
    let mut theme = Theme::new();
    let bg = theme.add_background(lintel_area::Background {
        fill: Color::BLACK,
        ..Default::default()
    });
    let mut r = HeadlessRenderer::new();
    let p = panel(&mut tree, 100, 30);
    tree.get_mut(p).unwrap().background = bg;
    let child = container(&mut tree, "child", Rect::new(10, 0, 20, 30));
    tree.get_mut(child).unwrap().background = bg;
    tree.add_child(p, child);

    let surface = r.create_pixmap(100, 30);
    tree.draw_tree(p, &mut r, &theme, surface);
    assert_eq!(r.paint_count(), 2);
    let first = r.take_ops();
    assert!(first.iter().any(|op| matches!(
        op,
        lintel_area::PaintOp::Copy {
            dst_x: 10,
            dst_y: 0,
            ..
        }
    )));

    // clean: composited again but not repainted
    tree.draw_tree(p, &mut r, &theme, surface);
    assert_eq!(r.paint_count(), 0);

    tree.set_redraw(child);
    tree.draw_tree(p, &mut r, &theme, surface);
    assert_eq!(r.paint_count(), 1);
    // the old pixmap was released when the child was redrawn
    assert_eq!(r.live_pixmaps(), 3);
}

// ============================================================================
// Hit-testing and clicks
// ============================================================================

#[test]
fn test_innermost_area_under_point() {
    let mut tree = AreaTree::new();
    let p = panel(&mut tree, 300, 30);
    let a = container(&mut tree, "a", Rect::new(0, 0, 100, 30));
    let b = container(&mut tree, "b", Rect::new(100, 0, 100, 30));
    let c = container(&mut tree, "c", Rect::new(120, 5, 20, 20));
    tree.add_child(p, a);
    tree.add_child(p, b);
    tree.add_child(b, c);

    assert_eq!(tree.innermost_area_under_point(p, 50, 10), Some(a));
    assert_eq!(tree.innermost_area_under_point(p, 125, 10), Some(c));
    assert_eq!(tree.innermost_area_under_point(p, 110, 10), Some(b));
    assert_eq!(tree.innermost_area_under_point(p, 250, 10), Some(p));
    assert_eq!(tree.innermost_area_under_point(p, 300, 10), None);
    assert_eq!(tree.innermost_area_under_point(p, -1, 10), None);
}

#[test]
fn test_overlapping_siblings_last_added_wins() {
    let mut tree = AreaTree::new();
    let p = panel(&mut tree, 300, 30);
    let first = container(&mut tree, "first", Rect::new(0, 0, 100, 30));
    let second = container(&mut tree, "second", Rect::new(50, 0, 100, 30));
    tree.add_child(p, first);
    tree.add_child(p, second);

    assert_eq!(tree.innermost_area_under_point(p, 75, 10), Some(second));
    tree.get_mut(second).unwrap().on_screen = false;
    assert_eq!(tree.innermost_area_under_point(p, 75, 10), Some(first));
}

#[test]
fn test_click_walks_up_to_claiming_ancestor() {
    let mut tree = AreaTree::new();
    let theme = Theme::new();
    let r = HeadlessRenderer::new();
    let p = tree.insert(
        Area::new("panel", SizeMode::ByLayout).with_rect(Rect::new(0, 0, 300, 30)),
        Widget::Panel(Panel {
            wm_menu: true,
            ..Panel::new(Orientation::Horizontal, 0)
        }),
    );
    let mut clock = Clock::new("%H:%M", FontSpec::default());
    clock.commands = ButtonCommands {
        left: Some("zenity --calendar".into()),
        ..Default::default()
    };
    let clock_id = tree.insert(Area::new("clock", SizeMode::ByContent), Widget::Clock(clock));
    {
        let node = tree.node_mut(clock_id).unwrap();
        if let Widget::Clock(c) = &mut node.widget {
            c.update(&mut node.area, &Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        }
    }
    tree.set_items_order(
        p,
        "C",
        &PanelItems {
            clock: Some(clock_id),
            ..Default::default()
        },
    );
    tree.relayout(p, &r, &theme);

    assert_eq!(
        tree.click(p, &click(5, 10, MouseButton::Left)),
        Some((clock_id, ClickAction::Spawn("zenity --calendar".into())))
    );
    assert_eq!(
        tree.click(p, &click(5, 10, MouseButton::Right)),
        Some((p, ClickAction::ForwardToRoot))
    );
    assert_eq!(tree.click(p, &click(400, 10, MouseButton::Left)), None);
}

// ============================================================================
// Mouse state
// ============================================================================

#[test]
fn test_mouse_over_and_leave() {
    let mut tree = AreaTree::new();
    let a = container(&mut tree, "a", Rect::new(0, 0, 10, 10));
    let b = container(&mut tree, "b", Rect::new(10, 0, 10, 10));
    tree.get_mut(a).unwrap().mouse_effects = true;
    for id in [a, b] {
        tree.get_mut(id).unwrap().need_redraw = false;
    }

    tree.mouse_over(Some(a), false);
    assert_eq!(tree.get(a).unwrap().mouse_state, MouseState::Hover);
    assert!(tree.get(a).unwrap().need_redraw);
    tree.get_mut(a).unwrap().need_redraw = false;

    tree.mouse_over(Some(a), true);
    assert_eq!(tree.get(a).unwrap().mouse_state, MouseState::Pressed);
    assert!(tree.get(a).unwrap().need_redraw);
    tree.get_mut(a).unwrap().need_redraw = false;

    // moving to another area resets the first
    tree.mouse_over(Some(b), false);
    assert_eq!(tree.get(a).unwrap().mouse_state, MouseState::Normal);
    assert!(tree.get(a).unwrap().need_redraw);
    assert_eq!(tree.get(b).unwrap().mouse_state, MouseState::Hover);
    // no effects configured on b, so no redraw
    assert!(!tree.get(b).unwrap().need_redraw);

    tree.mouse_leave();
    assert_eq!(tree.get(b).unwrap().mouse_state, MouseState::Normal);
    assert_eq!(tree.hovered(), None);
    tree.mouse_leave();
    tree.mouse_over(None, false);
    assert_eq!(tree.hovered(), None);
}

// ============================================================================
// Child removal and teardown
// ============================================================================

#[test]
fn test_taskbar_releases_task_resources_on_remove() {
    let mut tree = AreaTree::new();
    let mut theme = Theme::new();
    let bg = theme.add_background(lintel_area::Background {
        fill: Color::BLACK,
        ..Default::default()
    });
    let mut r = HeadlessRenderer::new();

    let tb = taskbar(&mut tree, 0);
    let task = tree.insert(
        Area::new("task", SizeMode::ByLayout)
            .with_rect(Rect::new(0, 0, 50, 20))
            .with_background(bg),
        Widget::Task(Task::new(9, "term", Rc::new(TaskStyle::default()))),
    );
    tree.add_child(tb, task);
    tree.draw(task, &mut r, &theme);
    assert_eq!(r.live_pixmaps(), 2);

    assert!(tree.remove_child(tb, task, &mut r));
    assert_eq!(r.live_pixmaps(), 0);
    assert!(tree.children(tb).is_empty());
}

#[test]
fn test_snapshot_serializes() {
    let mut tree = AreaTree::new();
    let p = panel(&mut tree, 100, 30);
    let c = container(&mut tree, "child", Rect::new(2, 1, 10, 28));
    tree.add_child(p, c);

    let snapshot = tree.snapshot(p).unwrap();
    assert_eq!(snapshot.kind, "panel");
    assert_eq!(snapshot.children.len(), 1);
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["children"][0]["name"], "child");
    assert_eq!(json["children"][0]["rect"]["width"], 10);
}
