use crate::*;

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Rows and sections with fixed rects; sections are listed before their children.
#[derive(Clone, Debug, Default)]
struct FixedLayout {
    infos: Vec<LayoutInfo<u64>>,
}

impl FixedLayout {
    fn list(count: u64, row_height: f64) -> Self {
        let infos = (0..count)
            .map(|i| LayoutInfo::new(i, Rect::new(0.0, i as f64 * row_height, 100.0, row_height)))
            .collect();
        Self { infos }
    }

    fn push(&mut self, info: LayoutInfo<u64>) {
        self.infos.push(info);
    }
}

impl Layout for FixedLayout {
    type Key = u64;

    fn content_size(&self) -> Size {
        let height = self.infos.iter().map(|i| i.rect.max_y()).fold(0.0, f64::max);
        Size::new(100.0, height)
    }

    fn visible_layout_infos(&self, rect: Rect) -> Vec<LayoutInfo<u64>> {
        self.infos
            .iter()
            .filter(|i| i.rect.intersects(&rect))
            .cloned()
            .collect()
    }

    fn layout_info(&self, key: &u64) -> Option<LayoutInfo<u64>> {
        self.infos.iter().find(|i| i.key == *key).cloned()
    }
}

fn counter() -> (Arc<AtomicUsize>, LoadMoreCallback) {
    let calls = Arc::new(AtomicUsize::new(0));
    let cb: LoadMoreCallback = {
        let calls = Arc::clone(&calls);
        Arc::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };
    (calls, cb)
}

fn viewport(y: f64, height: f64) -> Rect {
    Rect::new(0.0, y, 100.0, height)
}

/// Three top-level rows where the middle one is a section holding two rows.
fn sectioned_infos() -> Vec<LayoutInfo<u64>> {
    vec![
        LayoutInfo::new(1, Rect::new(0.0, 0.0, 100.0, 20.0)),
        LayoutInfo::new(2, Rect::new(0.0, 20.0, 100.0, 60.0)),
        LayoutInfo::new(21, Rect::new(10.0, 40.0, 90.0, 20.0)).with_parent(2),
        LayoutInfo::new(22, Rect::new(10.0, 60.0, 90.0, 20.0)).with_parent(2),
        LayoutInfo::new(3, Rect::new(0.0, 80.0, 100.0, 20.0)),
    ]
}

#[test]
fn threshold_is_content_height_minus_two_viewports() {
    assert_eq!(load_more_threshold(1000.0, 300.0), 400.0);
    assert_eq!(load_more_threshold(1000.0, 0.0), 1000.0);

    let content = Size::new(100.0, 1000.0);
    assert!(!should_load_on_scroll(viewport(400.0, 300.0), content, false, true));
    assert!(should_load_on_scroll(viewport(400.5, 300.0), content, false, true));
    assert!(!should_load_on_scroll(viewport(401.0, 300.0), content, true, true));
    assert!(!should_load_on_scroll(viewport(401.0, 300.0), content, false, false));
}

#[test]
fn gate_fires_threshold_once_per_episode() {
    let (calls, cb) = counter();
    let gate = LoadMoreGate::new(false);
    let content = Size::new(100.0, 1000.0);

    assert!(!gate.evaluate_threshold(viewport(100.0, 300.0), content, Some(&cb)));
    assert!(!gate.evaluate_threshold(viewport(400.0, 300.0), content, Some(&cb)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert!(gate.evaluate_threshold(viewport(401.0, 300.0), content, Some(&cb)));
    assert!(gate.is_outstanding());
    for y in [450.0, 500.0, 690.0, 700.0] {
        assert!(!gate.evaluate_threshold(viewport(y, 300.0), content, Some(&cb)));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Still loading according to the caller: nothing changes.
    gate.resync(true);
    assert!(!gate.evaluate_threshold(viewport(700.0, 300.0), content, Some(&cb)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    gate.resync(false);
    assert!(gate.evaluate_threshold(viewport(700.0, 300.0), content, Some(&cb)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn zero_height_viewport_triggers_only_past_content_end() {
    let (calls, cb) = counter();
    let gate = LoadMoreGate::new(false);
    let content = Size::new(100.0, 500.0);

    assert!(!gate.evaluate_threshold(viewport(500.0, 0.0), content, Some(&cb)));
    assert!(gate.evaluate_threshold(viewport(501.0, 0.0), content, Some(&cb)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn fill_policy_ignores_repeated_content_height() {
    let (calls, cb) = counter();
    let gate = LoadMoreGate::new(false);
    let content = Size::new(100.0, 100.0);

    // Records the height without a callback.
    assert!(!gate.evaluate_fill(content, 300.0, false, None));
    assert_eq!(gate.last_content_height(), 100.0);

    assert!(!gate.evaluate_fill(content, 300.0, false, Some(&cb)));
    assert!(!gate.evaluate_fill(content, 300.0, false, Some(&cb)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert!(gate.evaluate_fill(Size::new(100.0, 150.0), 300.0, false, Some(&cb)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(gate.last_content_height(), 150.0);
}

#[test]
fn fill_policy_retries_after_a_finished_load() {
    let (calls, cb) = counter();
    let gate = LoadMoreGate::new(false);
    let content = Size::new(100.0, 100.0);

    assert!(gate.evaluate_fill(content, 300.0, false, Some(&cb)));
    // Outstanding: even a new height does not fire.
    assert!(!gate.evaluate_fill(Size::new(100.0, 120.0), 300.0, false, Some(&cb)));

    // The caller finished but no new items arrived; there is still room.
    gate.resync(false);
    assert!(gate.evaluate_fill(Size::new(100.0, 120.0), 300.0, true, Some(&cb)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn fill_policy_requires_positive_content_shorter_than_viewport() {
    let last = 0.0;
    for height in [0.0, -10.0, f64::NAN] {
        assert!(!should_fill_viewport(Size::new(100.0, height), 300.0, last, true, false, true));
    }
    assert!(!should_fill_viewport(Size::new(100.0, 301.0), 300.0, last, true, false, true));
    assert!(should_fill_viewport(Size::new(100.0, 300.0), 300.0, last, false, false, true));
    assert!(!should_fill_viewport(Size::new(100.0, 300.0), 0.0, last, true, false, true));
}

#[test]
fn missing_callback_is_a_no_op() {
    let gate = LoadMoreGate::new(false);
    for y in [0.0, 500.0, 5000.0, -20.0] {
        assert!(!gate.evaluate_threshold(viewport(y, 300.0), Size::new(0.0, 100.0), None));
        assert!(!gate.evaluate_fill(Size::new(0.0, y), 300.0, true, None));
    }
    assert!(!gate.is_outstanding());
}

#[test]
fn view_tree_nests_children_under_sections() {
    let id = VirtualizerId::from_raw(7);
    let views = build_view_tree(sectioned_infos(), id, |info| info.key * 10).unwrap();

    assert_eq!(views.len(), 3);
    assert_eq!(views.iter().map(|v| v.node_count()).sum::<usize>(), 5);
    assert!(views[1].is_group());
    assert!(!views[0].is_group());

    let keys: Vec<u64> = views[1].children.iter().map(|v| v.key).collect();
    assert_eq!(keys, vec![21, 22]);
    assert_eq!(views[1].find(&22).map(|v| v.rendered), Some(220));
    assert!(views.iter().all(|v| v.virtualizer == id));
}

#[test]
fn view_tree_rejects_non_tree_layouts() {
    let id = VirtualizerId::from_raw(1);
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);

    let dup = vec![LayoutInfo::new(1u64, r), LayoutInfo::new(1u64, r)];
    assert_eq!(
        build_view_tree(dup, id, |_| ()).unwrap_err(),
        Error::DuplicateKey { index: 1 }
    );

    let orphan = vec![LayoutInfo::new(1u64, r), LayoutInfo::new(2u64, r).with_parent(9)];
    assert_eq!(
        build_view_tree(orphan, id, |_| ()).unwrap_err(),
        Error::MissingParent { index: 1 }
    );

    let cycle = vec![
        LayoutInfo::new(1u64, r).with_parent(2),
        LayoutInfo::new(2u64, r).with_parent(1),
    ];
    assert_eq!(
        build_view_tree(cycle, id, |_| ()).unwrap_err(),
        Error::ParentCycle { index: 0 }
    );

    let self_parent = vec![LayoutInfo::new(5u64, r).with_parent(5)];
    assert!(matches!(
        build_view_tree(self_parent, id, |_| ()),
        Err(Error::ParentCycle { .. })
    ));
}

#[test]
fn positioned_wrapper_keeps_parent_links_and_relative_positions() {
    let id = VirtualizerId::from_raw(3);
    let views = build_view_tree(sectioned_infos(), id, |info| info.key).unwrap();
    let items = render_views(&views, &PositionedWrapper);

    assert_eq!(items.len(), 3);
    assert_eq!(items.iter().map(|i| i.node_count()).sum::<usize>(), 5);

    let section = &items[1];
    assert_eq!(section.key, 2);
    assert!(section.parent.is_none());
    assert_eq!(section.style.top, 20.0);

    let child = &section.children[1];
    assert_eq!(child.key, 22);
    assert_eq!(child.content, 22);
    assert_eq!(child.parent.as_ref().map(|p| p.key), Some(2));
    assert_eq!(child.style.left, 10.0);
    assert_eq!(child.style.top, 40.0);
    assert_eq!(child.virtualizer, id);

    let mut visited = Vec::new();
    for item in &items {
        item.walk(&mut |node, depth| visited.push((node.key, depth)));
    }
    assert_eq!(visited, vec![(1, 0), (2, 0), (21, 1), (22, 1), (3, 0)]);
}

#[test]
fn sticky_layout_infos_are_positioned_sticky() {
    let info = LayoutInfo::new(1u64, Rect::new(0.0, 30.0, 10.0, 10.0))
        .with_sticky(true)
        .with_z_index(2);
    let style = ItemStyle::for_layout(&info, None);
    assert_eq!(style.positioning, Positioning::Sticky);
    assert_eq!(style.z_index, 2);
}

fn flat_wrapper(
    parent: Option<&ReusableView<u64, u64>>,
    view: &ReusableView<u64, u64>,
    _children: &[ReusableView<u64, u64>],
    _render_children: &mut dyn FnMut(&[ReusableView<u64, u64>]) -> Vec<(u64, Option<u64>)>,
) -> (u64, Option<u64>) {
    (view.key, parent.map(|p| p.key))
}

fn flattening_wrapper(
    parent: Option<&ReusableView<u64, u64>>,
    view: &ReusableView<u64, u64>,
    children: &[ReusableView<u64, u64>],
    render_children: &mut dyn FnMut(&[ReusableView<u64, u64>]) -> Vec<Vec<(u64, Option<u64>)>>,
) -> Vec<(u64, Option<u64>)> {
    let mut out = vec![(view.key, parent.map(|p| p.key))];
    for nested in render_children(children) {
        out.extend(nested);
    }
    out
}

#[test]
fn custom_wrappers_replace_the_default() {
    let views =
        build_view_tree(sectioned_infos(), VirtualizerId::from_raw(1), |info| info.key).unwrap();

    // A wrapper that never calls the continuation drops nested views.
    let flat = render_views(&views, &flat_wrapper);
    assert_eq!(flat, vec![(1, None), (2, None), (3, None)]);

    let all: Vec<(u64, Option<u64>)> = render_views(&views, &flattening_wrapper)
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(
        all,
        vec![(1, None), (2, None), (21, Some(2)), (22, Some(2)), (3, None)]
    );

    let count_nodes = |_parent: Option<&ReusableView<u64, u64>>,
                       _view: &ReusableView<u64, u64>,
                       children: &[ReusableView<u64, u64>],
                       render_children: &mut dyn FnMut(&[ReusableView<u64, u64>]) -> Vec<usize>|
     -> usize { 1 + render_children(children).into_iter().sum::<usize>() };
    let counts = render_views(&views, &count_nodes);
    assert_eq!(counts, vec![1, 3, 1]);
}

#[test]
fn visible_views_recycle_rendered_values() {
    let layout = FixedLayout::list(100, 10.0);
    let mut v: Virtualizer<FixedLayout, u64> = Virtualizer::new(
        layout,
        VirtualizerOptions::new().with_initial_rect(Some(viewport(0.0, 50.0))),
    );
    let renders = AtomicUsize::new(0);
    let mut render = |info: &LayoutInfo<u64>| {
        renders.fetch_add(1, Ordering::SeqCst);
        info.key
    };

    let views = v.visible_views(&mut render).unwrap();
    assert_eq!(views.iter().map(|v| v.key).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    assert_eq!(v.render_stats().rendered, 5);
    assert_eq!(v.render_stats().reused, 0);

    v.visible_views(&mut render).unwrap();
    assert_eq!(v.render_stats().rendered, 0);
    assert_eq!(v.render_stats().reused, 5);

    // Scroll by two rows: three views are recycled, two are new.
    v.set_visible_rect(viewport(20.0, 50.0));
    let views = v.visible_views(&mut render).unwrap();
    assert_eq!(views.first().map(|v| v.key), Some(2));
    assert_eq!(v.render_stats().reused, 3);
    assert_eq!(v.render_stats().rendered, 2);

    v.invalidate();
    v.visible_views(&mut render).unwrap();
    assert_eq!(v.render_stats().rendered, 5);
    assert_eq!(v.render_stats().passes, 4);
    assert_eq!(renders.load(Ordering::SeqCst), 12);
}

#[test]
fn persisted_keys_stay_rendered_with_their_section() {
    let mut layout = FixedLayout::list(10, 10.0);
    layout.push(LayoutInfo::new(100, Rect::new(0.0, 500.0, 100.0, 40.0)));
    layout.push(LayoutInfo::new(101, Rect::new(0.0, 510.0, 100.0, 10.0)).with_parent(100));

    let mut v: Virtualizer<FixedLayout, ()> = Virtualizer::new(
        layout,
        VirtualizerOptions::new()
            .with_initial_rect(Some(viewport(0.0, 20.0)))
            .with_focused_key(Some(101)),
    );
    let views = v.visible_views(|_| ()).unwrap();
    let keys: Vec<u64> = views.iter().map(|v| v.key).collect();
    assert_eq!(keys, vec![0, 1, 100]);
    assert_eq!(views[2].children.len(), 1);
    assert_eq!(views[2].children[0].key, 101);

    v.set_focused_key(None);
    v.set_persisted_keys([7, 404]);
    let keys: Vec<u64> = v.visible_views(|_| ()).unwrap().iter().map(|v| v.key).collect();
    assert_eq!(keys, vec![0, 1, 7]);
}

#[test]
fn visible_child_pulls_in_its_offscreen_section() {
    let mut layout = FixedLayout::default();
    // The section's rect only covers its header.
    layout.push(LayoutInfo::new(1, Rect::new(0.0, 0.0, 100.0, 40.0)));
    layout.push(LayoutInfo::new(2, Rect::new(0.0, 600.0, 100.0, 10.0)).with_parent(1));

    let mut v: Virtualizer<FixedLayout, ()> = Virtualizer::new(layout, VirtualizerOptions::new());
    v.set_visible_rect(viewport(600.0, 10.0));
    let views = v.visible_views(|_| ()).unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].key, 1);
    assert_eq!(views[0].children[0].key, 2);
}

#[test]
fn unresolvable_parent_renders_child_as_root() {
    let mut layout = FixedLayout::list(3, 10.0);
    layout.push(LayoutInfo::new(7, Rect::new(0.0, 30.0, 100.0, 10.0)).with_parent(99));

    let mut v: Virtualizer<FixedLayout, u64> = Virtualizer::new(
        layout,
        VirtualizerOptions::new().with_initial_rect(Some(viewport(0.0, 40.0))),
    );
    let views = v.visible_views(|info| info.key).unwrap();
    let keys: Vec<u64> = views.iter().map(|view| view.key).collect();
    assert_eq!(keys, vec![0, 1, 2, 7]);
    assert!(views[3].layout_info.parent_key.is_none());

    let items = render_views(&views, &PositionedWrapper);
    assert_eq!(items[3].style.top, 30.0);
}

#[test]
fn frame_state_round_trips_visible_rect_and_scrolling() {
    let mut v: Virtualizer<FixedLayout, ()> =
        Virtualizer::new(FixedLayout::list(10, 10.0), VirtualizerOptions::new());
    v.set_visible_rect(viewport(30.0, 40.0));
    v.start_scrolling();

    let frame = v.frame_state();
    assert_eq!(frame.content_size, Size::new(100.0, 100.0));
    assert!(frame.is_scrolling);

    let mut restored: Virtualizer<FixedLayout, ()> =
        Virtualizer::new(FixedLayout::list(10, 10.0), VirtualizerOptions::new());
    restored.restore_frame_state(frame);
    assert_eq!(restored.visible_rect(), viewport(30.0, 40.0));
    assert!(restored.is_scrolling());
    restored.end_scrolling();
    assert!(!restored.is_scrolling());
}

#[test]
fn virtualizers_get_distinct_ids() {
    let a: Virtualizer<FixedLayout, ()> =
        Virtualizer::new(FixedLayout::default(), VirtualizerOptions::new());
    let b: Virtualizer<FixedLayout, ()> =
        Virtualizer::new(FixedLayout::default(), VirtualizerOptions::new());
    assert_ne!(a.id(), b.id());
    assert_eq!(VisibleRectState::id(&a), a.id());
}

#[test]
fn rect_geometry() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.max_x(), 40.0);
    assert_eq!(r.max_y(), 60.0);
    assert!(r.contains_point(Point::new(10.0, 20.0)));
    assert!(!r.contains_point(Point::new(40.0, 20.0)));
    assert!(!r.intersects(&Rect::new(40.0, 20.0, 5.0, 5.0)));
    assert!(r.intersects(&Rect::new(39.0, 59.0, 5.0, 5.0)));
    assert_eq!(r.with_origin(Point::new(0.0, 0.0)).size(), Size::new(30.0, 40.0));
    assert!(Size::new(0.0, 10.0).is_empty());
    assert!(!Size::new(1.0, 10.0).is_empty());
}
