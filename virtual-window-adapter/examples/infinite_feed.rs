// Example: a feed that appends a page whenever the controller asks for more.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use virtual_window::{
    Layout, LayoutInfo, LoadMoreCallback, LoadMoreProps, PositionedWrapper, Rect, Size,
    Virtualizer, VirtualizerOptions,
};
use virtual_window_adapter::Controller;

const PAGE: u64 = 20;
const ROW: f64 = 32.0;

struct Feed {
    len: u64,
}

impl Layout for Feed {
    type Key = u64;

    fn content_size(&self) -> Size {
        Size::new(360.0, self.len as f64 * ROW)
    }

    fn visible_layout_infos(&self, rect: Rect) -> Vec<LayoutInfo<u64>> {
        let first = (rect.y.max(0.0) / ROW) as u64;
        let last = ((rect.max_y() / ROW).ceil() as u64).min(self.len);
        (first..last)
            .filter_map(|i| self.layout_info(&i))
            .collect()
    }

    fn layout_info(&self, key: &u64) -> Option<LayoutInfo<u64>> {
        (*key < self.len)
            .then(|| LayoutInfo::new(*key, Rect::new(0.0, *key as f64 * ROW, 360.0, ROW)))
    }
}

fn main() {
    // The host's "fetch" only records the request; the frame loop below completes it.
    let requested = Arc::new(AtomicBool::new(false));
    let on_load_more: LoadMoreCallback = {
        let requested = Arc::clone(&requested);
        Arc::new(move || requested.store(true, Ordering::SeqCst))
    };
    let props = |is_loading| {
        Arc::new(
            LoadMoreProps::new()
                .with_is_loading(is_loading)
                .with_callback(Some(Arc::clone(&on_load_more))),
        )
    };

    let v = Virtualizer::new(
        Feed { len: 5 },
        VirtualizerOptions::new().with_initial_rect(Some(Rect::new(0.0, 0.0, 360.0, 480.0))),
    );
    let mut c: Controller<Feed, String> = Controller::new(v, props(false));

    let mut y = 0.0;
    for frame in 0..40 {
        if requested.swap(false, Ordering::SeqCst) {
            c.virtualizer_mut().layout_mut().len += PAGE;
            c.set_props(props(false));
        }
        if c.commit() {
            println!("frame={frame}: viewport not filled, requested a page");
        }

        y += 90.0;
        if c.on_visible_rect_change(Rect::new(0.0, y, 360.0, 480.0)) {
            println!("frame={frame}: near the end at y={y}, requested a page");
        }

        match c.render(&PositionedWrapper, |info| format!("post #{}", info.key)) {
            Ok(items) => {
                if let (Some(first), Some(last)) = (items.first(), items.last()) {
                    println!("frame={frame}: {}..={}", first.key, last.key);
                }
            }
            Err(err) => eprintln!("render failed: {err}"),
        }
    }

    println!(
        "len={} stats={:?}",
        c.virtualizer().layout().len,
        c.virtualizer().render_stats()
    );
}
