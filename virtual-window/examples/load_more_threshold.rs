// Example: the two load-more policies evaluated directly against a gate.
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use virtual_window::{LoadMoreCallback, LoadMoreGate, Rect, Size, load_more_threshold};

fn main() {
    let requests = Arc::new(AtomicUsize::new(0));
    let on_load_more: LoadMoreCallback = {
        let requests = Arc::clone(&requests);
        Arc::new(move || {
            requests.fetch_add(1, Ordering::SeqCst);
        })
    };

    let content = Size::new(320.0, 1000.0);
    println!("threshold={}", load_more_threshold(content.height, 300.0));

    let gate = LoadMoreGate::new(false);
    for y in (0..=700).step_by(100) {
        let rect = Rect::new(0.0, y as f64, 320.0, 300.0);
        let fired = gate.evaluate_threshold(rect, content, Some(&on_load_more));
        println!("y={y} fired={fired} outstanding={}", gate.is_outstanding());
    }

    // The caller reports the load as finished; the viewport is still not filled after it.
    let was_loading = gate.is_outstanding();
    gate.resync(false);
    let fired = gate.evaluate_fill(Size::new(320.0, 120.0), 300.0, was_loading, Some(&on_load_more));
    println!("fill fired={fired}");

    println!("requests={}", requests.load(Ordering::SeqCst));
}
