// Example: a sectioned layout rendered as a nested, positioned item tree.
use virtual_window::{
    Layout, LayoutInfo, PositionedWrapper, Rect, Size, Virtualizer, VirtualizerOptions,
    render_views,
};

/// Sections of `rows` fixed-height rows, each with a sticky header.
struct Sections {
    sections: u64,
    rows: u64,
    row_height: f64,
}

impl Sections {
    fn section_height(&self) -> f64 {
        (self.rows + 1) as f64 * self.row_height
    }

    fn info(&self, key: u64) -> Option<LayoutInfo<u64>> {
        // Section `s` has key `s * 1000`; its header is `s * 1000 + 1`, row `r` is `s * 1000 + 2 + r`.
        let s = key / 1000;
        let local = key % 1000;
        if s >= self.sections {
            return None;
        }
        let top = s as f64 * self.section_height();
        match local {
            0 => Some(LayoutInfo::new(
                key,
                Rect::new(0.0, top, 320.0, self.section_height()),
            )),
            1 => Some(
                LayoutInfo::new(key, Rect::new(0.0, top, 320.0, self.row_height))
                    .with_parent(s * 1000)
                    .with_sticky(true)
                    .with_z_index(1),
            ),
            n if n - 2 < self.rows => {
                let y = top + (n - 1) as f64 * self.row_height;
                Some(
                    LayoutInfo::new(key, Rect::new(0.0, y, 320.0, self.row_height))
                        .with_parent(s * 1000),
                )
            }
            _ => None,
        }
    }
}

impl Layout for Sections {
    type Key = u64;

    fn content_size(&self) -> Size {
        Size::new(320.0, self.sections as f64 * self.section_height())
    }

    fn visible_layout_infos(&self, rect: Rect) -> Vec<LayoutInfo<u64>> {
        let mut out = Vec::new();
        for s in 0..self.sections {
            out.extend(
                (1..self.rows + 2)
                    .filter_map(|local| self.info(s * 1000 + local))
                    .filter(|info| info.rect.intersects(&rect)),
            );
        }
        out
    }

    fn layout_info(&self, key: &u64) -> Option<LayoutInfo<u64>> {
        self.info(*key)
    }
}

fn main() {
    let layout = Sections {
        sections: 50,
        rows: 8,
        row_height: 24.0,
    };
    let mut v = Virtualizer::new(
        layout,
        VirtualizerOptions::new().with_initial_rect(Some(Rect::new(0.0, 200.0, 320.0, 120.0))),
    );

    // Sections are never reported as visible; they are pulled in as ancestors of their rows.
    let views = match v.visible_views(|info| format!("cell {}", info.key)) {
        Ok(views) => views,
        Err(err) => {
            eprintln!("invalid layout: {err}");
            return;
        }
    };
    for item in render_views(&views, &PositionedWrapper) {
        item.walk(&mut |node, depth| {
            println!(
                "{:indent$}{} top={} sticky={:?}",
                "",
                node.content,
                node.style.top,
                node.style.positioning,
                indent = depth * 2
            );
        });
    }
    println!("stats={:?}", v.render_stats());
}
