//! Shared page builders for integration tests.
//!
//! Pages are assembled from ruled grids and text grids so each test states
//! its layout in a line or two.

#![allow(dead_code)]

use tablescout::{BBox, RawPage, Segment, TextElement};

/// Install a fmt subscriber writing to the test output. Safe to call from
/// every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Ruled grid with vertical rules at `xs` and horizontal rules at `ys`,
/// each rule spanning the full grid.
pub fn ruled_grid(xs: &[f64], ys: &[f64]) -> Vec<Segment> {
    let (x0, x1) = (xs[0], xs[xs.len() - 1]);
    let (y0, y1) = (ys[0], ys[ys.len() - 1]);
    let mut segments = Vec::new();
    for &y in ys {
        segments.push(Segment::new(x0, y, x1, y));
    }
    for &x in xs {
        segments.push(Segment::new(x, y0, x, y1));
    }
    segments
}

/// Text cells laid out in `rows` rows and `cols` columns starting at
/// `(left, top)`. Cells are 40 wide and 10 high; columns are 100 apart and
/// rows 14 apart.
pub fn text_grid(left: f64, top: f64, rows: usize, cols: usize) -> Vec<TextElement> {
    let mut texts = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let x = left + c as f64 * 100.0;
            let y = top + r as f64 * 14.0;
            texts.push(TextElement::new(
                format!("{r}.{c}"),
                BBox::new(x, y, x + 40.0, y + 10.0),
                10.0,
            ));
        }
    }
    texts
}

/// A letter-size page carrying a ruled table and a separate unruled
/// text table.
pub fn mixed_page() -> RawPage {
    RawPage::new(612.0, 792.0)
        .with_segments(ruled_grid(&[50.0, 200.0, 350.0], &[100.0, 130.0, 160.0]))
        .with_texts(text_grid(50.0, 400.0, 4, 3))
}

/// A page with only running text (no rules, no columns).
pub fn prose_page() -> RawPage {
    let texts = (0..5)
        .map(|i| {
            let y = 100.0 + i as f64 * 14.0;
            TextElement::new("lorem ipsum", BBox::new(72.0, y, 540.0, y + 10.0), 10.0)
        })
        .collect();
    RawPage::new(612.0, 792.0).with_texts(texts)
}
