//! Image lifecycle across the viewer and the windowed cache: enumerating
//! image cells in the materialized window, scoping loads to it as the view
//! scrolls, and repainting cells whose images arrive late.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{frozen_grid, grid};
use gridview::cache::{ImageCache, ImageLoader};
use gridview::types::CellDescriptor;
use gridview::viewer::GridView;

/// Records loader traffic; the "resource" is a marker integer.
#[derive(Default)]
struct TestLoader {
    begun: Vec<(String, u64)>,
    cancelled: Vec<String>,
}

impl ImageLoader<u32> for TestLoader {
    fn begin(&mut self, url: &str, generation: u64) {
        self.begun.push((url.to_owned(), generation));
    }

    fn cancel(&mut self, url: &str) {
        self.cancelled.push(url.to_owned());
    }
}

/// Every cell of column 2 holds one image, keyed by row.
fn install_image_column(view: &mut GridView) {
    view.set_cell_source(Box::new(|col, row| {
        if col == 2 {
            CellDescriptor::Image {
                urls: vec![format!("img://{row}")],
            }
        } else {
            CellDescriptor::Text {
                value: String::new(),
            }
        }
    }));
}

/// One frame of the load pipeline: enumerate, request, re-scope.
fn pump(view: &GridView, cache: &mut ImageCache<u32>, loader: &mut TestLoader) {
    for (url, cell) in view.visible_images() {
        cache.request(&url, cell, loader);
    }
    cache.set_window(
        &view.visible_region(),
        view.coord().freeze_column_count(),
        loader,
    );
}

#[test]
fn test_visible_images_cover_materialized_window() {
    let mut view = grid(100, 10);
    install_image_column(&mut view);
    let images = view.visible_images();
    // Window rows 0..=18 (17 in view plus overscan), column 2 in every one.
    assert_eq!(images.len(), 19);
    assert_eq!(images[0], ("img://0".to_owned(), [2, 0]));
    assert!(images.iter().all(|(_, [col, _])| *col == 2));
}

#[test]
fn test_no_source_no_images() {
    let view = grid(100, 10);
    assert!(view.visible_images().is_empty());
}

#[test]
fn test_scrolling_away_cancels_pending_loads() {
    let mut view = grid(100, 10);
    install_image_column(&mut view);
    let mut cache: ImageCache<u32> = ImageCache::default();
    let mut loader = TestLoader::default();

    pump(&view, &mut cache, &mut loader);
    assert_eq!(loader.begun.len(), 19);
    assert_eq!(cache.len(), 19);

    // Scroll column 2 out of the horizontal window.
    view.set_scroll(1000.0, 0.0, 0.0);
    pump(&view, &mut cache, &mut loader);
    assert!(cache.is_empty());
    assert_eq!(loader.cancelled.len(), 19);
}

#[test]
fn test_frozen_image_column_survives_horizontal_scroll() {
    let mut view = frozen_grid(100, 10, 3);
    install_image_column(&mut view);
    let mut cache: ImageCache<u32> = ImageCache::default();
    let mut loader = TestLoader::default();

    pump(&view, &mut cache, &mut loader);
    let tracked = cache.len();
    assert!(tracked > 0);

    view.set_scroll(700.0, 0.0, 0.0);
    pump(&view, &mut cache, &mut loader);
    // Column 2 is frozen: every load is still wanted.
    assert_eq!(cache.len(), tracked);
    assert!(loader.cancelled.is_empty());
}

#[test]
fn test_late_completion_repaints_the_referencing_cell() {
    let mut view = grid(100, 10);
    install_image_column(&mut view);
    let mut cache: ImageCache<u32> = ImageCache::default();
    let mut loader = TestLoader::default();
    pump(&view, &mut cache, &mut loader);

    let (url, generation) = loader.begun[3].clone();
    cache.complete(&url, generation, 7);
    assert_eq!(cache.get(&url), Some(&7));
    let dirty = cache.take_dirty_cells(100.0).unwrap();
    assert_eq!(dirty, vec![[2, 3]]);

    // Vertical scroll far enough that the window drops the completed row;
    // the decoded resource is recycled for reuse.
    view.set_scroll(0.0, 2000.0, 0.0);
    pump(&view, &mut cache, &mut loader);
    assert_eq!(cache.get(&url), None);
    assert_eq!(cache.recycled(), Some(7));
}
