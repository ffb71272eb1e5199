//! Benchmarks for geometry queries and pointer classification.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::indexing_slicing)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gridview::layout::{CoordinateManager, CoordinateOptions};
use gridview::types::{
    ColumnDescriptor, ColumnResizeState, DragState, GridTheme, InteractionConfig, RowControlType,
};
use gridview::regions::{classify, pointer_position, RegionQuery};
use gridview::CombinedSelection;

fn coordinate(rows: usize) -> CoordinateManager {
    CoordinateManager::new(CoordinateOptions {
        row_count: rows,
        column_count: 50,
        row_initial_size: 40.0,
        column_initial_size: 60.0,
        ..CoordinateOptions::default()
    })
}

/// Benchmark the binary search behind every pointer and render query.
fn bench_offset_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_index_at");
    for rows in [10_000usize, 1_000_000] {
        let coord = coordinate(rows);
        // Force the full prefix cache so the measurement is the search alone.
        let total = coord.total_height();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, _| {
            let mut y = 40.0f32;
            b.iter(|| {
                y = (y * 1.37 + 13.0) % total;
                black_box(coord.row_index_at(black_box(y)))
            })
        });
    }
    group.finish();
}

/// Benchmark cold offset queries that extend the prefix cache on demand.
fn bench_cold_deep_jump(c: &mut Criterion) {
    c.bench_function("row_offset_cold_900k", |b| {
        b.iter_batched(
            || coordinate(1_000_000),
            |coord| black_box(coord.row_offset(black_box(900_000))),
            criterion::BatchSize::SmallInput,
        )
    });
}

/// Benchmark the visible-region walk at a deep scroll offset.
fn bench_visible_region(c: &mut Criterion) {
    let coord = coordinate(1_000_000);
    c.bench_function("visible_region_deep", |b| {
        b.iter(|| black_box(coord.visible_region(black_box(3000.0), black_box(2.0e7))))
    });
}

/// Benchmark the full pointer classification cascade.
fn bench_classify(c: &mut Criterion) {
    let coord = coordinate(100_000);
    let columns: Vec<ColumnDescriptor> = (0..50)
        .map(|i| ColumnDescriptor::new(format!("c{i}"), format!("Col {i}"), 150.0))
        .collect();
    let selection = CombinedSelection::cells([3, 10], [8, 40]);
    let drag = DragState::default();
    let resize = ColumnResizeState::default();
    let row_controls = vec![RowControlType::Checkbox, RowControlType::Drag];
    let theme = GridTheme::default();
    let config = InteractionConfig::default();

    // A spread of pointer positions hitting different cascade arms.
    let points = [
        (30.0f32, 20.0f32),
        (100.0, 10.0),
        (209.0, 15.0),
        (30.0, 300.0),
        (400.0, 300.0),
        (790.0, 590.0),
    ];

    c.bench_function("classify_cascade", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let (x, y) = points[i % points.len()];
            i += 1;
            let position = pointer_position(&coord, 1500.0, 64_000.0, x, y, true, true);
            let query = RegionQuery {
                x,
                y,
                row_index: position.row_index,
                column_index: position.column_index,
                is_out_of_bounds: position.is_out_of_bounds,
                coord: &coord,
                scroll_left: 1500.0,
                scroll_top: 64_000.0,
                selection: &selection,
                is_selecting: false,
                drag: &drag,
                resize: &resize,
                columns: &columns,
                row_controls: &row_controls,
                theme: &theme,
                config: &config,
                has_append_row: true,
                has_append_column: true,
            };
            black_box(classify(&query))
        })
    });
}

criterion_group!(
    benches,
    bench_offset_lookup,
    bench_cold_deep_jump,
    bench_visible_region,
    bench_classify
);
criterion_main!(benches);
