//! Benchmarks for vizblock rendering and export.
//!
//! Run with: cargo bench

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use vizblock::{
    ContentDescriptor, ContentRenderer, ExportFormat, ExportPipeline, KeyboardHub, MemorySink,
};

/// Creates a table descriptor with the given number of rows.
fn create_table(rows: usize) -> ContentDescriptor {
    let data: Vec<_> = (0..rows)
        .map(|i| json!({"id": i, "name": format!("row {}", i), "sales": i * 10}))
        .collect();
    ContentDescriptor::from_value(&json!({"type": "table", "title": "Bench", "data": data}))
}

fn create_bar_chart(points: usize) -> ContentDescriptor {
    let data: Vec<_> = (0..points)
        .map(|i| json!({"month": format!("m{}", i), "total": (i * 37) % 100}))
        .collect();
    ContentDescriptor::from_value(&json!({
        "type": "bar-chart", "title": "Bench", "xKey": "month", "yKey": "total", "data": data
    }))
}

/// Benchmark descriptor dispatch and adapters.
fn bench_render(c: &mut Criterion) {
    let renderer = ContentRenderer::default().with_keyboard(KeyboardHub::new());
    let markdown = ContentDescriptor::text("# Title\n\nSome **bold** text.\n\n- one\n- two\n");
    let table = create_table(100);
    let chart = create_bar_chart(24);

    c.bench_function("render_markdown", |b| {
        b.iter(|| renderer.render(black_box(&markdown)).scene());
    });

    c.bench_function("render_table_100", |b| {
        b.iter(|| renderer.render(black_box(&table)).scene());
    });

    c.bench_function("render_bar_chart_24", |b| {
        b.iter(|| renderer.render(black_box(&chart)).scene());
    });
}

/// Benchmark export encoding at various sizes.
fn bench_export(c: &mut Criterion) {
    let renderer = ContentRenderer::default().with_keyboard(KeyboardHub::new());
    let pipeline = ExportPipeline::new(Arc::new(MemorySink::new()));
    let mut group = c.benchmark_group("export");

    for rows in [10, 100, 1000].iter() {
        let content = renderer.render(&create_table(*rows));
        let job = pipeline.prepare(ExportFormat::Csv, &content).unwrap();
        group.bench_function(format!("csv_{}_rows", rows), |b| {
            b.iter(|| pipeline.encode(black_box(&job)).unwrap());
        });
    }

    let chart = renderer.render(&create_bar_chart(12));
    for format in [ExportFormat::Image, ExportFormat::Pdf] {
        let job = pipeline.prepare(format, &chart).unwrap();
        group.bench_function(format!("chart_{}", format), |b| {
            b.iter(|| pipeline.encode(black_box(&job)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render, bench_export);
criterion_main!(benches);
