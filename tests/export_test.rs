//! Integration tests for the export pipeline.

use std::sync::Arc;

use serde_json::json;
use vizblock::error::{Error, Result};
use vizblock::{
    detect_format_from_bytes, detect_format_from_path, ArtifactFormat, ContentDescriptor,
    ContentRenderer, ExportFormat, ExportJob, ExportOptions, ExportPipeline, KeyboardHub,
    MemorySink, PageOrientation, Rasterizer, RenderOptions, Surface,
};

fn render(value: serde_json::Value) -> vizblock::RenderedContent {
    ContentRenderer::default()
        .with_keyboard(KeyboardHub::new())
        .render(&ContentDescriptor::from_value(&value))
}

fn sales_table() -> vizblock::RenderedContent {
    render(json!({
        "type": "table",
        "title": "Sales Report",
        "data": [
            {"id": 1, "name": "John", "sales": 100},
            {"id": 2, "name": "Jane", "sales": 200}
        ],
        "columns": [
            {"id": "id", "label": "ID", "numeric": true},
            {"id": "name", "label": "Name"},
            {"id": "sales", "label": "Sales", "numeric": true}
        ]
    }))
}

fn bar_chart() -> vizblock::RenderedContent {
    render(json!({
        "type": "bar-chart",
        "title": "Monthly",
        "xKey": "month",
        "yKey": "total",
        "data": [{"month": "Jan", "total": 10}, {"month": "Feb", "total": 30}]
    }))
}

fn memory_pipeline() -> (ExportPipeline, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    (ExportPipeline::new(sink.clone()), sink)
}

/// Rasterizer that always fails.
struct BrokenRasterizer;

impl Rasterizer for BrokenRasterizer {
    fn rasterize(&self, _surface: &Surface, _scale: f32) -> Result<image::RgbaImage> {
        Err(Error::Raster("surface detached".to_string()))
    }
}

#[test]
fn test_csv_export_scenario() {
    let (pipeline, sink) = memory_pipeline();
    pipeline.export(ExportFormat::Csv, &sales_table()).unwrap();

    let bytes = sink.get("Sales Report.csv").unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "id,name,sales\n1,John,100\n2,Jane,200\n"
    );
}

#[test]
fn test_csv_export_is_byte_stable() {
    let (pipeline, _) = memory_pipeline();
    let content = sales_table();
    let job = pipeline.prepare(ExportFormat::Csv, &content).unwrap();
    let first = pipeline.encode(&job).unwrap();
    let second = pipeline.encode(&job).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_csv_unavailable_for_charts() {
    let (pipeline, sink) = memory_pipeline();
    let err = pipeline.export(ExportFormat::Csv, &bar_chart()).unwrap_err();
    assert!(matches!(
        err,
        Error::ExportUnavailable { ref format, ref tag } if format == "csv" && tag == "bar-chart"
    ));
    assert!(sink.is_empty());
}

#[test]
fn test_text_and_images_not_exportable() {
    let (pipeline, sink) = memory_pipeline();
    let text = render(json!({"type": "text", "data": "# Hi"}));
    let gallery = render(json!({"type": "images", "data": [{"url": "u", "alt": "a"}]}));

    for format in ExportFormat::ALL {
        assert!(pipeline.export_or_log(format, &text).is_none());
        assert!(pipeline.export_or_log(format, &gallery).is_none());
    }
    assert!(sink.is_empty());
}

#[test]
fn test_png_export_at_double_scale() {
    let (pipeline, sink) = memory_pipeline();
    let content = bar_chart();
    pipeline.export(ExportFormat::Image, &content).unwrap();

    let surface = Surface::capture(&content, &RenderOptions::default());
    let bytes = sink.get("Monthly.png").unwrap();
    assert_eq!(
        detect_format_from_bytes(&bytes).unwrap(),
        ArtifactFormat::Png {
            width: surface.width() * 2,
            height: surface.height() * 2,
        }
    );
}

#[test]
fn test_pdf_export_single_page() {
    let (pipeline, sink) = memory_pipeline();
    let content = render(json!({
        "type": "pie-chart",
        "title": "Share",
        "dataKey": "value",
        "nameKey": "name",
        "data": [{"name": "A", "value": 3}, {"name": "B", "value": 1}]
    }));
    pipeline.export(ExportFormat::Pdf, &content).unwrap();

    let bytes = sink.get("Share.pdf").unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
    assert!(matches!(
        detect_format_from_bytes(&bytes).unwrap(),
        ArtifactFormat::Pdf { .. }
    ));
}

#[test]
fn test_pdf_portrait_without_metadata_is_deterministic() {
    let (pipeline, _) = memory_pipeline();
    let pipeline = pipeline.with_options(
        ExportOptions::new()
            .with_orientation(PageOrientation::Portrait)
            .with_metadata(false),
    );
    let content = bar_chart();
    let job = pipeline.prepare(ExportFormat::Pdf, &content).unwrap();
    assert_eq!(pipeline.encode(&job).unwrap(), pipeline.encode(&job).unwrap());
}

#[test]
fn test_raster_failure_produces_no_file() {
    let (pipeline, sink) = memory_pipeline();
    let pipeline = pipeline.with_rasterizer(Arc::new(BrokenRasterizer));
    let content = bar_chart();

    assert!(matches!(
        pipeline.export(ExportFormat::Image, &content),
        Err(Error::Raster(_))
    ));
    assert!(pipeline.export_or_log(ExportFormat::Pdf, &content).is_none());
    assert!(sink.is_empty());

    // CSV never rasterizes.
    assert!(pipeline.export_or_log(ExportFormat::Csv, &sales_table()).is_some());
}

#[test]
fn test_untitled_export_uses_default_name() {
    let (pipeline, sink) = memory_pipeline();
    let content = render(json!({"type": "table", "data": [{"a": 1}]}));
    pipeline.export(ExportFormat::Csv, &content).unwrap();
    assert!(sink.get("export.csv").is_some());
}

#[test]
fn test_long_table_exports_at_reduced_scale() {
    let rows: Vec<_> = (0..1200)
        .map(|i| json!({"id": i, "name": format!("row {}", i)}))
        .collect();
    let content = render(json!({"type": "table", "title": "Ledger", "data": rows}));
    let surface = Surface::capture(&content, &RenderOptions::default());
    assert!(surface.height() * 2 > vizblock::export::MAX_DIMENSION);

    let (pipeline, sink) = memory_pipeline();
    pipeline.export(ExportFormat::Image, &content).unwrap();
    pipeline.export(ExportFormat::Pdf, &content).unwrap();

    let ArtifactFormat::Png { width, height } =
        detect_format_from_bytes(&sink.get("Ledger.png").unwrap()).unwrap()
    else {
        panic!("expected a PNG artifact");
    };
    assert!(height <= vizblock::export::MAX_DIMENSION);
    assert!(height >= vizblock::export::MAX_DIMENSION - 1);
    assert!(width < surface.width() * 2);

    // The page keeps the logical size of the surface.
    let doc = lopdf::Document::load_mem(&sink.get("Ledger.pdf").unwrap()).unwrap();
    let page_id = doc.page_iter().next().unwrap();
    let media = doc
        .get_object(page_id)
        .and_then(|page| page.as_dict())
        .and_then(|page| page.get(b"MediaBox"))
        .and_then(|media| media.as_array())
        .unwrap();
    let long_side = media[2].as_float().unwrap().max(media[3].as_float().unwrap());
    let expected = surface.height() as f32 * 0.75;
    assert!((long_side - expected).abs() / expected < 0.01, "{} vs {}", long_side, expected);
}

#[test]
fn test_export_batch_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = ExportPipeline::to_directory(dir.path());
    let options = RenderOptions::default();

    let table = sales_table();
    let chart = bar_chart();
    let jobs = vec![
        ExportJob::from_content(ExportFormat::Csv, &table, &options).unwrap(),
        ExportJob::from_content(ExportFormat::Image, &chart, &options).unwrap(),
        ExportJob::from_content(ExportFormat::Pdf, &chart, &options).unwrap(),
    ];

    let results = pipeline.export_batch(&jobs);
    assert_eq!(results.len(), 3);

    let paths: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
    assert_eq!(paths[0], dir.path().join("Sales Report.csv"));
    assert_eq!(paths[1], dir.path().join("Monthly.png"));
    assert_eq!(paths[2], dir.path().join("Monthly.pdf"));

    assert!(matches!(
        detect_format_from_path(&paths[0]).unwrap(),
        ArtifactFormat::Csv { columns: 3, records: 2 }
    ));
}

#[test]
fn test_batch_keeps_same_titled_exports_apart() {
    let (pipeline, sink) = memory_pipeline();
    let options = RenderOptions::default();
    let first = sales_table();
    let second = render(json!({
        "type": "table",
        "title": "Sales Report",
        "data": [{"region": "EU", "total": 7}]
    }));
    let jobs = vec![
        ExportJob::from_content(ExportFormat::Csv, &first, &options).unwrap(),
        ExportJob::from_content(ExportFormat::Csv, &second, &options).unwrap(),
    ];

    let results = pipeline.export_batch(&jobs);
    assert!(results.iter().all(|r| r.is_ok()));

    assert_eq!(sink.len(), 2);
    let original = String::from_utf8(sink.get("Sales Report.csv").unwrap()).unwrap();
    let renamed = String::from_utf8(sink.get("Sales Report (2).csv").unwrap()).unwrap();
    assert!(original.starts_with("id,name,sales\n"));
    assert!(renamed.starts_with("region,total\n"));
}

#[test]
fn test_capture_is_detached_from_live_carousel() {
    let mut content = render(json!({
        "type": "images",
        "data": [{"url": "a", "alt": "A"}, {"url": "b", "alt": "B"}]
    }));
    let surface = Surface::capture(&content, &RenderOptions::default());

    let carousel = content.block_mut().carousel_mut().unwrap();
    carousel.next();
    assert_eq!(carousel.current_index(), 1);

    assert_ne!(surface.scene(), &content.scene());
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_export_async() {
    let (pipeline, sink) = memory_pipeline();
    let job = pipeline.prepare(ExportFormat::Csv, &sales_table()).unwrap();
    pipeline.export_async(job).await.unwrap();
    assert_eq!(sink.len(), 1);
}
