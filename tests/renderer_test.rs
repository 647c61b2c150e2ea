//! Integration tests for descriptor rendering and export affordances.

use serde_json::json;
use vizblock::model::ContentTag;
use vizblock::render::{to_text, PALETTE};
use vizblock::{
    ContentDescriptor, ContentRenderer, ExportFormat, KeyboardHub, RenderedBlock, Scene,
};

fn renderer() -> ContentRenderer {
    ContentRenderer::default().with_keyboard(KeyboardHub::new())
}

fn descriptor(value: serde_json::Value) -> ContentDescriptor {
    ContentDescriptor::from_value(&value)
}

#[test]
fn test_csv_offered_only_for_tables() {
    let samples = [
        json!({"type": "text", "data": "hi"}),
        json!({"type": "table", "data": []}),
        json!({"type": "line-chart", "data": [], "xKey": "x", "yKey": "y", "title": "L"}),
        json!({"type": "bar-chart", "data": [], "xKey": "x", "yKey": "y", "title": "B"}),
        json!({"type": "pie-chart", "data": [], "dataKey": "v", "nameKey": "n", "title": "P"}),
        json!({"type": "images", "data": []}),
        json!({"type": "heatmap", "data": "x"}),
    ];

    let renderer = renderer();
    for sample in samples {
        let d = descriptor(sample);
        let affordances = renderer.render(&d).affordances();
        assert_eq!(
            affordances.allows(ExportFormat::Csv),
            d.tag() == Some(ContentTag::Table),
            "csv affordance for {}",
            d.tag_name()
        );
        let exportable = matches!(
            d.tag(),
            Some(
                ContentTag::Table
                    | ContentTag::LineChart
                    | ContentTag::BarChart
                    | ContentTag::PieChart
            )
        );
        assert_eq!(affordances.any(), exportable, "any affordance for {}", d.tag_name());
        assert_eq!(affordances.allows(ExportFormat::Pdf), exportable);
        assert_eq!(affordances.allows(ExportFormat::Image), exportable);
    }
}

#[test]
fn test_table_menu_labels() {
    let content = renderer().render(&descriptor(json!({"type": "table", "data": []})));
    let labels: Vec<&str> = content.affordances().menu().iter().map(|m| m.label).collect();
    assert_eq!(labels, vec!["Export as PDF", "Export as CSV", "Export as Image"]);
}

#[test]
fn test_unknown_tag_renders_like_text() {
    let renderer = renderer();
    let source = "## Notes\n\n- first\n- second\n\n**done**";

    let text = renderer.render(&descriptor(json!({"type": "text", "data": source})));
    let unknown = renderer.render(&descriptor(json!({"type": "sankey", "data": source})));
    let untagged = renderer.render(&descriptor(json!({"data": source})));

    assert_eq!(text.scene(), unknown.scene());
    assert_eq!(text.scene(), untagged.scene());
    assert!(!unknown.affordances().any());
}

#[test]
fn test_tag_match_is_case_sensitive() {
    let d = descriptor(json!({"type": "Table", "data": [{"a": 1}]}));
    assert!(matches!(d, ContentDescriptor::Fallback { .. }));
    assert!(matches!(renderer().render(&d).block(), RenderedBlock::RichText(_)));
}

#[test]
fn test_malformed_chart_falls_back() {
    // Missing yKey
    let d = descriptor(json!({"type": "bar-chart", "data": [{"m": "Jan"}], "xKey": "m"}));
    let content = renderer().render(&d);
    assert!(matches!(content.block(), RenderedBlock::RichText(_)));
    assert!(!content.affordances().any());
}

#[test]
fn test_pie_scenario() {
    let d = descriptor(json!({
        "type": "pie-chart",
        "data": [{"category": "A", "value": 35}, {"category": "B", "value": 65}],
        "dataKey": "value",
        "nameKey": "category",
        "title": "X"
    }));

    let renderer = renderer();
    let first = renderer.render(&d);
    let Scene::Radial(chart) = first.scene() else {
        panic!("expected a radial scene");
    };

    assert_eq!(chart.slices.len(), 2);
    let total: f64 = chart.slices.iter().map(|s| s.percent).sum();
    assert!((total - 1.0).abs() < 1e-9);
    let sweep: f64 = chart.slices.iter().map(|s| s.sweep).sum();
    assert!((sweep - 360.0).abs() < 1e-9);

    assert_eq!(chart.slices[0].color, PALETTE[0]);
    assert_eq!(chart.slices[1].color, PALETTE[1]);
    assert_ne!(chart.slices[0].color, chart.slices[1].color);
    assert_eq!(chart.slices[0].label(), "A 35%");

    // Same input order, same colors.
    assert_eq!(renderer.render(&d).scene(), first.scene());
}

#[test]
fn test_bar_colors_cycle() {
    let data: Vec<_> = (0..7).map(|i| json!({"k": format!("p{}", i), "v": i})).collect();
    let d = descriptor(json!({
        "type": "bar-chart",
        "data": data,
        "xKey": "k",
        "yKey": "v",
        "title": "T"
    }));

    let Scene::Cartesian(chart) = renderer().render(&d).scene() else {
        panic!("expected a cartesian scene");
    };
    let colors: Vec<_> = chart.points.iter().map(|p| p.color).collect();
    assert_eq!(colors[5], colors[0]);
    assert_eq!(colors[6], colors[1]);
}

#[test]
fn test_empty_data_renders() {
    let renderer = renderer();
    let samples = [
        json!({"type": "table", "data": [], "title": "Empty"}),
        json!({"type": "line-chart", "data": [], "xKey": "x", "yKey": "y", "title": "L"}),
        json!({"type": "pie-chart", "data": [], "dataKey": "v", "nameKey": "n", "title": "P"}),
        json!({"type": "images", "data": []}),
    ];
    for sample in samples {
        let d = descriptor(sample);
        let content = renderer.render(&d);
        assert!(d.tag().is_some());
        // Text view never panics and keeps the title.
        let text = to_text(&content.scene());
        if let Some(title) = d.title() {
            assert!(text.starts_with(title));
        }
    }
}

#[test]
fn test_table_text_view() {
    let d = descriptor(json!({
        "type": "table",
        "title": "Q1",
        "data": [{"Name": "John", "Sales": 100}]
    }));
    assert_eq!(
        to_text(&renderer().render(&d).scene()),
        "Q1\n\n| Name | Sales |\n| --- | ---: |\n| John | 100 |"
    );
}

#[test]
fn test_chart_scene_json_reads_back() {
    let renderer = renderer();
    let charts = [
        json!({"type": "line-chart", "title": "L", "xKey": "m", "yKey": "v",
               "data": [{"m": "Jan", "v": 3}, {"m": "Feb", "v": 7.5}]}),
        json!({"type": "bar-chart", "title": "B", "xKey": "m", "yKey": "v",
               "data": [{"m": "Jan", "v": 3}, {"m": "Feb", "v": "n/a"}]}),
        json!({"type": "pie-chart", "title": "P", "dataKey": "v", "nameKey": "n",
               "data": [{"n": "A", "v": 35}, {"n": "B", "v": 65}]}),
    ];

    for chart in charts {
        let scene = renderer.render(&descriptor(chart)).scene();
        let json = vizblock::render::to_json(&scene, vizblock::JsonFormat::Compact).unwrap();
        assert_eq!(json.matches("\"scene\":").count(), 1, "{}", json);

        let back: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scene);
    }
}
