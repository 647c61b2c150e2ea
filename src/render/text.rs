//! Plain text view of a rendered block, for terminals and logs.

use crate::model::{
    Alignment, CartesianChart, GalleryView, InlineContent, Paragraph, RadialChart, RichText, Scene,
    Table, TextBlock,
};

/// Render a scene as plain text.
pub fn to_text(scene: &Scene) -> String {
    let mut output = String::new();

    if let Some(title) = scene.title() {
        output.push_str(title);
        output.push_str("\n\n");
    }

    match scene {
        Scene::RichText(text) => render_rich_text(&mut output, text),
        Scene::Table(table) => render_table(&mut output, table),
        Scene::Cartesian(chart) => render_cartesian(&mut output, chart),
        Scene::Radial(chart) => render_radial(&mut output, chart),
        Scene::Gallery(view) => render_gallery(&mut output, view),
    }

    output.trim_end().to_string()
}

fn render_rich_text(output: &mut String, text: &RichText) {
    let mut in_list = false;
    for block in &text.blocks {
        let is_item = matches!(block, TextBlock::Paragraph(p) if p.is_list_item());
        if in_list && !is_item {
            output.push('\n');
        }
        in_list = is_item;

        match block {
            TextBlock::Paragraph(para) => render_paragraph(output, para),
            TextBlock::CodeBlock { code, .. } => {
                for line in code.trim_end().lines() {
                    output.push_str("    ");
                    output.push_str(line);
                    output.push('\n');
                }
                output.push('\n');
            }
            TextBlock::Image { url, alt } => {
                output.push_str(&format!("[image: {}] ({})\n\n", alt, url));
            }
            TextBlock::HorizontalRule => output.push_str("---\n\n"),
        }
    }
}

fn render_paragraph(output: &mut String, para: &Paragraph) {
    let quote = "> ".repeat(para.style.quote_depth as usize);
    output.push_str(&quote);

    if let Some(level) = para.heading_level() {
        output.push_str(&"#".repeat(level as usize));
        output.push(' ');
        render_inline(output, &para.content);
        output.push_str("\n\n");
        return;
    }

    if let Some(info) = &para.style.list_info {
        output.push_str(&"  ".repeat(info.level as usize));
        output.push_str(&info.marker());
        output.push(' ');
        render_inline(output, &para.content);
        output.push('\n');
        return;
    }

    render_inline(output, &para.content);
    output.push_str("\n\n");
}

fn render_inline(output: &mut String, content: &[InlineContent]) {
    for item in content {
        match item {
            InlineContent::Text(run) => output.push_str(&run.text),
            InlineContent::LineBreak => output.push('\n'),
            InlineContent::Link { text, url, .. } => {
                output.push_str(&format!("{} <{}>", text, url));
            }
            InlineContent::Image { alt, .. } => output.push_str(&format!("[image: {}]", alt)),
        }
    }
}

fn render_table(output: &mut String, table: &Table) {
    if table.column_count() == 0 {
        output.push_str("(empty table)\n");
        return;
    }

    let mut line = |cells: Vec<String>| {
        output.push('|');
        for cell in cells {
            output.push_str(&format!(" {} |", cell));
        }
        output.push('\n');
    };

    line(
        table
            .header
            .cells
            .iter()
            .map(|c| c.text.replace('\n', " "))
            .collect(),
    );
    line(
        table
            .header
            .cells
            .iter()
            .map(|c| match c.alignment {
                Alignment::Left => "---".to_string(),
                Alignment::Center => ":---:".to_string(),
                Alignment::Right => "---:".to_string(),
            })
            .collect(),
    );
    for row in &table.rows {
        line(row.cells.iter().map(|c| c.text.replace('\n', " ")).collect());
    }

    if table.is_empty() {
        output.push_str("(no rows)\n");
    }
}

fn render_cartesian(output: &mut String, chart: &CartesianChart) {
    output.push_str(&format!(
        "{:?} chart: {} by {}\n",
        chart.kind, chart.y_key, chart.x_key
    ));
    if chart.is_empty() {
        output.push_str("(no data)\n");
        return;
    }

    let width = chart.points.iter().map(|p| p.label.len()).max().unwrap_or(0);
    for point in &chart.points {
        match point.value {
            Some(value) => {
                let bar = "#".repeat((chart.y_axis.fraction(value) * 40.0).round() as usize);
                output.push_str(&format!("{:<width$} | {} {}\n", point.label, bar, value));
            }
            None => output.push_str(&format!("{:<width$} | -\n", point.label)),
        }
    }
    output.push_str(&format!(
        "axis: {}\n",
        chart
            .y_axis
            .ticks
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ));
}

fn render_radial(output: &mut String, chart: &RadialChart) {
    if chart.is_empty() {
        output.push_str("(no data)\n");
        return;
    }
    for slice in &chart.slices {
        output.push_str(&format!("{} {}\n", slice.color, slice.label()));
    }
}

fn render_gallery(output: &mut String, view: &GalleryView) {
    if view.image_count == 0 {
        output.push_str("(no images)\n");
        return;
    }

    let strip = view
        .window
        .iter()
        .map(|slot| format!("[{}] {}", slot.index + 1, slot.image.alt))
        .collect::<Vec<_>>()
        .join("  ");
    if view.show_arrows {
        output.push_str(&format!("< {} >\n", strip));
    } else {
        output.push_str(&format!("{}\n", strip));
    }

    let dots: String = view
        .dots
        .iter()
        .map(|d| if d.active { '●' } else { '○' })
        .collect();
    output.push_str(&dots);
    output.push('\n');

    if let Some(lightbox) = &view.lightbox {
        output.push_str(&format!(
            "\nViewing {}/{}: {} ({})\n",
            lightbox.index + 1,
            view.image_count,
            lightbox.image.alt,
            lightbox.image.url
        ));
        if let Some(caption) = &lightbox.image.caption {
            output.push_str(caption);
            output.push('\n');
        }
    }
}
