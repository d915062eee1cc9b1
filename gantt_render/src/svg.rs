//! SVG rendering

use crate::GanttChart;
use std::fmt::Write;

const CELL_WIDTH: u64 = 20;
const ROW_HEIGHT: u64 = 30;
const BAR_HEIGHT: u64 = 20;
const LABEL_WIDTH: u64 = 60;
const MARGIN: u64 = 10;
const AXIS_HEIGHT: u64 = 30;
const LABEL_STEP: u64 = 5;

pub(crate) fn render(chart: &GanttChart) -> String {
    let rows = chart.height() as u64;
    let width = MARGIN * 2 + LABEL_WIDTH + chart.width() * CELL_WIDTH;
    let height = MARGIN * 2 + rows * ROW_HEIGHT + AXIS_HEIGHT;

    let mut svg = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(svg, r##"  <rect width="100%" height="100%" fill="#ffffff"/>"##);

    for (index, row) in chart.rows().iter().enumerate() {
        let top = MARGIN + index as u64 * ROW_HEIGHT;
        let task = escape(row.task.as_str());
        let _ = writeln!(
            svg,
            r#"  <text x="{MARGIN}" y="{}" font-family="monospace" font-size="12">{task}</text>"#,
            top + BAR_HEIGHT * 3 / 4
        );
        for span in &row.spans {
            let _ = writeln!(
                svg,
                r##"  <rect x="{}" y="{top}" width="{}" height="{BAR_HEIGHT}" fill="{}" stroke="#000000"><title>{task} [{}, {})</title></rect>"##,
                x_of(span.start),
                span.len() * CELL_WIDTH,
                escape(&row.color),
                span.start,
                span.end
            );
        }
    }

    let axis = MARGIN + rows * ROW_HEIGHT;
    let _ = writeln!(
        svg,
        r##"  <line x1="{}" y1="{axis}" x2="{}" y2="{axis}" stroke="#000000"/>"##,
        x_of(0),
        x_of(chart.width())
    );
    for tick in 0..=chart.width() {
        let x = x_of(tick);
        let mark = if tick % LABEL_STEP == 0 { 6 } else { 3 };
        let _ = writeln!(
            svg,
            r##"  <line x1="{x}" y1="{axis}" x2="{x}" y2="{}" stroke="#000000"/>"##,
            axis + mark
        );
        if tick % LABEL_STEP == 0 {
            let _ = writeln!(
                svg,
                r#"  <text x="{x}" y="{}" font-family="monospace" font-size="10" text-anchor="middle">{tick}</text>"#,
                axis + 18
            );
        }
    }

    svg.push_str("</svg>\n");
    svg
}

fn x_of(tick: u64) -> u64 {
    MARGIN + LABEL_WIDTH + tick * CELL_WIDTH
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
