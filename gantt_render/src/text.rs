//! Plain-text rendering

use crate::GanttChart;

const RUNNING: char = '█';
const IDLE: char = '·';
/// Distance between ruler labels, in ticks
const RULER_STEP: usize = 5;

pub(crate) fn render(chart: &GanttChart) -> String {
    if chart.is_empty() {
        return "(no execution)\n".to_string();
    }

    let label_width = chart
        .rows()
        .iter()
        .map(|row| row.task.as_str().chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for row in chart.rows() {
        let cells: String = (0..chart.width())
            .map(|tick| if row.is_running_at(tick) { RUNNING } else { IDLE })
            .collect();
        output.push_str(&format!(
            "{:<width$} |{}|\n",
            row.task.as_str(),
            cells,
            width = label_width
        ));
    }

    output.push_str(&" ".repeat(label_width + 2));
    output.push_str(&ruler(chart.width() as usize));
    output.push('\n');
    output
}

/// Tick labels every [`RULER_STEP`] ticks, left-aligned on their cell
fn ruler(width: usize) -> String {
    let mut ruler = String::new();
    for tick in (0..=width).step_by(RULER_STEP) {
        if ruler.len() < tick {
            ruler.push_str(&" ".repeat(tick - ruler.len()));
        } else if !ruler.is_empty() {
            ruler.push(' ');
        }
        ruler.push_str(&tick.to_string());
    }
    ruler
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::history;

    #[test]
    fn test_render_empty_chart() {
        assert_eq!(GanttChart::default().render_text(), "(no execution)\n");
    }

    #[test]
    fn test_render_rows_and_ruler() {
        let chart = GanttChart::from_history(
            &history(&[Some("T1"), Some("T1"), Some("T2"), None, Some("T1")]),
            &[],
        );
        assert_eq!(
            chart.render_text(),
            "T1 |██··█|\nT2 |··█··|\n    0    5\n"
        );
    }

    #[test]
    fn test_labels_padded_to_longest_id() {
        let chart = GanttChart::from_history(&history(&[Some("A"), Some("LONG")]), &[]);
        let text = chart.render_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "A    |█·|");
        assert_eq!(lines[1], "LONG |·█|");
        assert_eq!(lines[2], "      0");
    }

    #[test]
    fn test_ruler_spacing() {
        assert_eq!(ruler(0), "0");
        assert_eq!(ruler(12), "0    5    10");
        assert_eq!(ruler(15), "0    5    10   15");
    }
}
