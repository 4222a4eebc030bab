//! Stacked-bar trend chart over history.
//!
//! One bar per snapshot in chronological order: passed at the bottom,
//! failed stacked above it, skipped on top. The category axis carries the
//! per-snapshot ISO-week labels. Skipped uses the display semantics, i.e.
//! the `executed` on-disk counter.

use std::path::Path;

use plotters::prelude::*;

use crate::aggregate::Totals;

const CHART_SIZE: (u32, u32) = (900, 600);
const PASSED_COLOR: RGBColor = GREEN;
const FAILED_COLOR: RGBColor = RED;
const SKIPPED_COLOR: RGBColor = YELLOW;

/// Displayed skip count for one snapshot's totals.
fn skipped(totals: &Totals) -> u64 {
    totals.executed
}

fn bar(
    index: usize,
    from: u64,
    to: u64,
    color: RGBColor,
) -> Rectangle<(SegmentValue<usize>, u64)> {
    Rectangle::new(
        [
            (SegmentValue::Exact(index), from),
            (SegmentValue::Exact(index + 1), to),
        ],
        color.filled(),
    )
}

/// Render the trend chart to `path`.
///
/// `totals` and `week_labels` are parallel, oldest first. Called only with
/// two or more snapshots.
pub fn render(
    path: &Path,
    totals: &[Totals],
    week_labels: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    if totals.is_empty() {
        return Err("trend chart: no totals to plot".into());
    }
    if totals.len() != week_labels.len() {
        return Err("trend chart: totals and week labels out of step".into());
    }

    let bars = totals.len();
    let tallest = totals
        .iter()
        .map(|t| t.passed + t.failed + skipped(t))
        .max()
        .unwrap_or(0);
    let y_max = tallest + tallest / 10 + 1;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Test results per week", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..bars).into_segmented(), 0u64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars)
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(i) => week_labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Week")
        .y_desc("Tests")
        .draw()?;

    chart
        .draw_series(
            totals
                .iter()
                .enumerate()
                .map(|(i, t)| bar(i, 0, t.passed, PASSED_COLOR)),
        )?
        .label("Passed")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], PASSED_COLOR.filled()));

    chart
        .draw_series(
            totals
                .iter()
                .enumerate()
                .map(|(i, t)| bar(i, t.passed, t.passed + t.failed, FAILED_COLOR)),
        )?
        .label("Failed")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], FAILED_COLOR.filled()));

    chart
        .draw_series(totals.iter().enumerate().map(|(i, t)| {
            let base = t.passed + t.failed;
            bar(i, base, base + skipped(t), SKIPPED_COLOR)
        }))?
        .label("Skipped")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], SKIPPED_COLOR.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(passed: u64, failed: u64, executed: u64) -> Totals {
        Totals {
            passed,
            failed,
            executed,
            total: passed + failed,
            skipped: 0,
        }
    }

    #[test]
    fn writes_png_for_two_snapshots() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("barchart_100.png");

        let series = [totals(20, 3, 5), totals(22, 1, 4)];
        let labels = vec!["23w45".to_string(), "23w46".to_string()];
        render(&path, &series, &labels).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn mismatched_labels_are_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("barchart.png");

        let series = [totals(1, 0, 0)];
        let err = render(&path, &series, &[]).unwrap_err();
        assert!(err.to_string().contains("out of step"));
    }
}
