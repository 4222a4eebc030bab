//! Timing-sample charts: per-function runtime histograms and a combined
//! scatter plot with mean/median overlays.
//!
//! This mode is independent of snapshot history. Each input file holds one
//! integer nanosecond sample per line; the file stem names the measured
//! function. Output: one `<stem>.png` histogram per file plus a shared
//! `scatter.png`.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (900, 600);
const HIST_BINS: u64 = 100;

/// One file's samples, kept sorted for the median.
#[derive(Debug)]
struct SampleSet {
    name: String,
    samples: Vec<u64>,
}

/// Arithmetic mean.
pub fn mean(samples: &[u64]) -> f64 {
    let sum: u64 = samples.iter().sum();
    sum as f64 / samples.len() as f64
}

/// Median of a sorted slice; midpoint average for even counts.
pub fn median(sorted: &[u64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
    }
}

fn load_samples(path: &Path) -> Result<SampleSet, Box<dyn std::error::Error>> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| format!("{}: not a sample file name", path.display()))?;

    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let mut samples = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let sample: u64 = line
            .parse()
            .map_err(|_| format!("{}: invalid sample line {:?}", path.display(), line))?;
        samples.push(sample);
    }

    if samples.is_empty() {
        return Err(format!("{}: no samples", path.display()).into());
    }

    samples.sort_unstable();
    Ok(SampleSet { name, samples })
}

/// Render one log-scaled runtime histogram for a sample set.
fn histogram(plots_dir: &Path, set: &SampleSet) -> Result<(), Box<dyn std::error::Error>> {
    let min = set.samples[0];
    let max = set.samples[set.samples.len() - 1];
    let bin_width = ((max - min) / HIST_BINS).max(1);

    let mut counts = vec![0u64; HIST_BINS as usize];
    for &sample in &set.samples {
        let bin = ((sample - min) / bin_width).min(HIST_BINS - 1) as usize;
        counts[bin] += 1;
    }
    let peak = counts.iter().copied().max().unwrap_or(1);

    let x_min = min as f64;
    let x_max = (min + bin_width * HIST_BINS) as f64;

    let path = plots_dir.join(format!("{}.png", set.name));
    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Runtime histogram for {}", set.name), ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, (0.5f64..peak as f64 * 1.3).log_scale())?;

    chart
        .configure_mesh()
        .x_desc("Runtime (nsecs)")
        .y_desc("Number of samples")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().filter(|(_, &c)| c > 0).map(|(bin, &count)| {
        let x0 = (min + bin as u64 * bin_width) as f64;
        let x1 = (min + (bin as u64 + 1) * bin_width) as f64;
        Rectangle::new([(x0, 0.5), (x1, count as f64)], BLUE.filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Render the combined scatter plot across all sample sets, with per-set
/// mean and median overlays.
fn scatter(plots_dir: &Path, sets: &[SampleSet]) -> Result<(), Box<dyn std::error::Error>> {
    let files = sets.len();
    let highest = sets
        .iter()
        .flat_map(|s| s.samples.last().copied())
        .max()
        .unwrap_or(1);
    let y_max = highest as f64 * 1.05;

    let path = plots_dir.join("scatter.png");
    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Runtime scatter plot per function", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d((0..files).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(files)
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(i) => sets.get(*i).map(|s| s.name.clone()).unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Function")
        .y_desc("Runtime (nsecs)")
        .draw()?;

    chart
        .draw_series(sets.iter().enumerate().flat_map(|(i, set)| {
            set.samples
                .iter()
                .map(move |&v| Circle::new((SegmentValue::CenterOf(i), v as f64), 2, BLUE.mix(0.4).filled()))
        }))?
        .label("Sample")
        .legend(|(x, y)| Circle::new((x + 5, y), 3, BLUE.filled()));

    chart
        .draw_series(
            sets.iter()
                .enumerate()
                .map(|(i, set)| Circle::new((SegmentValue::CenterOf(i), mean(&set.samples)), 4, RED.filled())),
        )?
        .label("Mean")
        .legend(|(x, y)| Circle::new((x + 5, y), 3, RED.filled()));

    chart
        .draw_series(
            sets.iter()
                .enumerate()
                .map(|(i, set)| Circle::new((SegmentValue::CenterOf(i), median(&set.samples)), 4, GREEN.filled())),
        )?
        .label("Median")
        .legend(|(x, y)| Circle::new((x + 5, y), 3, GREEN.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Render every histogram plus the shared scatter plot into `plots_dir`.
pub fn run(plots_dir: &Path, files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    if files.is_empty() {
        return Err("timings: no sample files given".into());
    }

    fs::create_dir_all(plots_dir).map_err(|e| format!("{}: {}", plots_dir.display(), e))?;

    let sets = files
        .iter()
        .map(|path| load_samples(path))
        .collect::<Result<Vec<_>, _>>()?;

    for set in &sets {
        histogram(plots_dir, set)?;
    }
    scatter(plots_dir, &sets)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mean_of_uniform_samples() {
        assert_eq!(mean(&[5, 5, 5]), 5.0);
        assert_eq!(mean(&[1, 2, 3, 4]), 2.5);
    }

    #[test]
    fn median_odd_and_even_counts() {
        assert_eq!(median(&[1, 3, 9]), 3.0);
        assert_eq!(median(&[1, 3, 5, 9]), 4.0);
        assert_eq!(median(&[7]), 7.0);
    }

    #[test]
    fn load_samples_sorts_and_names() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("aes_encrypt.txt");
        fs::write(&path, "300\n100\n200\n").unwrap();

        let set = load_samples(&path).unwrap();
        assert_eq!(set.name, "aes_encrypt");
        assert_eq!(set.samples, vec![100, 200, 300]);
    }

    #[test]
    fn invalid_sample_line_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.txt");
        fs::write(&path, "100\nfast\n").unwrap();

        let err = load_samples(&path).unwrap_err();
        assert!(err.to_string().contains("invalid sample line"));
    }

    #[test]
    fn empty_sample_file_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        assert!(load_samples(&path).is_err());
    }

    #[test]
    fn run_writes_histograms_and_scatter() {
        let tmp = tempfile::tempdir().unwrap();
        let plots = tmp.path().join("plots");

        let mut files = Vec::new();
        for (name, base) in [("sha256", 100u64), ("rsa_sign", 5000)] {
            let path = tmp.path().join(format!("{name}.txt"));
            let mut f = fs::File::create(&path).unwrap();
            for i in 0..50 {
                writeln!(f, "{}", base + i * 7).unwrap();
            }
            files.push(path);
        }

        run(&plots, &files).unwrap();

        assert!(plots.join("sha256.png").exists());
        assert!(plots.join("rsa_sign.png").exists());
        assert!(plots.join("scatter.png").exists());
    }
}
