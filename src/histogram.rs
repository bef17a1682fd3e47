// Rating histogram: ten unit-width bins over 0..=10

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const BIN_COUNT: usize = 10;
const MAX_RATING: f64 = 10.0;

const CHART_WIDTH: usize = 640;
const CHART_HEIGHT: usize = 400;
const MARGIN: usize = 50;

#[derive(Debug, Error)]
pub enum HistogramError {
    #[error("failed to write histogram {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingHistogram {
    counts: [usize; BIN_COUNT],
}

impl RatingHistogram {
    /// Bin `ratings`; values outside 0..=10 are clamped, 10.0 lands in the last bin
    pub fn from_ratings<I: IntoIterator<Item = f64>>(ratings: I) -> Self {
        let mut counts = [0; BIN_COUNT];
        for rating in ratings {
            if rating.is_nan() {
                continue;
            }
            let clamped = rating.clamp(0.0, MAX_RATING);
            let bin = (clamped.floor() as usize).min(BIN_COUNT - 1);
            counts[bin] += 1;
        }
        Self { counts }
    }

    pub fn counts(&self) -> &[usize; BIN_COUNT] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// One line per bin, e.g. ` 8- 9 | ### 3`
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (bin, count) in self.counts.iter().enumerate() {
            let _ = writeln!(out, "{:>2}-{:>2} | {} {}", bin, bin + 1, "#".repeat(*count), count);
        }
        out
    }

    /// Standalone SVG bar chart
    pub fn render_svg(&self, title: &str) -> String {
        let plot_width = CHART_WIDTH - 2 * MARGIN;
        let plot_height = CHART_HEIGHT - 2 * MARGIN;
        let bar_width = plot_width / BIN_COUNT;
        let max_count = self.counts.iter().copied().max().unwrap_or(0).max(1);

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CHART_WIDTH}" height="{CHART_HEIGHT}" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}">"#
        );
        let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{}" text-anchor="middle" font-size="18">{}</text>"#,
            CHART_WIDTH / 2,
            MARGIN / 2,
            crate::site::escape_html(title)
        );

        for (bin, count) in self.counts.iter().enumerate() {
            let height = count * plot_height / max_count;
            let x = MARGIN + bin * bar_width;
            let y = MARGIN + plot_height - height;
            let _ = writeln!(
                svg,
                r#"  <rect x="{x}" y="{y}" width="{bar_width}" height="{height}" fill="steelblue" stroke="black"/>"#
            );
            let _ = writeln!(
                svg,
                r#"  <text x="{}" y="{}" text-anchor="middle" font-size="12">{bin}</text>"#,
                x,
                MARGIN + plot_height + 15
            );
        }

        let axis_y = MARGIN + plot_height;
        let _ = writeln!(
            svg,
            r#"  <line x1="{MARGIN}" y1="{axis_y}" x2="{}" y2="{axis_y}" stroke="black"/>"#,
            MARGIN + plot_width
        );
        let _ = writeln!(
            svg,
            r#"  <line x1="{MARGIN}" y1="{MARGIN}" x2="{MARGIN}" y2="{axis_y}" stroke="black"/>"#
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{}" text-anchor="middle" font-size="14">Rating</text>"#,
            CHART_WIDTH / 2,
            CHART_HEIGHT - 10
        );
        let _ = writeln!(
            svg,
            r#"  <text x="15" y="{}" text-anchor="middle" font-size="14" transform="rotate(-90 15 {})">Frequency</text>"#,
            CHART_HEIGHT / 2,
            CHART_HEIGHT / 2
        );
        svg.push_str("</svg>\n");
        svg
    }

    pub fn save_svg(&self, path: &Path, title: &str) -> Result<(), HistogramError> {
        let to_error = |source| HistogramError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(to_error)?;
        }
        fs::write(path, self.render_svg(title)).map_err(to_error)?;
        info!("Histogram saved to {}", path.display());
        Ok(())
    }
}
