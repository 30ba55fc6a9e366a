use std::path::Path;

use anyhow::{Result, anyhow, bail};
use plotters::prelude::*;

use crate::model::RankedSong;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 600;
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

/// Renders a horizontal bar chart of the ranked songs, largest at the top,
/// overwriting `output_path`.
pub(crate) fn render(songs: &[RankedSong], output_path: &Path) -> Result<()> {
    if songs.is_empty() {
        bail!("no rows available to chart");
    }

    let labels: Vec<String> = songs.iter().map(bar_label).collect();
    let slots = songs.len() as i32;
    let largest = songs
        .iter()
        .map(|song| song.streams)
        .fold(0.0_f64, f64::max);
    let x_max = if largest > 0.0 { largest * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(output_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|err| anyhow!("failed to clear chart background: {err}"))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Top 10 Most Streamed Songs on Spotify", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(320)
        .build_cartesian_2d(0.0..x_max, (0..slots).into_segmented())
        .map_err(|err| anyhow!("failed to build chart axes: {err}"))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Streams (Billions)")
        .y_labels(songs.len())
        .y_label_formatter(&|value| match value {
            SegmentValue::CenterOf(slot) => labels
                .get((slots - 1 - slot) as usize)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()
        .map_err(|err| anyhow!("failed to draw chart mesh: {err}"))?;

    // Row 0 holds the largest value; flip it to the top slot.
    chart
        .draw_series(songs.iter().enumerate().map(|(index, song)| {
            let slot = slots - 1 - index as i32;
            Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(slot)),
                    (song.streams, SegmentValue::Exact(slot + 1)),
                ],
                SKY_BLUE.filled(),
            )
        }))
        .map_err(|err| anyhow!("failed to draw chart bars: {err}"))?;

    root.present()
        .map_err(|err| anyhow!("failed to write chart to {}: {err}", output_path.display()))?;

    Ok(())
}

pub(crate) fn bar_label(song: &RankedSong) -> String {
    format!("{} - {}", song.song, song.artist)
}
