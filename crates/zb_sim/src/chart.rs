//! Inflation-rate charts
//!
//! One panel per revenue scenario, one line per FDV scenario, rendered into
//! an RGB buffer and saved as PNG.

use plotters::prelude::*;
use std::path::Path;
use zb_economics::report::chart_title;
use zb_economics::{ReleaseMode, ScenarioResults, SupplyTrajectory};

const PANEL_WIDTH: u32 = 1000;
const PANEL_HEIGHT: u32 = 600;

pub type ChartResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Draw every revenue group of `results` into a PNG at `path`.
pub fn render_inflation_chart(path: &Path, mode: ReleaseMode, results: &ScenarioResults) -> ChartResult<()> {
    let groups = results.by_revenue();
    if groups.is_empty() {
        return Err("no scenarios to plot".into());
    }

    let width = PANEL_WIDTH;
    let height = PANEL_HEIGHT * groups.len() as u32;
    let mut buf = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        let panels = root.split_evenly((groups.len(), 1));

        for (panel, (revenue_label, trajectories)) in panels.iter().zip(groups.iter()) {
            draw_panel(panel, &chart_title(mode, revenue_label), trajectories)?;
        }
        root.present()?;
    }

    image::save_buffer(path, &buf, width, height, image::ColorType::Rgb8)?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    title: &str,
    trajectories: &[&SupplyTrajectory],
) -> ChartResult<()>
where
    DB::ErrorType: 'static,
{
    let months = trajectories.iter().map(|t| t.len()).max().unwrap_or(1).max(2) as f64;
    let (y_min, y_max) = inflation_bounds(trajectories);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(1f64..months, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Inflation Rate (%)")
        .draw()?;

    for (idx, trajectory) in trajectories.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points = trajectory
            .points
            .iter()
            .filter(|p| p.inflation_rate.is_finite())
            .map(|p| (f64::from(p.month), p.inflation_rate));

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(format!("FDV: {}", trajectory.key.fdv_label))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Y range covering every finite inflation value, with a little headroom.
fn inflation_bounds(trajectories: &[&SupplyTrajectory]) -> (f64, f64) {
    let (lo, hi) = trajectories
        .iter()
        .flat_map(|t| t.points.iter())
        .map(|p| p.inflation_rate)
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }

    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad, hi + pad)
}
