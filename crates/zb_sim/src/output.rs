//! Persisted artifacts: text report, trajectory CSV and JSON summary

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;
use zb_economics::{IssuanceSeries, Month, ReleaseMode, ScenarioResults, TokenAmount};

/// File names produced for one release mode.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub chart: PathBuf,
    pub report: PathBuf,
    pub csv: PathBuf,
    pub json: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: &Path, mode: ReleaseMode) -> Self {
        let slug = mode.slug();
        Self {
            chart: dir.join(format!("{slug}_inflation_rates.png")),
            report: dir.join(format!("{slug}_simulation_results.txt")),
            csv: dir.join(format!("{slug}_trajectories.csv")),
            json: dir.join(format!("{slug}_summary.json")),
        }
    }
}

pub fn write_report(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("Failed to write report {}", path.display()))?;
    info!("Report saved → {}", path.display());
    Ok(())
}

/// One row per (scenario, month).
pub fn write_trajectories_csv(path: &Path, results: &ScenarioResults) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record([
        "revenue_label",
        "fdv_label",
        "month",
        "issued",
        "burned",
        "circulating_supply",
        "inflation_rate",
    ])?;

    for trajectory in results.iter() {
        for p in &trajectory.points {
            writer.write_record([
                trajectory.key.revenue_label.clone(),
                trajectory.key.fdv_label.clone(),
                p.month.to_string(),
                format!("{:.6}", p.issued),
                format!("{:.6}", p.burned),
                format!("{:.6}", p.circulating_supply),
                format!("{:.6}", p.inflation_rate),
            ])?;
        }
    }
    writer.flush()?;
    info!("Trajectories saved → {}", path.display());
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub total: TokenAmount,
}

#[derive(Debug, Serialize)]
pub struct ScenarioSummary {
    pub revenue_label: String,
    pub revenue_value: f64,
    pub fdv_label: String,
    pub fdv_value: f64,
    pub final_supply: TokenAmount,
    pub final_inflation: f64,
    pub min_supply: TokenAmount,
    pub first_negative_month: Option<Month>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub mode: ReleaseMode,
    pub horizon_months: Month,
    pub allocated_total: TokenAmount,
    pub categories: Vec<CategorySummary>,
    pub scenarios: Vec<ScenarioSummary>,
}

impl RunSummary {
    pub fn new(mode: ReleaseMode, issuance: &IssuanceSeries, results: &ScenarioResults) -> Self {
        let categories = issuance
            .category_totals()
            .into_iter()
            .map(|(name, total)| CategorySummary { name, total })
            .collect();

        let scenarios = results
            .iter()
            .map(|t| ScenarioSummary {
                revenue_label: t.key.revenue_label.clone(),
                revenue_value: t.key.revenue_value,
                fdv_label: t.key.fdv_label.clone(),
                fdv_value: t.key.fdv_value,
                final_supply: t.final_supply(),
                final_inflation: t.final_inflation(),
                min_supply: t.min_supply(),
                first_negative_month: t.first_negative_month(),
            })
            .collect();

        Self {
            mode,
            horizon_months: issuance.horizon(),
            allocated_total: issuance.grand_total(),
            categories,
            scenarios,
        }
    }
}

pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)?;
    info!("Summary saved → {}", path.display());
    Ok(())
}
