//! Simulation configuration file
//!
//! Every section is optional; anything left out falls back to the built-in
//! allocation parameters and scenario grids.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use zb_economics::{ScenarioGrid, ScenarioRunner, SimulationParams};

/// Environment variable overriding the output directory.
pub const OUTPUT_DIR_ENV: &str = "ZB_SIM_OUTPUT_DIR";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub simulation: SimulationParams,
    /// Monthly revenue scenarios, USDT
    pub revenue: Option<ScenarioGrid>,
    /// FDV scenarios, USDT
    pub fdv: Option<ScenarioGrid>,
}

impl SimConfig {
    /// Load from `path`, or use defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        info!("Loading configuration from: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(content)?;
        config.simulation.validate()?;
        Ok(config)
    }

    pub fn revenue_grid(&self) -> ScenarioGrid {
        self.revenue.clone().unwrap_or_else(ScenarioGrid::default_revenue)
    }

    pub fn fdv_grid(&self) -> ScenarioGrid {
        self.fdv.clone().unwrap_or_else(ScenarioGrid::default_fdv)
    }

    /// Validated runner for the configured grids and burn policy.
    pub fn runner(&self) -> Result<ScenarioRunner> {
        let runner = ScenarioRunner::new(
            self.revenue_grid(),
            self.fdv_grid(),
            self.simulation.burn.clone(),
        )?;
        Ok(runner)
    }
}

/// Output directory: CLI flag, then `ZB_SIM_OUTPUT_DIR`, then the working
/// directory.
pub fn resolve_output_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(OUTPUT_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}
