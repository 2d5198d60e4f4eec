//! Scenario grids and the runner evaluating their Cartesian product

use crate::errors::ConfigError;
use crate::params::BurnPolicy;
use crate::supply::{simulate, validate_scenario};
use crate::types::{MonthlySeries, QuoteAmount, ScenarioKey, SupplyTrajectory};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// A labelled scenario value, e.g. `("Baseline", 3e8)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridEntry {
    pub label: String,
    pub value: QuoteAmount,
}

/// Ordered `label -> value` list. Insertion order drives iteration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioGrid {
    entries: Vec<GridEntry>,
}

impl ScenarioGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from `(label, value)` pairs, rejecting duplicate labels.
    pub fn from_pairs<I, L>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (L, QuoteAmount)>,
        L: Into<String>,
    {
        let mut grid = Self::new();
        for (label, value) in pairs {
            grid.push(label, value)?;
        }
        Ok(grid)
    }

    pub fn push(&mut self, label: impl Into<String>, value: QuoteAmount) -> Result<(), ConfigError> {
        let label = label.into();
        if self.entries.iter().any(|e| e.label == label) {
            return Err(ConfigError::DuplicateLabel(label));
        }
        self.entries.push(GridEntry { label, value });
        Ok(())
    }

    /// Monthly network revenue scenarios in USDT.
    pub fn default_revenue() -> Self {
        Self {
            entries: vec![
                entry("500k", 500_000.0),
                entry("1M", 1_000_000.0),
                entry("5M", 5_000_000.0),
                entry("10M", 10_000_000.0),
            ],
        }
    }

    /// Valuation scenarios in USDT: 5x down, baseline, 5x up.
    pub fn default_fdv() -> Self {
        Self {
            entries: vec![
                entry("Down5x", 60e6),
                entry("Baseline", 300e6),
                entry("Up5x", 1500e6),
            ],
        }
    }

    pub fn entries(&self) -> &[GridEntry] {
        &self.entries
    }

    pub fn get(&self, label: &str) -> Option<QuoteAmount> {
        self.entries.iter().find(|e| e.label == label).map(|e| e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ensure_unique(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for e in &self.entries {
            if !seen.insert(e.label.as_str()) {
                return Err(ConfigError::DuplicateLabel(e.label.clone()));
            }
        }
        Ok(())
    }
}

fn entry(label: &str, value: QuoteAmount) -> GridEntry {
    GridEntry {
        label: label.to_string(),
        value,
    }
}

/// Trajectories for every grid pair, in revenue-major order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResults {
    pub trajectories: Vec<SupplyTrajectory>,
}

impl ScenarioResults {
    pub fn get(&self, revenue_label: &str, fdv_label: &str) -> Option<&SupplyTrajectory> {
        self.trajectories
            .iter()
            .find(|t| t.key.matches(revenue_label, fdv_label))
    }

    /// Find the scenario by its numeric values rather than labels.
    pub fn find_by_values(&self, revenue: QuoteAmount, fdv: QuoteAmount) -> Option<&SupplyTrajectory> {
        self.trajectories
            .iter()
            .find(|t| t.key.revenue_value == revenue && t.key.fdv_value == fdv)
    }

    /// Group trajectories by revenue label, preserving grid order.
    pub fn by_revenue(&self) -> Vec<(&str, Vec<&SupplyTrajectory>)> {
        let mut groups: Vec<(&str, Vec<&SupplyTrajectory>)> = Vec::new();
        for t in &self.trajectories {
            match groups.iter_mut().find(|(label, _)| *label == t.key.revenue_label) {
                Some((_, group)) => group.push(t),
                None => groups.push((t.key.revenue_label.as_str(), vec![t])),
            }
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SupplyTrajectory> {
        self.trajectories.iter()
    }
}

/// Runs the supply simulation for every (revenue, fdv) pair.
#[derive(Clone, Debug)]
pub struct ScenarioRunner {
    revenue: ScenarioGrid,
    fdv: ScenarioGrid,
    burn: BurnPolicy,
}

impl ScenarioRunner {
    /// Validate both grids up front so no pair is simulated when any pair is
    /// invalid.
    pub fn new(revenue: ScenarioGrid, fdv: ScenarioGrid, burn: BurnPolicy) -> Result<Self, ConfigError> {
        if revenue.is_empty() {
            return Err(ConfigError::EmptyGrid("revenue"));
        }
        if fdv.is_empty() {
            return Err(ConfigError::EmptyGrid("fdv"));
        }
        revenue.ensure_unique()?;
        fdv.ensure_unique()?;
        burn.validate()?;

        let runner = Self { revenue, fdv, burn };
        for key in runner.keys() {
            validate_scenario(&key)?;
        }
        Ok(runner)
    }

    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(
            ScenarioGrid::default_revenue(),
            ScenarioGrid::default_fdv(),
            BurnPolicy::default(),
        )
    }

    pub fn revenue_grid(&self) -> &ScenarioGrid {
        &self.revenue
    }

    pub fn fdv_grid(&self) -> &ScenarioGrid {
        &self.fdv
    }

    pub fn burn(&self) -> &BurnPolicy {
        &self.burn
    }

    /// Cartesian product of the grids: outer revenue, inner fdv.
    pub fn keys(&self) -> Vec<ScenarioKey> {
        self.revenue
            .entries()
            .iter()
            .flat_map(|rev| {
                self.fdv.entries().iter().map(move |fdv| {
                    ScenarioKey::new(rev.label.clone(), rev.value, fdv.label.clone(), fdv.value)
                })
            })
            .collect()
    }

    /// Simulate every pair sequentially.
    pub fn run(&self, total_issuance: &MonthlySeries) -> Result<ScenarioResults, ConfigError> {
        let trajectories = self
            .keys()
            .into_iter()
            .map(|key| simulate(total_issuance, key, &self.burn))
            .collect::<Result<Vec<_>, _>>()?;

        info!(scenarios = trajectories.len(), "scenario grid evaluated");
        Ok(ScenarioResults { trajectories })
    }

    /// Simulate every pair on the rayon pool. Results come back in the same
    /// order as [`ScenarioRunner::run`].
    pub fn run_parallel(&self, total_issuance: &MonthlySeries) -> Result<ScenarioResults, ConfigError> {
        let trajectories = self
            .keys()
            .into_par_iter()
            .map(|key| simulate(total_issuance, key, &self.burn))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            scenarios = trajectories.len(),
            threads = rayon::current_num_threads(),
            "scenario grid evaluated in parallel"
        );
        Ok(ScenarioResults { trajectories })
    }
}
