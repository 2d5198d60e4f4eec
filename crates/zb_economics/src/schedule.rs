//! Allocation schedule
//!
//! The fixed registry of allocation categories and the per-category monthly
//! release series derived from it. The schedule does not depend on any
//! scenario parameter and is computed once per release mode.

use crate::errors::ConfigError;
use crate::params::DEFAULT_SIGMOID_STEEPNESS;
use crate::types::{Month, MonthlySeries, TokenAmount, HORIZON_MONTHS};
use crate::vesting::{PhaseSegment, VestingShape};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// One row of the token allocation table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationCategory {
    pub name: String,
    pub total_tokens: TokenAmount,
    pub shape: VestingShape,
}

impl AllocationCategory {
    pub fn new(name: impl Into<String>, total_tokens: TokenAmount, shape: VestingShape) -> Self {
        Self {
            name: name.into(),
            total_tokens,
            shape,
        }
    }

    pub fn release(&self, month: Month) -> TokenAmount {
        self.shape.release(self.total_tokens, month)
    }

    pub fn releases(&self, horizon: Month) -> MonthlySeries {
        self.shape.releases(self.total_tokens, horizon)
    }

    fn validate(&self, horizon: Month) -> Result<(), ConfigError> {
        if !self.total_tokens.is_finite() || self.total_tokens < 0.0 {
            return Err(ConfigError::NegativeTotal {
                category: self.name.clone(),
                value: self.total_tokens,
            });
        }

        self.shape.validate(&self.name, horizon)?;

        if let VestingShape::PhasedSteps { segments } = &self.shape {
            let phased: TokenAmount = segments.iter().map(|s| s.amount).sum();
            let tol = 1e-9 * self.total_tokens.max(1.0);
            if (phased - self.total_tokens).abs() > tol {
                return Err(ConfigError::InvalidParameter {
                    param: "segments",
                    reason: format!(
                        "category {}: segments sum to {phased}, total is {}",
                        self.name, self.total_tokens
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Which release curve the cliff-vested categories follow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReleaseMode {
    #[default]
    Linear,
    Sigmoid { steepness: f64 },
}

impl ReleaseMode {
    pub fn sigmoid() -> Self {
        ReleaseMode::Sigmoid {
            steepness: DEFAULT_SIGMOID_STEEPNESS,
        }
    }

    /// Short name used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            ReleaseMode::Linear => "linear",
            ReleaseMode::Sigmoid { .. } => "sigmoid",
        }
    }
}

impl fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseMode::Linear => write!(f, "Linear"),
            ReleaseMode::Sigmoid { .. } => write!(f, "Sigmoid"),
        }
    }
}

/// The default eight-category token allocation (950M ZB allocated).
pub fn default_categories() -> Vec<AllocationCategory> {
    vec![
        AllocationCategory::new(
            "team_advisor",
            200_000_000.0,
            VestingShape::CliffLinear {
                lock_months: 12,
                release_months: 48,
            },
        ),
        AllocationCategory::new(
            "seed",
            100_000_000.0,
            VestingShape::CliffLinear {
                lock_months: 12,
                release_months: 24,
            },
        ),
        AllocationCategory::new(
            "a_round",
            50_000_000.0,
            VestingShape::CliffLinear {
                lock_months: 6,
                release_months: 18,
            },
        ),
        AllocationCategory::new(
            "airdrop_liquidity",
            100_000_000.0,
            VestingShape::OneTimeAtMonth { month: 1 },
        ),
        AllocationCategory::new(
            "eco_fund",
            50_000_000.0,
            VestingShape::FlatLinear { months: 60 },
        ),
        AllocationCategory::new(
            "mining",
            50_000_000.0,
            VestingShape::PhasedSteps {
                segments: vec![
                    PhaseSegment::new(1, 12, 30_000_000.0),
                    PhaseSegment::new(13, 24, 20_000_000.0),
                ],
            },
        ),
        AllocationCategory::new(
            "early_staking",
            100_000_000.0,
            VestingShape::OneTimeAtMonth { month: 1 },
        ),
        AllocationCategory::new(
            "node_staking",
            300_000_000.0,
            VestingShape::FlatLinear { months: 60 },
        ),
    ]
}

/// Validated, ordered set of allocation categories over a fixed horizon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationSchedule {
    categories: Vec<AllocationCategory>,
    horizon: Month,
}

impl AllocationSchedule {
    /// Validate `categories` against `horizon` and build the schedule.
    pub fn new(categories: Vec<AllocationCategory>, horizon: Month) -> Result<Self, ConfigError> {
        if horizon == 0 {
            return Err(ConfigError::InvalidParameter {
                param: "horizon_months",
                reason: "must be greater than 0".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.name.as_str()) {
                return Err(ConfigError::DuplicateCategory(category.name.clone()));
            }
            category.validate(horizon)?;
        }

        debug!(
            categories = categories.len(),
            horizon, "allocation schedule validated"
        );
        Ok(Self {
            categories,
            horizon,
        })
    }

    /// Default allocation table over the 60-month horizon, in `mode`.
    pub fn default_with_mode(mode: ReleaseMode) -> Result<Self, ConfigError> {
        Self::new(default_categories(), HORIZON_MONTHS)?.with_mode(mode)
    }

    /// Re-shape every cliff category for `mode`, leaving the other rows as is.
    pub fn with_mode(&self, mode: ReleaseMode) -> Result<Self, ConfigError> {
        let categories = self
            .categories
            .iter()
            .map(|c| AllocationCategory {
                shape: match mode {
                    ReleaseMode::Linear => c.shape.to_linear(),
                    ReleaseMode::Sigmoid { steepness } => c.shape.to_sigmoid(steepness),
                },
                ..c.clone()
            })
            .collect();
        Self::new(categories, self.horizon)
    }

    pub fn categories(&self) -> &[AllocationCategory] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&AllocationCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn horizon(&self) -> Month {
        self.horizon
    }

    /// Sum of every category's `total_tokens`.
    pub fn allocated_total(&self) -> TokenAmount {
        self.categories.iter().map(|c| c.total_tokens).sum()
    }

    /// Ordered `name -> monthly release` mapping.
    pub fn schedule(&self) -> Vec<(String, MonthlySeries)> {
        self.categories
            .iter()
            .map(|c| (c.name.clone(), c.releases(self.horizon)))
            .collect()
    }
}
