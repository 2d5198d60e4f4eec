//! Core types for the ZB supply model
//!
//! Defines the month index, token amounts, per-month series and the
//! per-scenario supply trajectory produced by the simulator.

use serde::{Deserialize, Serialize};

/// Simulation tick, 1-based at every public boundary.
pub type Month = u32;

/// Token amount in whole ZB (fractional values are allowed).
pub type TokenAmount = f64;

/// Amount in the quote currency (USDT).
pub type QuoteAmount = f64;

pub const MONTHS_PER_YEAR: Month = 12;
pub const YEARS: Month = 5;

/// Fixed simulation horizon: 5 years of monthly ticks.
pub const HORIZON_MONTHS: Month = YEARS * MONTHS_PER_YEAR;

/// Ordered per-month amounts. Index 0 holds month 1.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySeries(Vec<TokenAmount>);

impl MonthlySeries {
    /// All-zero series covering `horizon` months.
    pub fn zeros(horizon: Month) -> Self {
        Self(vec![0.0; horizon as usize])
    }

    /// Build a series by evaluating `f` for every month in `1..=horizon`.
    pub fn from_fn<F>(horizon: Month, f: F) -> Self
    where
        F: FnMut(Month) -> TokenAmount,
    {
        Self((1..=horizon).map(f).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Amount for a 1-based month, `None` outside the series.
    pub fn get(&self, month: Month) -> Option<TokenAmount> {
        month
            .checked_sub(1)
            .and_then(|idx| self.0.get(idx as usize))
            .copied()
    }

    pub fn total(&self) -> TokenAmount {
        self.0.iter().sum()
    }

    /// Running sum, same length as the series.
    pub fn cumulative(&self) -> Vec<TokenAmount> {
        self.0
            .iter()
            .scan(0.0, |acc, v| {
                *acc += v;
                Some(*acc)
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenAmount> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[TokenAmount] {
        &self.0
    }

    pub(crate) fn add_assign(&mut self, other: &MonthlySeries) {
        for (lhs, rhs) in self.0.iter_mut().zip(other.0.iter()) {
            *lhs += rhs;
        }
    }
}

impl From<Vec<TokenAmount>> for MonthlySeries {
    fn from(values: Vec<TokenAmount>) -> Self {
        Self(values)
    }
}

/// Identifies one (revenue, fdv) pair of the scenario grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioKey {
    pub revenue_label: String,
    pub revenue_value: QuoteAmount,
    pub fdv_label: String,
    pub fdv_value: QuoteAmount,
}

impl ScenarioKey {
    pub fn new(
        revenue_label: impl Into<String>,
        revenue_value: QuoteAmount,
        fdv_label: impl Into<String>,
        fdv_value: QuoteAmount,
    ) -> Self {
        Self {
            revenue_label: revenue_label.into(),
            revenue_value,
            fdv_label: fdv_label.into(),
            fdv_value,
        }
    }

    /// True when both labels match.
    pub fn matches(&self, revenue_label: &str, fdv_label: &str) -> bool {
        self.revenue_label == revenue_label && self.fdv_label == fdv_label
    }
}

/// State after one simulated month.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupplyPoint {
    pub month: Month,
    /// Tokens issued by the schedule this month (before burn).
    pub issued: TokenAmount,
    /// Tokens removed by buyback-and-burn this month.
    pub burned: TokenAmount,
    pub circulating_supply: TokenAmount,
    /// Month-over-month change in percent. Month 1 is 0 by convention.
    pub inflation_rate: f64,
}

impl SupplyPoint {
    pub fn net_change(&self) -> TokenAmount {
        self.issued - self.burned
    }
}

/// Supply and inflation path for a single scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SupplyTrajectory {
    pub key: ScenarioKey,
    pub points: Vec<SupplyPoint>,
}

impl SupplyTrajectory {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn final_supply(&self) -> TokenAmount {
        self.points.last().map_or(0.0, |p| p.circulating_supply)
    }

    pub fn final_inflation(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.inflation_rate)
    }

    pub fn supply_series(&self) -> Vec<TokenAmount> {
        self.points.iter().map(|p| p.circulating_supply).collect()
    }

    pub fn inflation_series(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.inflation_rate).collect()
    }

    pub fn min_supply(&self) -> TokenAmount {
        self.points
            .iter()
            .map(|p| p.circulating_supply)
            .fold(f64::INFINITY, f64::min)
    }

    /// First month whose closing supply is below zero, if any.
    pub fn first_negative_month(&self) -> Option<Month> {
        self.points
            .iter()
            .find(|p| p.circulating_supply < 0.0)
            .map(|p| p.month)
    }

    pub fn point(&self, month: Month) -> Option<&SupplyPoint> {
        month
            .checked_sub(1)
            .and_then(|idx| self.points.get(idx as usize))
    }
}
