//! Aggregation of per-category releases into a single issuance series

use crate::schedule::AllocationSchedule;
use crate::types::{Month, MonthlySeries, TokenAmount};
use serde::{Deserialize, Serialize};

/// Per-category monthly releases plus their elementwise total.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IssuanceSeries {
    pub per_category: Vec<(String, MonthlySeries)>,
    pub total: MonthlySeries,
}

impl IssuanceSeries {
    pub fn horizon(&self) -> Month {
        self.total.len() as Month
    }

    pub fn category(&self, name: &str) -> Option<&MonthlySeries> {
        self.per_category
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    /// Ordered `(name, 60-month sum)` pairs, before any burn.
    pub fn category_totals(&self) -> Vec<(String, TokenAmount)> {
        self.per_category
            .iter()
            .map(|(name, series)| (name.clone(), series.total()))
            .collect()
    }

    pub fn grand_total(&self) -> TokenAmount {
        self.total.total()
    }
}

/// Sum every category series of `schedule` month by month.
pub fn aggregate(schedule: &AllocationSchedule) -> IssuanceSeries {
    let per_category = schedule.schedule();
    let mut total = MonthlySeries::zeros(schedule.horizon());
    for (_, series) in &per_category {
        total.add_assign(series);
    }

    IssuanceSeries {
        per_category,
        total,
    }
}
