//! Vesting curves
//!
//! Every allocation category releases its tokens according to one
//! [`VestingShape`]. Shapes are pure: the amount for a month depends only on
//! the shape parameters, the category total and the month index.

use crate::errors::ConfigError;
use crate::types::{Month, MonthlySeries, TokenAmount};
use serde::{Deserialize, Serialize};

/// One phase of a [`VestingShape::PhasedSteps`] schedule.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseSegment {
    /// First month of the phase (inclusive, 1-based)
    pub start: Month,
    /// Last month of the phase (inclusive)
    pub end: Month,
    /// Tokens released evenly across the phase
    pub amount: TokenAmount,
}

impl PhaseSegment {
    pub fn new(start: Month, end: Month, amount: TokenAmount) -> Self {
        Self { start, end, amount }
    }

    pub fn months(&self) -> Month {
        self.end.saturating_sub(self.start).saturating_add(1)
    }

    pub fn contains(&self, month: Month) -> bool {
        (self.start..=self.end).contains(&month)
    }

    fn overlaps(&self, other: &PhaseSegment) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Release shape of an allocation category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum VestingShape {
    /// Nothing for `lock_months`, then an even share per month for
    /// `release_months`, then nothing.
    CliffLinear {
        lock_months: Month,
        release_months: Month,
    },
    /// Same window as `CliffLinear`, released along a normalised logistic curve.
    CliffSigmoid {
        lock_months: Month,
        release_months: Month,
        steepness: f64,
    },
    /// Everything unlocks in a single month.
    OneTimeAtMonth { month: Month },
    /// Even share per month over months `1..=months`.
    FlatLinear { months: Month },
    /// Independent phases, each releasing its own amount evenly.
    PhasedSteps { segments: Vec<PhaseSegment> },
}

impl VestingShape {
    /// Amount released in `month` for a category holding `total` tokens.
    ///
    /// Month 0 and months past every window release nothing.
    pub fn release(&self, total: TokenAmount, month: Month) -> TokenAmount {
        if month == 0 {
            return 0.0;
        }

        match self {
            VestingShape::CliffLinear {
                lock_months,
                release_months,
            } => {
                if *release_months == 0 {
                    return 0.0;
                }
                if month <= *lock_months || month > lock_months.saturating_add(*release_months) {
                    0.0
                } else {
                    total / f64::from(*release_months)
                }
            }
            VestingShape::CliffSigmoid {
                lock_months,
                release_months,
                steepness,
            } => {
                if *release_months == 0
                    || month <= *lock_months
                    || month > lock_months.saturating_add(*release_months)
                {
                    return 0.0;
                }
                let j = month - lock_months;
                let s_prev = sigmoid_point(*release_months, *steepness, j - 1);
                let s_curr = sigmoid_point(*release_months, *steepness, j);
                total * (s_curr - s_prev)
            }
            VestingShape::OneTimeAtMonth { month: unlock } => {
                if month == *unlock {
                    total
                } else {
                    0.0
                }
            }
            VestingShape::FlatLinear { months } => {
                if month <= *months {
                    total / f64::from(*months)
                } else {
                    0.0
                }
            }
            VestingShape::PhasedSteps { segments } => segments
                .iter()
                .find(|seg| seg.contains(month))
                .map_or(0.0, |seg| seg.amount / f64::from(seg.months())),
        }
    }

    /// Full per-month series over `1..=horizon`.
    ///
    /// The sigmoid curve is sampled once instead of per month.
    pub fn releases(&self, total: TokenAmount, horizon: Month) -> MonthlySeries {
        match self {
            VestingShape::CliffSigmoid {
                lock_months,
                release_months,
                steepness,
            } if *release_months > 0 => {
                let norm = sigmoid_cumulative(*release_months, *steepness);
                MonthlySeries::from_fn(horizon, |month| {
                    if month <= *lock_months || month > lock_months.saturating_add(*release_months) {
                        return 0.0;
                    }
                    let j = (month - lock_months) as usize;
                    total * (norm[j] - norm[j - 1])
                })
            }
            _ => MonthlySeries::from_fn(horizon, |month| self.release(total, month)),
        }
    }

    /// Last month in which this shape can release anything, saturating at
    /// `Month::MAX`.
    pub fn last_month(&self) -> Month {
        self.window_end().unwrap_or(Month::MAX)
    }

    /// Last release month, or `None` when `lock + release` overflows.
    fn window_end(&self) -> Option<Month> {
        match self {
            VestingShape::CliffLinear {
                lock_months,
                release_months,
            }
            | VestingShape::CliffSigmoid {
                lock_months,
                release_months,
                ..
            } => lock_months.checked_add(*release_months),
            VestingShape::OneTimeAtMonth { month } => Some(*month),
            VestingShape::FlatLinear { months } => Some(*months),
            VestingShape::PhasedSteps { segments } => {
                Some(segments.iter().map(|s| s.end).max().unwrap_or(0))
            }
        }
    }

    /// Swap a cliff-linear shape for its sigmoid equivalent. Other shapes are
    /// returned unchanged.
    pub fn to_sigmoid(&self, steepness: f64) -> VestingShape {
        match self {
            VestingShape::CliffLinear {
                lock_months,
                release_months,
            }
            | VestingShape::CliffSigmoid {
                lock_months,
                release_months,
                ..
            } => VestingShape::CliffSigmoid {
                lock_months: *lock_months,
                release_months: *release_months,
                steepness,
            },
            other => other.clone(),
        }
    }

    /// Swap a cliff-sigmoid shape back to cliff-linear.
    pub fn to_linear(&self) -> VestingShape {
        match self {
            VestingShape::CliffSigmoid {
                lock_months,
                release_months,
                ..
            } => VestingShape::CliffLinear {
                lock_months: *lock_months,
                release_months: *release_months,
            },
            other => other.clone(),
        }
    }

    /// Reject parameters that would break `sum(releases) == total` over
    /// `horizon` months.
    pub fn validate(&self, category: &str, horizon: Month) -> Result<(), ConfigError> {
        match self {
            VestingShape::CliffLinear { release_months, .. } => {
                if *release_months == 0 {
                    return Err(ConfigError::ZeroReleaseMonths {
                        category: category.to_string(),
                    });
                }
            }
            VestingShape::CliffSigmoid {
                release_months,
                steepness,
                ..
            } => {
                if *release_months == 0 {
                    return Err(ConfigError::ZeroReleaseMonths {
                        category: category.to_string(),
                    });
                }
                if !steepness.is_finite() || *steepness <= 0.0 {
                    return Err(ConfigError::InvalidSteepness {
                        category: category.to_string(),
                        value: *steepness,
                    });
                }
            }
            VestingShape::OneTimeAtMonth { month } => {
                if *month == 0 {
                    return Err(ConfigError::EmptySegment {
                        category: category.to_string(),
                        start: 0,
                        end: 0,
                    });
                }
            }
            VestingShape::FlatLinear { months } => {
                if *months == 0 {
                    return Err(ConfigError::ZeroReleaseMonths {
                        category: category.to_string(),
                    });
                }
            }
            VestingShape::PhasedSteps { segments } => {
                validate_segments(category, segments)?;
            }
        }

        let end = self.window_end().ok_or_else(|| ConfigError::InvalidParameter {
            param: "lock_months",
            reason: format!("category {category}: lock + release months overflows"),
        })?;
        if end > horizon {
            return Err(ConfigError::WindowOutsideHorizon {
                category: category.to_string(),
                end,
                horizon,
            });
        }

        Ok(())
    }
}

fn validate_segments(category: &str, segments: &[PhaseSegment]) -> Result<(), ConfigError> {
    if segments.is_empty() {
        return Err(ConfigError::ZeroReleaseMonths {
            category: category.to_string(),
        });
    }

    for seg in segments {
        if seg.start == 0 || seg.end < seg.start {
            return Err(ConfigError::EmptySegment {
                category: category.to_string(),
                start: seg.start,
                end: seg.end,
            });
        }
        if !seg.amount.is_finite() || seg.amount < 0.0 {
            return Err(ConfigError::NegativeTotal {
                category: category.to_string(),
                value: seg.amount,
            });
        }
    }

    let mut sorted: Vec<&PhaseSegment> = segments.iter().collect();
    sorted.sort_by_key(|seg| seg.start);
    for pair in sorted.windows(2) {
        if pair[0].overlaps(pair[1]) {
            return Err(ConfigError::OverlappingSegments {
                category: category.to_string(),
                first: (pair[0].start, pair[0].end),
                second: (pair[1].start, pair[1].end),
            });
        }
    }

    Ok(())
}

fn logistic(t: f64, mid: f64, steepness: f64) -> f64 {
    1.0 / (1.0 + (-steepness * (t - mid)).exp())
}

/// Normalised cumulative release fraction at window-relative month `t`.
fn sigmoid_point(release_months: Month, steepness: f64, t: Month) -> f64 {
    let n = f64::from(release_months);
    let mid = n / 2.0;
    let start = logistic(0.0, mid, steepness);
    let end = logistic(n, mid, steepness);
    if t == 0 {
        return 0.0;
    }
    if t >= release_months {
        return 1.0;
    }
    (logistic(f64::from(t), mid, steepness) - start) / (end - start)
}

/// Normalised logistic curve sampled at `t = 0..=release_months`.
///
/// `S(t) = 1 / (1 + e^(-k (t - mid)))` with `mid = release_months / 2`,
/// rescaled so the first sample is exactly 0 and the last exactly 1.
pub fn sigmoid_cumulative(release_months: Month, steepness: f64) -> Vec<f64> {
    (0..=release_months)
        .map(|t| sigmoid_point(release_months, steepness, t))
        .collect()
}
