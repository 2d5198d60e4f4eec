//! Circulating supply simulation
//!
//! Nets the scheduled issuance against a revenue-funded buyback-and-burn
//! and accumulates the circulating supply month by month. Revenue and FDV are
//! constant within a scenario, so the burn is the same every month.

use crate::errors::ConfigError;
use crate::params::BurnPolicy;
use crate::types::{
    Month, MonthlySeries, QuoteAmount, ScenarioKey, SupplyPoint, SupplyTrajectory, TokenAmount,
};
use tracing::{debug, warn};

/// Reject inputs that would make the burn term meaningless.
pub fn validate_scenario(key: &ScenarioKey) -> Result<(), ConfigError> {
    if !key.fdv_value.is_finite() || key.fdv_value <= 0.0 {
        return Err(ConfigError::NonPositiveFdv {
            label: key.fdv_label.clone(),
            value: key.fdv_value,
        });
    }
    if !key.revenue_value.is_finite() || key.revenue_value < 0.0 {
        return Err(ConfigError::NonPositiveRevenue {
            label: key.revenue_label.clone(),
            value: key.revenue_value,
        });
    }
    Ok(())
}

/// Simulate one scenario over the whole issuance series.
///
/// For month `i`: `net = issuance[i] - burn`, inflation is `net / supply * 100`
/// against the previous month's supply (0 while the supply is still 0), then
/// `supply += net`. The supply is allowed to go negative.
pub fn simulate(
    total_issuance: &MonthlySeries,
    key: ScenarioKey,
    burn: &BurnPolicy,
) -> Result<SupplyTrajectory, ConfigError> {
    validate_scenario(&key)?;

    let burned = burn.burn_tokens(key.revenue_value, key.fdv_value)?;
    let mut supply: TokenAmount = 0.0;
    let mut points = Vec::with_capacity(total_issuance.len());

    for (idx, issued) in total_issuance.iter().enumerate() {
        let net = issued - burned;
        let inflation_rate = if supply == 0.0 {
            0.0
        } else {
            net / supply * 100.0
        };
        supply += net;

        points.push(SupplyPoint {
            month: idx as Month + 1,
            issued,
            burned,
            circulating_supply: supply,
            inflation_rate,
        });
    }

    let trajectory = SupplyTrajectory { key, points };
    if let Some(month) = trajectory.first_negative_month() {
        warn!(
            revenue = %trajectory.key.revenue_label,
            fdv = %trajectory.key.fdv_label,
            month,
            "circulating supply turns negative"
        );
    }
    debug!(
        revenue = %trajectory.key.revenue_label,
        fdv = %trajectory.key.fdv_label,
        burn_per_month = burned,
        final_supply = trajectory.final_supply(),
        "scenario simulated"
    );

    Ok(trajectory)
}

/// Convenience wrapper taking bare revenue and FDV values.
pub fn simulate_values(
    total_issuance: &MonthlySeries,
    monthly_revenue: QuoteAmount,
    fdv: QuoteAmount,
    burn: &BurnPolicy,
) -> Result<SupplyTrajectory, ConfigError> {
    let key = ScenarioKey::new(
        monthly_revenue.to_string(),
        monthly_revenue,
        fdv.to_string(),
        fdv,
    );
    simulate(total_issuance, key, burn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(values: &[f64]) -> MonthlySeries {
        MonthlySeries::from(values.to_vec())
    }

    #[test]
    fn first_month_inflation_is_zero() {
        let issuance = flat(&[10.0, 10.0, 10.0]);
        let traj = simulate_values(&issuance, 1_000.0, 1e9, &BurnPolicy::default()).unwrap();
        assert_eq!(traj.points[0].inflation_rate, 0.0);
        assert_eq!(traj.len(), 3);
    }

    #[test]
    fn zero_burn_accumulates_issuance() {
        let issuance = flat(&[5.0, 3.0, 2.0, 0.0]);
        let traj = simulate_values(&issuance, 0.0, 1e9, &BurnPolicy::default()).unwrap();
        assert_eq!(traj.supply_series(), issuance.cumulative());
        assert_eq!(traj.points[1].inflation_rate, 3.0 / 5.0 * 100.0);
        assert_eq!(traj.points[3].inflation_rate, 0.0);
    }

    #[test]
    fn supply_may_go_negative() {
        // burn = 10M * 0.4 * 1e9 / 6e7 ≈ 66.7M tokens a month
        let issuance = flat(&[100_000_000.0, 0.0, 0.0]);
        let traj = simulate_values(&issuance, 10_000_000.0, 60e6, &BurnPolicy::default()).unwrap();
        assert_eq!(traj.first_negative_month(), Some(2));
        assert!(traj.final_supply() < 0.0);
    }

    #[test]
    fn non_positive_fdv_rejected() {
        let issuance = flat(&[1.0]);
        let key = ScenarioKey::new("1M", 1e6, "Broken", 0.0);
        assert_eq!(
            simulate(&issuance, key, &BurnPolicy::default()).unwrap_err(),
            ConfigError::NonPositiveFdv {
                label: "Broken".into(),
                value: 0.0
            }
        );
    }

    #[test]
    fn negative_revenue_rejected() {
        let issuance = flat(&[1.0]);
        let key = ScenarioKey::new("loss", -5.0, "Baseline", 3e8);
        assert!(matches!(
            simulate(&issuance, key, &BurnPolicy::default()),
            Err(ConfigError::NonPositiveRevenue { .. })
        ));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let issuance = flat(&[7.0, 1.0, 4.0, 9.0]);
        let a = simulate_values(&issuance, 123.0, 4e8, &BurnPolicy::default()).unwrap();
        let b = simulate_values(&issuance, 123.0, 4e8, &BurnPolicy::default()).unwrap();
        assert_eq!(a, b);
    }
}
