//! Human-readable report lines
//!
//! Pure string builders shared by the console output and the persisted
//! report file. Nothing here touches the filesystem.

use crate::errors::ConfigError;
use crate::issuance::IssuanceSeries;
use crate::params::BurnPolicy;
use crate::scenario::ScenarioResults;
use crate::schedule::ReleaseMode;
use crate::supply::simulate;
use crate::types::{Month, QuoteAmount, ScenarioKey, SupplyTrajectory, TokenAmount, MONTHS_PER_YEAR};

/// Revenue of the scenario given a detailed breakdown in the report.
pub const EXAMPLE_REVENUE: QuoteAmount = 1_000_000.0;
/// FDV of the scenario given a detailed breakdown in the report.
pub const EXAMPLE_FDV: QuoteAmount = 300_000_000.0;
/// FDV label used when the example scenario is simulated outside the grid.
pub const EXAMPLE_FDV_LABEL: &str = "Baseline";

pub fn final_circulation_line(key: &ScenarioKey, trajectory: &SupplyTrajectory) -> String {
    format!(
        "Monthly Revenue {} USDT, FDV {}: Final Circulation ≈ {:.2} ZB",
        key.revenue_label,
        key.fdv_label,
        trajectory.final_supply()
    )
}

pub fn category_total_line(name: &str, total: TokenAmount) -> String {
    format!("  {name:20} => {total:.2} ZB")
}

/// Breakdown block for a single scenario: closing supply and inflation.
pub fn detailed_example(trajectory: &SupplyTrajectory) -> String {
    let key = &trajectory.key;
    let last = trajectory.len();
    let mut out = format!(
        "=== Detailed Example: Monthly Revenue={} USDT, FDV={} USDT ({}) ===\n",
        compact_amount(key.revenue_value),
        compact_amount(key.fdv_value),
        key.fdv_label
    );
    out.push_str(&format!(
        "  Final circulation at month {last} ≈ {:.2} ZB\n",
        trajectory.final_supply()
    ));
    out.push_str(&format!(
        "  Inflation rate at month {last} = {:.2}%\n",
        trajectory.final_inflation()
    ));
    out
}

/// The 1M revenue / 300M FDV trajectory, taken from `results` when the grid
/// holds it and simulated from `issuance` otherwise.
pub fn example_trajectory(
    results: &ScenarioResults,
    issuance: &IssuanceSeries,
    burn: &BurnPolicy,
) -> Result<SupplyTrajectory, ConfigError> {
    if let Some(found) = results.find_by_values(EXAMPLE_REVENUE, EXAMPLE_FDV) {
        return Ok(found.clone());
    }
    let key = ScenarioKey::new(
        compact_amount(EXAMPLE_REVENUE),
        EXAMPLE_REVENUE,
        EXAMPLE_FDV_LABEL,
        EXAMPLE_FDV,
    );
    simulate(&issuance.total, key, burn)
}

pub fn chart_title(mode: ReleaseMode, revenue_label: &str) -> String {
    match mode {
        ReleaseMode::Linear => {
            format!("Monthly Inflation Rate with Monthly Revenue = {revenue_label} USDT")
        }
        ReleaseMode::Sigmoid { .. } => format!(
            "Monthly Network Revenue = {revenue_label} USDT, Inflation Rate with Sigmoid + Linear Release"
        ),
    }
}

/// Full text report for one release mode.
///
/// The detailed example block is always present; see [`example_trajectory`].
pub fn render_report(
    mode: ReleaseMode,
    results: &ScenarioResults,
    issuance: &IssuanceSeries,
    burn: &BurnPolicy,
) -> Result<String, ConfigError> {
    let mut out = format!("=== Simulation Results for {mode} Release Model ===\n\n");

    for trajectory in results.iter() {
        out.push_str(&final_circulation_line(&trajectory.key, trajectory));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&detailed_example(&example_trajectory(results, issuance, burn)?));

    out.push('\n');
    out.push_str(&format!(
        "Cumulative release amount for each allocation over {} (before burn):\n",
        horizon_phrase(issuance.horizon())
    ));
    for (name, total) in issuance.category_totals() {
        out.push_str(&category_total_line(&name, total));
        out.push('\n');
    }

    Ok(out)
}

fn horizon_phrase(horizon: Month) -> String {
    if horizon % MONTHS_PER_YEAR == 0 {
        format!("{} years", horizon / MONTHS_PER_YEAR)
    } else {
        format!("{horizon} months")
    }
}

/// `1_000_000 -> "1M"`, `300_000_000 -> "300M"`, `500_000 -> "500k"`.
fn compact_amount(value: QuoteAmount) -> String {
    let abs = value.abs();
    if abs >= 1e9 && (value / 1e9).fract() == 0.0 {
        format!("{}B", value / 1e9)
    } else if abs >= 1e6 && (value / 1e6).fract() == 0.0 {
        format!("{}M", value / 1e6)
    } else if abs >= 1e3 && (value / 1e3).fract() == 0.0 {
        format!("{}k", value / 1e3)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuance::aggregate;
    use crate::scenario::{ScenarioGrid, ScenarioRunner};
    use crate::schedule::AllocationSchedule;
    use crate::types::SupplyPoint;

    fn trajectory(revenue: f64, fdv: f64) -> SupplyTrajectory {
        SupplyTrajectory {
            key: ScenarioKey::new("1M", revenue, "Baseline", fdv),
            points: vec![
                SupplyPoint {
                    month: 1,
                    issued: 10.0,
                    burned: 1.0,
                    circulating_supply: 9.0,
                    inflation_rate: 0.0,
                },
                SupplyPoint {
                    month: 2,
                    issued: 4.0,
                    burned: 1.0,
                    circulating_supply: 12.0,
                    inflation_rate: 3.0 / 9.0 * 100.0,
                },
            ],
        }
    }

    #[test]
    fn circulation_line_format() {
        let t = trajectory(1e6, 3e8);
        assert_eq!(
            final_circulation_line(&t.key, &t),
            "Monthly Revenue 1M USDT, FDV Baseline: Final Circulation ≈ 12.00 ZB"
        );
    }

    #[test]
    fn category_line_pads_name() {
        assert_eq!(
            category_total_line("seed", 100_000_000.0),
            "  seed                 => 100000000.00 ZB"
        );
    }

    #[test]
    fn detailed_block() {
        let block = detailed_example(&trajectory(1e6, 3e8));
        assert!(block.starts_with(
            "=== Detailed Example: Monthly Revenue=1M USDT, FDV=300M USDT (Baseline) ==="
        ));
        assert!(block.contains("Final circulation at month 2 ≈ 12.00 ZB"));
        assert!(block.contains("Inflation rate at month 2 = 33.33%"));
    }

    #[test]
    fn example_is_simulated_when_grid_lacks_it() {
        let schedule = AllocationSchedule::default_with_mode(ReleaseMode::Linear).unwrap();
        let issuance = aggregate(&schedule);
        let runner = ScenarioRunner::new(
            ScenarioGrid::from_pairs([("2M", 2e6)]).unwrap(),
            ScenarioGrid::default_fdv(),
            BurnPolicy::default(),
        )
        .unwrap();
        let results = runner.run(&issuance.total).unwrap();

        let example = example_trajectory(&results, &issuance, runner.burn()).unwrap();
        assert_eq!(example.key, ScenarioKey::new("1M", 1e6, "Baseline", 3e8));
        assert_eq!(example.len(), 60);

        let text = render_report(ReleaseMode::Linear, &results, &issuance, runner.burn()).unwrap();
        assert_eq!(text.matches("=== Detailed Example:").count(), 1);
    }

    #[test]
    fn example_prefers_grid_trajectory() {
        let schedule = AllocationSchedule::default_with_mode(ReleaseMode::Linear).unwrap();
        let issuance = aggregate(&schedule);
        let runner = ScenarioRunner::with_defaults().unwrap();
        let results = runner.run(&issuance.total).unwrap();

        let example = example_trajectory(&results, &issuance, runner.burn()).unwrap();
        assert_eq!(&example, results.get("1M", "Baseline").unwrap());
    }

    #[test]
    fn compact_amounts() {
        assert_eq!(compact_amount(500_000.0), "500k");
        assert_eq!(compact_amount(1_500_000_000.0), "1500M");
        assert_eq!(compact_amount(2e9), "2B");
        assert_eq!(compact_amount(60e6), "60M");
        assert_eq!(compact_amount(123.0), "123");
    }

    #[test]
    fn titles_depend_on_mode() {
        assert!(chart_title(ReleaseMode::Linear, "5M").contains("Monthly Revenue = 5M USDT"));
        assert!(chart_title(ReleaseMode::sigmoid(), "5M").contains("Sigmoid"));
    }
}
