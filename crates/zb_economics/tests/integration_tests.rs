//! End-to-end checks of the release schedule and scenario simulation
//!
//! Runs the default allocation table through aggregation and the full
//! revenue x FDV grid in both release modes.

use zb_economics::prelude::*;
use zb_economics::report::{self, EXAMPLE_FDV, EXAMPLE_REVENUE};
use zb_economics::{verify_conservation, ConfigError};

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tol {tol})"
    );
}

fn default_issuance(mode: ReleaseMode) -> (AllocationSchedule, IssuanceSeries) {
    let schedule = AllocationSchedule::default_with_mode(mode).unwrap();
    let issuance = aggregate(&schedule);
    (schedule, issuance)
}

#[test]
fn test_category_totals_before_burn() {
    let expected = [
        ("team_advisor", 200_000_000.0),
        ("seed", 100_000_000.0),
        ("a_round", 50_000_000.0),
        ("airdrop_liquidity", 100_000_000.0),
        ("eco_fund", 50_000_000.0),
        ("mining", 50_000_000.0),
        ("early_staking", 100_000_000.0),
        ("node_staking", 300_000_000.0),
    ];

    for mode in [ReleaseMode::Linear, ReleaseMode::sigmoid()] {
        let (schedule, issuance) = default_issuance(mode);
        let totals = issuance.category_totals();
        assert_eq!(totals.len(), expected.len());
        for ((name, total), (exp_name, exp_total)) in totals.iter().zip(expected) {
            assert_eq!(name, exp_name);
            assert_close(*total, exp_total, exp_total * 1e-6);
        }
        assert_close(issuance.grand_total(), 950_000_000.0, 1e-2);
        verify_conservation(&schedule, &issuance, 1e-6).unwrap();
    }
}

#[test]
fn test_baseline_scenario_first_month() {
    let (_, issuance) = default_issuance(ReleaseMode::Linear);
    let runner = ScenarioRunner::with_defaults().unwrap();
    let results = runner.run(&issuance.total).unwrap();

    let traj = results.get("1M", "Baseline").unwrap();
    let first = traj.points[0];

    assert_close(first.burned, 1_333_333.33, 0.01);
    assert_close(first.issued, 208_333_333.33, 0.01);
    assert_close(first.circulating_supply, 207_000_000.00, 0.01);
    assert_eq!(first.inflation_rate, 0.0);
    assert_eq!(traj.len(), 60);
}

#[test]
fn test_baseline_scenario_second_month_inflation() {
    let (_, issuance) = default_issuance(ReleaseMode::Linear);
    let burn = BurnPolicy::default();
    let key = ScenarioKey::new("1M", 1_000_000.0, "Baseline", 300e6);
    let traj = simulate(&issuance.total, key, &burn).unwrap();

    // month 2: eco 833,333.33 + node 5M + mining 2.5M, minus the burn
    let net = 50_000_000.0 / 60.0 + 5_000_000.0 + 2_500_000.0 - 1_000_000.0 * 0.4 * 1e9 / 300e6;
    let expected = net / traj.points[0].circulating_supply * 100.0;
    assert_close(traj.points[1].inflation_rate, expected, 1e-9);
}

#[test]
fn test_final_supply_matches_closed_form() {
    let (_, issuance) = default_issuance(ReleaseMode::Linear);
    let runner = ScenarioRunner::with_defaults().unwrap();
    let results = runner.run(&issuance.total).unwrap();

    for traj in results.iter() {
        let burn = traj.key.revenue_value * 0.4 * 1e9 / traj.key.fdv_value;
        let expected = 950_000_000.0 - 60.0 * burn;
        assert_close(traj.final_supply(), expected, 1e-3);
    }
}

#[test]
fn test_linear_and_sigmoid_end_at_same_supply() {
    let (_, linear) = default_issuance(ReleaseMode::Linear);
    let (_, sigmoid) = default_issuance(ReleaseMode::sigmoid());
    let runner = ScenarioRunner::with_defaults().unwrap();

    let lin = runner.run(&linear.total).unwrap();
    let sig = runner.run(&sigmoid.total).unwrap();

    for (a, b) in lin.iter().zip(sig.iter()) {
        assert_eq!(a.key, b.key);
        assert_close(a.final_supply(), b.final_supply(), 1e-2);
    }

    // Different shapes, different paths.
    let a = lin.get("1M", "Baseline").unwrap();
    let b = sig.get("1M", "Baseline").unwrap();
    assert_ne!(a.inflation_series(), b.inflation_series());
}

#[test]
fn test_high_revenue_low_fdv_goes_negative() {
    let (_, issuance) = default_issuance(ReleaseMode::Linear);
    let runner = ScenarioRunner::with_defaults().unwrap();
    let results = runner.run(&issuance.total).unwrap();

    // 10M revenue at 60M FDV burns ~66.7M a month, far above issuance.
    let traj = results.get("10M", "Down5x").unwrap();
    assert!(traj.first_negative_month().is_some());
    assert!(traj.final_supply() < 0.0);

    let calm = results.get("500k", "Up5x").unwrap();
    assert!(calm.first_negative_month().is_none());
}

#[test]
fn test_report_contents() {
    let (_, issuance) = default_issuance(ReleaseMode::Linear);
    let runner = ScenarioRunner::with_defaults().unwrap();
    let results = runner.run(&issuance.total).unwrap();

    let text = render_report(ReleaseMode::Linear, &results, &issuance, runner.burn()).unwrap();
    assert!(text.starts_with("=== Simulation Results for Linear Release Model ==="));
    assert_eq!(text.matches("Final Circulation ≈").count(), 12);
    assert!(text.contains("=== Detailed Example: Monthly Revenue=1M USDT, FDV=300M USDT (Baseline) ==="));
    assert!(text.contains("Cumulative release amount for each allocation over 5 years (before burn):"));
    assert!(text.contains("  node_staking         => 300000000.00 ZB"));

    let example = results.find_by_values(EXAMPLE_REVENUE, EXAMPLE_FDV).unwrap();
    assert!(text.contains(&report::final_circulation_line(&example.key, example)));
}

#[test]
fn test_report_example_block_outside_grid() {
    let (_, issuance) = default_issuance(ReleaseMode::Linear);
    let revenue = ScenarioGrid::from_pairs([("2M", 2_000_000.0)]).unwrap();
    let runner = ScenarioRunner::new(revenue, ScenarioGrid::default_fdv(), BurnPolicy::default()).unwrap();
    let results = runner.run(&issuance.total).unwrap();
    assert!(results.find_by_values(EXAMPLE_REVENUE, EXAMPLE_FDV).is_none());

    let text = render_report(ReleaseMode::Linear, &results, &issuance, runner.burn()).unwrap();
    assert!(text.contains("=== Detailed Example: Monthly Revenue=1M USDT, FDV=300M USDT (Baseline) ==="));
    assert_eq!(text.matches("Final Circulation ≈").count(), 3);

    // Same numbers as when the pair is part of the default grid.
    let full = ScenarioRunner::with_defaults().unwrap().run(&issuance.total).unwrap();
    let in_grid = full.find_by_values(EXAMPLE_REVENUE, EXAMPLE_FDV).unwrap();
    assert!(text.contains(&report::detailed_example(in_grid)));
}

#[test]
fn test_custom_schedule_rejects_overlap_before_simulation() {
    let mut categories = default_categories();
    categories.push(AllocationCategory::new(
        "treasury",
        10.0,
        VestingShape::PhasedSteps {
            segments: vec![PhaseSegment::new(1, 10, 5.0), PhaseSegment::new(10, 20, 5.0)],
        },
    ));

    let err = AllocationSchedule::new(categories, HORIZON_MONTHS).unwrap_err();
    assert!(matches!(err, ConfigError::OverlappingSegments { ref category, .. } if category == "treasury"));
}

#[test]
fn test_shape_json_is_tagged() {
    let shape = VestingShape::CliffLinear {
        lock_months: 12,
        release_months: 48,
    };
    let json = serde_json::to_value(&shape).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"shape": "cliff_linear", "lock_months": 12, "release_months": 48})
    );

    let grid: ScenarioGrid =
        serde_json::from_str(r#"[{"label": "Baseline", "value": 300000000.0}]"#).unwrap();
    assert_eq!(grid.get("Baseline"), Some(300e6));
}
