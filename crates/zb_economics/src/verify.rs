use crate::errors::VerifyError;
use crate::issuance::IssuanceSeries;
use crate::schedule::AllocationSchedule;
use crate::types::{Month, TokenAmount};
use tracing::{info, warn};

/// Check that released tokens are conserved.
///
/// - every category releases its `total_tokens` over the horizon, within
///   `rel_tol` relative tolerance
/// - every month of `issuance.total` equals the sum of the category series
pub fn verify_conservation(
    schedule: &AllocationSchedule,
    issuance: &IssuanceSeries,
    rel_tol: f64,
) -> Result<(), VerifyError> {
    for category in schedule.categories() {
        let released = issuance
            .category(&category.name)
            .map_or(0.0, |s| s.total());
        let expected = category.total_tokens;
        if !within(released, expected, rel_tol) {
            warn!(
                category = %category.name,
                released, expected, "category release does not match allocation"
            );
            return Err(VerifyError::CategoryMismatch {
                category: category.name.clone(),
                released,
                expected,
            });
        }
    }

    for month in 1..=issuance.horizon() {
        let sum = sum_over_categories(issuance, month);
        let total = issuance.total.get(month).unwrap_or(0.0);
        if !within(total, sum, rel_tol) {
            return Err(VerifyError::TotalMismatch { month, total, sum });
        }
    }

    Ok(())
}

/// Difference between the stated supply and what the table allocates.
///
/// The default table allocates 950M of a stated 1B supply; the 50M residual
/// never enters circulation.
pub fn unallocated_residual(issuance: &IssuanceSeries, reference_supply: TokenAmount) -> TokenAmount {
    let residual = reference_supply - issuance.grand_total();
    if residual.abs() > f64::EPSILON * reference_supply {
        info!(
            reference_supply,
            allocated = issuance.grand_total(),
            residual,
            "allocation table does not cover the reference supply"
        );
    }
    residual
}

fn sum_over_categories(issuance: &IssuanceSeries, month: Month) -> TokenAmount {
    issuance
        .per_category
        .iter()
        .map(|(_, s)| s.get(month).unwrap_or(0.0))
        .sum()
}

fn within(actual: f64, expected: f64, rel_tol: f64) -> bool {
    (actual - expected).abs() <= rel_tol * expected.abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuance::aggregate;
    use crate::schedule::ReleaseMode;
    use crate::types::MonthlySeries;

    #[test]
    fn default_schedules_conserve_tokens() {
        for mode in [ReleaseMode::Linear, ReleaseMode::sigmoid()] {
            let schedule = AllocationSchedule::default_with_mode(mode).unwrap();
            let issuance = aggregate(&schedule);
            verify_conservation(&schedule, &issuance, 1e-6).unwrap();
        }
    }

    #[test]
    fn detects_tampered_total() {
        let schedule = AllocationSchedule::default_with_mode(ReleaseMode::Linear).unwrap();
        let mut issuance = aggregate(&schedule);
        let mut values = issuance.total.as_slice().to_vec();
        values[5] += 1_000.0;
        issuance.total = MonthlySeries::from(values);

        assert!(matches!(
            verify_conservation(&schedule, &issuance, 1e-9),
            Err(VerifyError::TotalMismatch { month: 6, .. })
        ));
    }

    #[test]
    fn residual_against_stated_supply() {
        let schedule = AllocationSchedule::default_with_mode(ReleaseMode::Linear).unwrap();
        let issuance = aggregate(&schedule);
        let residual = unallocated_residual(&issuance, 1e9);
        assert!((residual - 50_000_000.0).abs() < 1e-3);
    }
}
