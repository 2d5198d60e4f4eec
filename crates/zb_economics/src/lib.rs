//! ZB Economics — token release schedule and supply simulation
//!
//! Per-category vesting curves aggregated into a monthly issuance series,
//! netted against a revenue-funded buyback-and-burn over a grid of revenue
//! and valuation scenarios.
//!
//! Monetary unit: whole ZB tokens as `f64`. Valuations and revenue in USDT.

pub mod types;
pub mod errors;
pub mod params;
pub mod vesting;
pub mod schedule;
pub mod issuance;
pub mod supply;
pub mod scenario;
pub mod report;
pub mod verify;

pub use types::*;
pub use errors::*;
pub use params::*;
pub use vesting::*;
pub use schedule::*;
pub use issuance::*;
pub use supply::*;
pub use scenario::*;
pub use verify::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything needed to build a schedule and run the scenario grid.
pub mod prelude {
    pub use crate::issuance::{aggregate, IssuanceSeries};
    pub use crate::params::{BurnPolicy, SimulationParams};
    pub use crate::report::render_report;
    pub use crate::scenario::{ScenarioGrid, ScenarioResults, ScenarioRunner};
    pub use crate::schedule::{default_categories, AllocationCategory, AllocationSchedule, ReleaseMode};
    pub use crate::supply::simulate;
    pub use crate::types::{Month, MonthlySeries, ScenarioKey, SupplyTrajectory, HORIZON_MONTHS};
    pub use crate::vesting::{PhaseSegment, VestingShape};
}
