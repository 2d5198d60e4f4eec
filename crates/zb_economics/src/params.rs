use crate::errors::ConfigError;
use crate::types::{Month, QuoteAmount, TokenAmount, HORIZON_MONTHS};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default logistic steepness for cliff-sigmoid vesting.
pub const DEFAULT_SIGMOID_STEEPNESS: f64 = 0.2;

/// Stated total supply used to derive the token price from an FDV.
pub const REFERENCE_SUPPLY: TokenAmount = 1_000_000_000.0;

/// How network revenue is turned into burned tokens.
///
/// A share of revenue buys tokens back at the implied price
/// `fdv / reference_supply` and removes them from circulation. The design
/// splits the spend into a buyback leg and a leverage leg.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnPolicy {
    /// Fraction of revenue spent on buyback and burn (0.2 = 20%)
    pub buyback_share: Decimal,
    /// Fraction of revenue spent on the leverage leg (0.2 = 20%)
    pub leverage_share: Decimal,
    /// Token count the FDV is divided by to get a unit price
    pub reference_supply: TokenAmount,
}

impl Default for BurnPolicy {
    fn default() -> Self {
        Self {
            buyback_share: Decimal::new(2, 1),
            leverage_share: Decimal::new(2, 1),
            reference_supply: REFERENCE_SUPPLY,
        }
    }
}

impl BurnPolicy {
    /// Combined fraction of revenue that ends up burned.
    pub fn total_share(&self) -> Decimal {
        self.buyback_share + self.leverage_share
    }

    /// Combined share as a float, the form the burn formula works in.
    pub fn burn_share(&self) -> Result<f64, ConfigError> {
        self.total_share()
            .to_f64()
            .ok_or_else(|| ConfigError::InvalidParameter {
                param: "burn_share",
                reason: format!("{} is not representable as f64", self.total_share()),
            })
    }

    /// Tokens burned in one month for the given revenue and valuation.
    ///
    /// `revenue * share * reference_supply / fdv`. Callers validate `fdv > 0`.
    pub fn burn_tokens(
        &self,
        monthly_revenue: QuoteAmount,
        fdv: QuoteAmount,
    ) -> Result<TokenAmount, ConfigError> {
        let share = self.burn_share()?;
        Ok(monthly_revenue * share * self.reference_supply / fdv)
    }

    /// Implied unit price for a valuation.
    pub fn token_price(&self, fdv: QuoteAmount) -> QuoteAmount {
        fdv / self.reference_supply
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (param, value) in [
            ("buyback_share", self.buyback_share),
            ("leverage_share", self.leverage_share),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(ConfigError::InvalidParameter {
                    param,
                    reason: format!("must be between 0 and 1, got {value}"),
                });
            }
        }

        if self.total_share() > Decimal::ONE {
            return Err(ConfigError::InvalidParameter {
                param: "burn_share",
                reason: format!("buyback + leverage exceeds 1, got {}", self.total_share()),
            });
        }
        self.burn_share()?;

        if !self.reference_supply.is_finite() || self.reference_supply <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                param: "reference_supply",
                reason: format!("must be > 0, got {}", self.reference_supply),
            });
        }

        Ok(())
    }
}

/// Static parameters the simulation core is driven by.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Number of simulated months
    pub horizon_months: Month,
    /// Steepness `k` used when cliff categories switch to sigmoid release
    pub sigmoid_steepness: f64,
    pub burn: BurnPolicy,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            horizon_months: HORIZON_MONTHS,
            sigmoid_steepness: DEFAULT_SIGMOID_STEEPNESS,
            burn: BurnPolicy::default(),
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_months == 0 {
            return Err(ConfigError::InvalidParameter {
                param: "horizon_months",
                reason: "must be greater than 0".to_string(),
            });
        }

        if !self.sigmoid_steepness.is_finite() || self.sigmoid_steepness <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                param: "sigmoid_steepness",
                reason: format!("must be > 0, got {}", self.sigmoid_steepness),
            });
        }

        self.burn.validate()
    }
}
