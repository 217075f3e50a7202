//! Policy instruments, prices, and the policy regime.
use std::str::FromStr;

use crate::economy::errors::{ModelError, ModelResult};

/// Numeraire: the wage is fixed at one.
pub const WAGE: f64 = 1.0;

/// Per-unit tax on good 2 and lump-sum transfer to the household.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PolicyInstrument {
    pub tau: f64,
    pub transfer: f64,
}

impl PolicyInstrument {
    pub fn new(tau: f64, transfer: f64) -> Self {
        Self { tau, transfer }
    }

    /// `tau = 0`, `T = 0`.
    pub fn laissez_faire() -> Self {
        Self::default()
    }

    /// # Errors
    /// [`ModelError::NonFiniteQuantity`] if either instrument is NaN or infinite.
    pub fn validate(&self) -> ModelResult<()> {
        if !self.tau.is_finite() {
            return Err(ModelError::NonFiniteQuantity { name: "tau", value: self.tau });
        }
        if !self.transfer.is_finite() {
            return Err(ModelError::NonFiniteQuantity { name: "transfer", value: self.transfer });
        }
        Ok(())
    }

    /// Government budget surplus `tau·c2 − T` given good-2 demand `c2`.
    pub fn budget_surplus(&self, c2: f64) -> f64 {
        self.tau * c2 - self.transfer
    }
}

/// Producer prices of goods 1 and 2 in units of the wage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceVector {
    pub p1: f64,
    pub p2: f64,
}

impl PriceVector {
    pub fn new(p1: f64, p2: f64) -> Self {
        Self { p1, p2 }
    }

    /// Both prices finite and strictly positive.
    ///
    /// # Errors
    /// [`ModelError::NonPositivePrice`] naming the first offending price.
    pub fn validate(&self) -> ModelResult<()> {
        for (name, value) in [("p1", self.p1), ("p2", self.p2)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::NonPositivePrice { name, value });
            }
        }
        Ok(())
    }

    /// `p2 / p1`.
    pub fn relative_price(&self) -> f64 {
        self.p2 / self.p1
    }
}

impl Default for PriceVector {
    /// `(1, 1)`, the customary starting guess.
    fn default() -> Self {
        Self { p1: 1.0, p2: 1.0 }
    }
}

/// How the transfer is determined.
///
/// Variants:
/// - `Free`: `tau` and `T` are both chosen; the budget need not balance.
/// - `BalancedBudget`: `T = tau·c2` is solved for jointly with prices; only
///   `tau` is chosen.
///
/// Parsing:
/// Case-insensitive `"free"` / `"balanced"` / `"balancedbudget"`; anything
/// else returns `ModelError::UnknownRegime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyRegime {
    #[default]
    Free,
    BalancedBudget,
}

impl PolicyRegime {
    /// Number of free policy instruments.
    pub fn dimension(&self) -> usize {
        match self {
            PolicyRegime::Free => 2,
            PolicyRegime::BalancedBudget => 1,
        }
    }
}

impl FromStr for PolicyRegime {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(PolicyRegime::Free),
            "balanced" | "balancedbudget" | "balanced-budget" => Ok(PolicyRegime::BalancedBudget),
            _ => Err(ModelError::UnknownRegime { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Price validation reports the first non-positive price by name.
    //
    // Given
    // -----
    // - (1, 0) and (-1, 2).
    //
    // Expect
    // ------
    // - `NonPositivePrice { name: "p2" }`, then `{ name: "p1" }`.
    fn price_validation_names_offending_good() {
        assert_eq!(
            PriceVector::new(1.0, 0.0).validate(),
            Err(ModelError::NonPositivePrice { name: "p2", value: 0.0 })
        );
        assert_eq!(
            PriceVector::new(-1.0, 2.0).validate(),
            Err(ModelError::NonPositivePrice { name: "p1", value: -1.0 })
        );
        assert!(PriceVector::default().validate().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Regime names parse case-insensitively and report their dimension.
    //
    // Given
    // -----
    // - "Free", "BALANCED", "lump-sum".
    //
    // Expect
    // ------
    // - Free (2 instruments), BalancedBudget (1), then `UnknownRegime`.
    fn regime_parses_and_reports_dimension() {
        let free: PolicyRegime = "Free".parse().unwrap();
        let balanced: PolicyRegime = "BALANCED".parse().unwrap();

        assert_eq!((free, free.dimension()), (PolicyRegime::Free, 2));
        assert_eq!((balanced, balanced.dimension()), (PolicyRegime::BalancedBudget, 1));
        assert!(matches!(
            "lump-sum".parse::<PolicyRegime>(),
            Err(ModelError::UnknownRegime { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Non-finite instruments are rejected; the budget surplus is tau·c2 − T.
    //
    // Given
    // -----
    // - (NaN, 0) and (0.2, 0.1) with c2 = 1.
    //
    // Expect
    // ------
    // - `NonFiniteQuantity { name: "tau" }`; surplus 0.1.
    fn policy_validation_and_budget() {
        assert!(matches!(
            PolicyInstrument::new(f64::NAN, 0.0).validate(),
            Err(ModelError::NonFiniteQuantity { name: "tau", .. })
        ));
        let policy = PolicyInstrument::new(0.2, 0.1);
        assert!((policy.budget_surplus(1.0) - 0.1).abs() < 1e-15);
    }
}
