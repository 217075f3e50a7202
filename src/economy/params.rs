//! Structural parameters of the production economy.
//!
//! [`ModelParameters`] is created once, validated, and then shared by
//! read-only reference across every firm, household, and solver call.
use crate::economy::errors::{ModelError, ModelResult};

/// Technology, preference, and externality parameters.
///
/// Fields:
/// - `a` — total-factor productivity `A > 0`.
/// - `gamma` — labor exponent of `y = A·l^γ`, `0 < γ < 1`.
/// - `alpha` — Cobb–Douglas weight on good 1, `0 < α < 1`.
/// - `nu` — labor-disutility scale `ν > 0`.
/// - `epsilon` — inverse Frisch elasticity `ε > 0`.
/// - `kappa` — welfare weight of the good-2 externality (finite).
///
/// Default:
/// - `A = 1`, `γ = 0.5`, `α = 0.3`, `ν = 1`, `ε = 2`, `κ = 0.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParameters {
    pub a: f64,
    pub gamma: f64,
    pub alpha: f64,
    pub nu: f64,
    pub epsilon: f64,
    pub kappa: f64,
}

impl ModelParameters {
    /// Construct validated parameters.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidParameter`] for the first field outside
    /// its admissible range.
    pub fn new(
        a: f64, gamma: f64, alpha: f64, nu: f64, epsilon: f64, kappa: f64,
    ) -> ModelResult<Self> {
        let params = Self { a, gamma, alpha, nu, epsilon, kappa };
        params.validate()?;
        Ok(params)
    }

    /// Re-check the invariants. Solver entry points call this because the
    /// fields are public.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidParameter`] naming the offending field.
    pub fn validate(&self) -> ModelResult<()> {
        positive("A", self.a)?;
        unit_interval("gamma", self.gamma)?;
        unit_interval("alpha", self.alpha)?;
        positive("nu", self.nu)?;
        positive("epsilon", self.epsilon)?;
        if !self.kappa.is_finite() {
            return Err(ModelError::InvalidParameter {
                name: "kappa",
                value: self.kappa,
                reason: "Externality weight must be finite.",
            });
        }
        Ok(())
    }

    /// Same parameters with a different externality weight.
    pub fn with_kappa(self, kappa: f64) -> ModelResult<Self> {
        Self::new(self.a, self.gamma, self.alpha, self.nu, self.epsilon, kappa)
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self { a: 1.0, gamma: 0.5, alpha: 0.3, nu: 1.0, epsilon: 2.0, kappa: 0.1 }
    }
}

// ---- Helper Methods ----

fn positive(name: &'static str, value: f64) -> ModelResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ModelError::InvalidParameter {
            name,
            value,
            reason: "Must be finite and > 0.",
        });
    }
    Ok(())
}

fn unit_interval(name: &'static str, value: f64) -> ModelResult<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(ModelError::InvalidParameter {
            name,
            value,
            reason: "Must lie strictly between 0 and 1.",
        });
    }
    Ok(())
}
