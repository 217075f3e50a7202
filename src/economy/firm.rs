//! Firm block: profit-maximizing Cobb–Douglas producers.
//!
//! Each good is produced by a price-taking firm with technology
//! `y = A·l^γ`. Given its output price `p` and the wage `w`, the firm hires
//!
//! ```text
//! l = (p·A·γ / w)^(1 / (1 − γ))
//! ```
//!
//! which solves `p·A·γ·l^(γ−1) = w`, and earns `π = p·y − w·l`.
//! Functions here are pure; the parameters are assumed validated.
use crate::economy::{
    errors::{ModelError, ModelResult},
    params::ModelParameters,
};

/// Labor, output, and profit of one firm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirmOutcome {
    pub labor: f64,
    pub output: f64,
    pub profit: f64,
}

/// Profit-maximizing labor demand at `(price, wage)`.
///
/// # Errors
/// - [`ModelError::NonPositiveWage`] unless `wage` is finite and > 0.
/// - [`ModelError::NonPositivePrice`] unless `price` is finite and > 0.
pub fn labor_demand(price: f64, wage: f64, params: &ModelParameters) -> ModelResult<f64> {
    if !wage.is_finite() || wage <= 0.0 {
        return Err(ModelError::NonPositiveWage { value: wage });
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(ModelError::NonPositivePrice { name: "price", value: price });
    }
    let labor = (price * params.a * params.gamma / wage).powf(1.0 / (1.0 - params.gamma));
    if !labor.is_finite() {
        return Err(ModelError::NonFiniteQuantity { name: "labor demand", value: labor });
    }
    Ok(labor)
}

/// Output `A·l^γ` for a given labor input.
pub fn production(labor: f64, params: &ModelParameters) -> f64 {
    params.a * labor.powf(params.gamma)
}

/// Labor demand, output, and profit at `(price, wage)`.
///
/// # Errors
/// Same as [`labor_demand`].
pub fn firm_outcome(price: f64, wage: f64, params: &ModelParameters) -> ModelResult<FirmOutcome> {
    let labor = labor_demand(price, wage, params)?;
    let output = production(labor, params);
    let profit = price * output - wage * labor;
    Ok(FirmOutcome { labor, output, profit })
}
