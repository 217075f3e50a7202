//! Validation helpers for minimizer options, gradients, and outcomes.
//!
//! Every check returns the first violation as an [`OptError`] and never
//! panics, so callers can use `?` on configuration and solver output alike.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::types::{Grad, Theta},
};

/// Gradient tolerance must be finite and strictly positive when present.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] otherwise.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Cost tolerance must be finite and strictly positive when present.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] otherwise.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Initial simplex edge length must be finite and strictly positive.
///
/// # Errors
/// Returns [`OptError::InvalidSimplexStep`] otherwise.
pub fn verify_simplex_step(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::InvalidSimplexStep { value, reason: "Simplex step must be finite." });
    }
    if value <= 0.0 {
        return Err(OptError::InvalidSimplexStep {
            value,
            reason: "Simplex step must be positive.",
        });
    }
    Ok(())
}

/// Every entry of a starting point must be finite.
///
/// # Errors
/// Returns [`OptError::InvalidStartingPoint`] for the first offending entry.
pub fn validate_theta0(theta0: &Theta) -> OptResult<()> {
    for (index, &value) in theta0.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidStartingPoint { index, value });
        }
    }
    Ok(())
}

/// Gradient must have length `dim` and finite entries.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] on a length mismatch.
/// - [`OptError::InvalidGradient`] for the first non-finite entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Unwrap the solver's best parameter and check that it is finite.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if the solver produced no parameter.
/// - [`OptError::InvalidThetaHat`] for the first non-finite entry.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Minimizer entries must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// The best cost must be finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] otherwise.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
