//! Finite-difference gradients of a cost closure with error capture.
//!
//! `finitediff` needs closures returning `f64`, so cost errors are parked
//! in a shared `RefCell` and the closure returns `NaN`. Central differences
//! are tried first; a captured error or an invalid gradient triggers a
//! single forward-difference retry.
use std::cell::RefCell;

use argmin::core::Error;
use finitediff::FiniteDiff;

use crate::optimization::minimizer::{
    types::{Grad, Theta},
    validation::validate_grad,
};

/// Central-difference gradient of `func` at `theta`, with forward fallback.
///
/// # Errors
/// - Any error captured in `closure_err` during the forward retry.
/// - Gradient validation errors from the forward retry.
pub fn fd_gradient<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    let grad = theta.central_diff(func);
    if closure_err.borrow().is_none() && validate_grad(&grad, theta.len()).is_ok() {
        return Ok(grad);
    }
    run_fd_diff(theta, func, closure_err)
}

/// Forward-difference gradient of `func` at `theta`, with error capture.
///
/// Clears `closure_err`, runs `forward_diff`, and surfaces any captured
/// error before validating the result.
///
/// # Errors
/// Returns any error captured during evaluation of `func` or raised by
/// gradient validation.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Accuracy of the central path on a smooth quadratic.
    // - Fallback to forward differences when the central stencil fails.
    // - Surfacing of an error raised at the base point.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The central path reproduces an analytic gradient.
    //
    // Given
    // -----
    // - c(θ) = θ₀² + 3θ₁ at (1, 2).
    //
    // Expect
    // ------
    // - Gradient ≈ (2, 3).
    fn central_gradient_of_quadratic() {
        let closure_err = RefCell::new(None);
        let f = |t: &Theta| t[0] * t[0] + 3.0 * t[1];

        let g = fd_gradient(&array![1.0, 2.0], &f, &closure_err).expect("Smooth cost");

        assert_abs_diff_eq!(g[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(g[1], 3.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A cost that fails just below the evaluation point is differentiated
    // with forward steps instead.
    //
    // Given
    // -----
    // - c(θ) = θ₀ for θ₀ ≥ 0 and NaN otherwise, at θ₀ = 0.
    //
    // Expect
    // ------
    // - Gradient ≈ 1 via the forward stencil.
    fn falls_back_to_forward_differences() {
        let closure_err = RefCell::new(None);
        let f = |t: &Theta| if t[0] >= 0.0 { t[0] } else { f64::NAN };

        let g = fd_gradient(&array![0.0], &f, &closure_err).expect("Forward stencil is valid");

        assert_abs_diff_eq!(g[0], 1.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // An error captured at the base point is returned, not a NaN gradient.
    //
    // Given
    // -----
    // - A closure that always stores `ModelFailure` and returns NaN.
    //
    // Expect
    // ------
    // - The stored error converts back into `OptError::ModelFailure`.
    fn captured_errors_are_returned() {
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let f = |_t: &Theta| {
            let mut slot = closure_err.borrow_mut();
            if slot.is_none() {
                *slot = Some(OptError::ModelFailure { text: "boom".to_string() }.into());
            }
            f64::NAN
        };

        let err = fd_gradient(&array![0.0], &f, &closure_err).expect_err("Cost always fails");

        assert!(matches!(OptError::from(err), OptError::ModelFailure { .. }));
    }
}
