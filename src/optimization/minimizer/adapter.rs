//! Adapter that exposes a user [`Objective`] as an `argmin` problem.
//!
//! The cost is passed through unchanged. Two evaluation modes exist:
//! strict (gradient methods), where any non-finite cost is an error, and
//! infeasible-tolerant (simplex methods), where `+∞` is a legal cost and
//! `NaN` is read as `+∞`.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    minimizer::{
        finite_diff::fd_gradient,
        traits::Objective,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges a user [`Objective`] to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub data: &'a F::Data,
    pub allow_infeasible: bool,
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    /// Strict adapter: every cost must be finite.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data, allow_infeasible: false }
    }

    /// Adapter that lets `+∞` mark infeasible points.
    pub fn infeasible_tolerant(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data, allow_infeasible: true }
    }
}

impl<F: Objective> CostFunction for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `c(θ)`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user's `value`.
    /// - `NonFiniteCost` for non-finite values in strict mode, and for `−∞`
    ///   in tolerant mode.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let output = self.f.value(theta, self.data)?;
        if output.is_finite() {
            return Ok(output);
        }
        if self.allow_infeasible && (output.is_nan() || output == f64::INFINITY) {
            return Ok(f64::INFINITY);
        }
        Err((OptError::NonFiniteCost { value: output }).into())
    }
}

impl<F: Objective> Gradient for ArgMinAdapter<'_, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate `∇c(θ)`: the user's analytic gradient when implemented,
    /// otherwise a finite-difference gradient of [`CostFunction::cost`].
    ///
    /// # Errors
    /// - Propagates user gradient errors other than `GradientNotImplemented`.
    /// - Propagates cost errors raised during finite differencing.
    /// - Gradient validation errors (length, finiteness).
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                fd_gradient(theta, &cost_func, &closure_err)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptResult;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Strict vs infeasible-tolerant handling of non-finite costs.
    // - Analytic gradient passthrough and FD fallback.
    // -------------------------------------------------------------------------

    /// c(θ) = ‖θ‖², infeasible (`+∞`) when θ₀ < 0, NaN when θ₀ > 10.
    struct Bowl;

    impl Objective for Bowl {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
            if theta[0] < 0.0 {
                return Ok(f64::INFINITY);
            }
            if theta[0] > 10.0 {
                return Ok(f64::NAN);
            }
            Ok(theta.dot(theta))
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    struct BowlWithGrad;

    impl Objective for BowlWithGrad {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
            Ok(theta.dot(theta))
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _data: &()) -> OptResult<Grad> {
            Ok(theta * 2.0)
        }
    }

    #[test]
    // Purpose
    // -------
    // Strict mode rejects infinite and NaN costs; tolerant mode maps both
    // to `+∞`.
    //
    // Given
    // -----
    // - `Bowl` at θ = (-1, 0) and θ = (11, 0).
    //
    // Expect
    // ------
    // - Strict: `NonFiniteCost` errors. Tolerant: `+∞` twice.
    fn tolerant_mode_maps_non_finite_costs_to_infinity() {
        let strict = ArgMinAdapter::new(&Bowl, &());
        let tolerant = ArgMinAdapter::infeasible_tolerant(&Bowl, &());

        for theta in [array![-1.0, 0.0], array![11.0, 0.0]] {
            let err = strict.cost(&theta).expect_err("Strict mode rejects non-finite costs");
            assert!(matches!(OptError::from(err), OptError::NonFiniteCost { .. }));
            assert_eq!(tolerant.cost(&theta).unwrap(), f64::INFINITY);
        }
        assert_abs_diff_eq!(strict.cost(&array![1.0, 2.0]).unwrap(), 5.0);
    }

    #[test]
    // Purpose
    // -------
    // Analytic gradients are used as-is; missing ones are approximated.
    //
    // Given
    // -----
    // - `BowlWithGrad` and `Bowl` at (1, 2).
    //
    // Expect
    // ------
    // - Both give ≈ (2, 4).
    fn gradient_uses_analytic_or_finite_differences() {
        let theta = array![1.0, 2.0];

        let analytic = ArgMinAdapter::new(&BowlWithGrad, &()).gradient(&theta).unwrap();
        let numeric = ArgMinAdapter::new(&Bowl, &()).gradient(&theta).unwrap();

        assert_eq!(analytic, array![2.0, 4.0]);
        assert_abs_diff_eq!(numeric[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(numeric[1], 4.0, epsilon = 1e-6);
    }
}
