//! Finite-difference Jacobians for residual systems.
//!
//! The whole residual vector is differenced at once with `finitediff`, so
//! each stencil point costs a single evaluation of the system: `2n` for the
//! central scheme (one directional derivative per column) and `n + 1` for
//! the forward scheme. The FD closure cannot fail, so errors raised by the
//! system are parked in a `RefCell` and the closure returns a `NaN` vector;
//! the captured error is surfaced after the stencil completes. A central
//! stencil that fails falls back to forward differences.
use std::cell::RefCell;

use finitediff::FiniteDiff;
use ndarray::Array2;

use crate::optimization::{
    errors::{OptError, OptResult},
    root_finding::traits::{Jacobian, JacobianScheme, Point, ResidualSystem},
};

/// Approximate the Jacobian of `system` at `x`, with `jac[[i, j]] = ∂F_i/∂x_j`.
///
/// # Errors
/// - Any error raised by `system.residuals` while evaluating the stencil
///   (after the forward-difference retry for central schemes).
/// - [`OptError::InvalidJacobian`] if an entry is non-finite.
pub fn fd_jacobian<S: ResidualSystem>(
    system: &S, x: &Point, scheme: JacobianScheme,
) -> Result<Jacobian, S::Error> {
    let n = x.len();
    let closure_err: RefCell<Option<S::Error>> = RefCell::new(None);
    let residuals = |x: &Point| -> Point {
        match system.residuals(x) {
            Ok(r) if r.len() == n => r,
            Ok(_) => Point::from_elem(n, f64::NAN),
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                Point::from_elem(n, f64::NAN)
            }
        }
    };

    if scheme == JacobianScheme::Central {
        let jac = central_columns(x, &residuals);
        if closure_err.borrow().is_none() && jac.iter().all(|v| v.is_finite()) {
            return Ok(jac);
        }
        closure_err.replace(None);
    }

    // finitediff lays out `[[j, i]] = ∂F_i/∂x_j`.
    let jac = x.forward_jacobian(&residuals).reversed_axes();
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_jacobian(&jac)?;
    Ok(jac)
}

/// Validate that every Jacobian entry is finite.
///
/// # Errors
/// Returns [`OptError::InvalidJacobian`] for the first offending entry.
pub fn validate_jacobian(jac: &Jacobian) -> OptResult<()> {
    for ((row, col), &value) in jac.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidJacobian { row, col, value });
        }
    }
    Ok(())
}

// ---- Helper Methods ----

/// Column `j` is the central directional derivative along `e_j`.
fn central_columns(x: &Point, residuals: &dyn Fn(&Point) -> Point) -> Jacobian {
    let n = x.len();
    let mut jac = Array2::zeros((n, n));
    for col in 0..n {
        let mut direction = Point::zeros(n);
        direction[col] = 1.0;
        jac.column_mut(col).assign(&x.central_jacobian_vec_prod(residuals, &direction));
    }
    jac
}
