//! Public API surface for objective minimization.
//!
//! - [`Objective`]: trait users implement for a scalar cost `c(θ)`.
//! - [`MinimizerOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`SearchMethod`] and [`LineSearcher`]: solver selection.
//! - [`MinimizeOutcome`]: normalized result returned by `minimize`.
//!
//! Convention: the cost is minimized as-is. An analytic gradient, when
//! provided, is the gradient of the cost.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        types::{Cost, FnEvalMap, Grad, Theta},
        validation::{
            validate_theta_hat, validate_value, verify_simplex_step, verify_tol_cost,
            verify_tol_grad,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// User-implemented objective interface.
///
/// - `type Data`: per-problem data carried into `value`/`grad`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `c(θ)`. Derivative
///   free searches accept `+∞` as "infeasible"; gradient searches require a
///   finite value.
/// - `check(&Theta, &Data) -> OptResult<()>`: reject obviously invalid
///   `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: analytic gradient `∇c(θ)`.
///   Finite differences are used when it is not implemented.
pub trait Objective {
    type Data: 'static;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Outer search algorithm.
///
/// Variants:
/// - `NelderMead`: derivative-free simplex search; tolerates `+∞` costs.
/// - `Lbfgs`: quasi-Newton with line search; needs finite costs.
///
/// Parsing:
/// Case-insensitive `"neldermead"` / `"nelder-mead"` / `"lbfgs"` /
/// `"l-bfgs"`. Unknown names return `OptError::InvalidSearchMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMethod {
    NelderMead,
    Lbfgs,
}

impl FromStr for SearchMethod {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neldermead" | "nelder-mead" => Ok(SearchMethod::NelderMead),
            "lbfgs" | "l-bfgs" => Ok(SearchMethod::Lbfgs),
            _ => Err(OptError::InvalidSearchMethod {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'NelderMead' or 'LBFGS'.",
            }),
        }
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parsing is case-insensitive (`"MoreThuente"`, `"HagerZhang"`); unknown
/// names return `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Minimizer configuration.
///
/// Fields:
/// - `tols` — stopping rules, see [`Tolerances`].
/// - `method` — outer search algorithm.
/// - `line_searcher` — line search for `SearchMethod::Lbfgs`.
/// - `simplex_step` — edge length of the initial Nelder–Mead simplex
///   `θ0 + step·e_i`.
/// - `verbose` — attach a terminal observer (behind the `obs_slog` feature).
/// - `lbfgs_mem` — optional L-BFGS history; `DEFAULT_LBFGS_MEM` otherwise.
///
/// Default:
/// - Nelder–Mead, `simplex_step = 0.1`, `tol_cost = 1e-10` (simplex cost
///   standard deviation), `tol_grad = 1e-6`, `max_iter = 500`,
///   More–Thuente, not verbose.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizerOptions {
    pub tols: Tolerances,
    pub method: SearchMethod,
    pub line_searcher: LineSearcher,
    pub simplex_step: f64,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MinimizerOptions {
    /// Construct validated minimizer options.
    ///
    /// # Errors
    /// - [`OptError::InvalidSimplexStep`] for a non-positive or non-finite step.
    /// - [`OptError::InvalidLBFGSMem`] when `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, method: SearchMethod, line_searcher: LineSearcher, simplex_step: f64,
        verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        verify_simplex_step(simplex_step)?;
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self { tols, method, line_searcher, simplex_step, verbose, lbfgs_mem })
    }
}

impl Default for MinimizerOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(1e-6), tol_cost: Some(1e-10), max_iter: Some(500) },
            method: SearchMethod::NelderMead,
            line_searcher: LineSearcher::MoreThuente,
            simplex_step: 0.1,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules.
///
/// Fields:
/// - `tol_grad` — L-BFGS gradient-norm tolerance.
/// - `tol_cost` — L-BFGS cost-change tolerance; for Nelder–Mead, the
///   standard deviation of simplex costs below which the search stops.
/// - `max_iter` — hard iteration cap.
///
/// At least one field must be `Some`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] when all fields are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-positive or non-finite tolerances.
    /// - [`OptError::InvalidMaxIter`] when `max_iter == Some(0)`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Normalized result of a minimization.
///
/// - `theta_hat`: best parameter found.
/// - `value`: best cost `c(θ̂)`.
/// - `converged`: `true` only when the solver met its own tolerance.
/// - `status`: argmin termination status, formatted.
/// - `iterations`: iterations performed.
/// - `fn_evals`: argmin evaluation counters.
/// - `grad_norm`: final gradient norm when the method tracks one.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimizeOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl MinimizeOutcome {
    /// Build an outcome from raw solver state.
    ///
    /// # Errors
    /// - [`OptError::MissingThetaHat`] / [`OptError::InvalidThetaHat`] for a
    ///   missing or non-finite best parameter.
    /// - [`OptError::NonFiniteCost`] when no finite cost was ever found.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let converged = matches!(
            termination,
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
                | TerminationStatus::Terminated(TerminationReason::TargetCostReached)
        );
        let status = match termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            other => format!("{other:?}"),
        };
        let iterations = iterations as usize;
        let grad_norm = grad.map(|g| g.l2_norm());
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm })
    }

    /// Number of cost evaluations, or 0 if the solver did not report one.
    pub fn cost_evals(&self) -> u64 {
        self.fn_evals.get("cost_count").copied().unwrap_or(0)
    }

    /// Fold a follow-up run started from `self.theta_hat` into this outcome.
    ///
    /// Iterations and evaluation counters are summed. The point, cost, and
    /// status come from `next` only when it strictly lowered the cost.
    pub fn chain(mut self, next: MinimizeOutcome) -> MinimizeOutcome {
        let iterations = self.iterations + next.iterations;
        let mut fn_evals = std::mem::take(&mut self.fn_evals);
        for (key, count) in &next.fn_evals {
            *fn_evals.entry(key.clone()).or_insert(0) += count;
        }
        let mut kept = if next.value < self.value { next } else { self };
        kept.iterations = iterations;
        kept.fn_evals = fn_evals;
        kept
    }
}
