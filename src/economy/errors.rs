//! Errors for the production economy (parameter validation, domain
//! violations in the firm and household blocks, and solver failures).
//!
//! ## Conventions
//! - Every variant belongs to one [`ErrorKind`]: `Domain` for undefined or
//!   non-positive intermediate quantities, `Convergence` for exhausted
//!   solver budgets, `Configuration` for invalid inputs and settings.
//! - Solver errors arriving as [`OptError`] are reclassified through
//!   `From<OptError>`; model errors raised inside residual systems pass
//!   through the solvers unchanged.
//! - Domain and convergence errors are recoverable below the welfare
//!   objective, where they become a `+∞` cost.
use crate::optimization::errors::OptError;

/// Result alias for economy operations that may produce [`ModelError`].
pub type ModelResult<T> = Result<T, ModelError>;

/// Coarse classification of [`ModelError`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An intermediate quantity is non-positive or undefined.
    Domain,
    /// A root finder exhausted its budget or could not make progress.
    Convergence,
    /// Invalid parameters, options, or starting points.
    Configuration,
}

/// Unified error type for the economy layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Configuration ----
    /// A model parameter violates its admissible range.
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    /// A starting value handed to a solver is unusable.
    InvalidInitialGuess { name: &'static str, value: f64, reason: &'static str },

    /// Search bounds must be ordered and not NaN.
    InvalidBounds { name: &'static str, lower: f64, upper: f64 },

    /// Unknown policy regime name.
    UnknownRegime { name: String },

    /// Solver settings rejected by the numerical layer.
    SolverConfig { text: String },

    // ---- Domain ----
    /// Wage must be finite and > 0.
    NonPositiveWage { value: f64 },

    /// Producer price must be finite and > 0.
    NonPositivePrice { name: &'static str, value: f64 },

    /// Consumer price of good 2 (`p2 + tau`) must be > 0.
    NonPositiveConsumerPrice { value: f64 },

    /// Household consumption must be > 0.
    NonPositiveConsumption { name: &'static str, value: f64 },

    /// Labor must be finite and, depending on context, non-negative or > 0.
    InvalidLabor { value: f64, reason: &'static str },

    /// A derived quantity is NaN or infinite.
    NonFiniteQuantity { name: &'static str, value: f64 },

    // ---- Convergence ----
    /// No sign change of the labor first-order condition was found.
    BracketNotFound { lower: f64, upper: f64, expansions: usize },

    /// Scalar root finder stopped without converging.
    RootNotConverged { status: String, iterations: usize },

    /// Newton iteration budget exhausted.
    NotConverged { iterations: usize, residual_norm: f64 },

    /// Newton backtracking found no acceptable step.
    Stalled { iteration: usize, residual_norm: f64 },

    /// Newton system could not be solved.
    SingularJacobian { iteration: usize },

    // ---- Fallback ----
    UnknownError,
}

impl ModelError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::InvalidParameter { .. }
            | ModelError::InvalidInitialGuess { .. }
            | ModelError::InvalidBounds { .. }
            | ModelError::UnknownRegime { .. }
            | ModelError::SolverConfig { .. }
            | ModelError::UnknownError => ErrorKind::Configuration,
            ModelError::NonPositiveWage { .. }
            | ModelError::NonPositivePrice { .. }
            | ModelError::NonPositiveConsumerPrice { .. }
            | ModelError::NonPositiveConsumption { .. }
            | ModelError::InvalidLabor { .. }
            | ModelError::NonFiniteQuantity { .. } => ErrorKind::Domain,
            ModelError::BracketNotFound { .. }
            | ModelError::RootNotConverged { .. }
            | ModelError::NotConverged { .. }
            | ModelError::Stalled { .. }
            | ModelError::SingularJacobian { .. } => ErrorKind::Convergence,
        }
    }

    /// Shorthand for `kind() == ErrorKind::Domain`.
    pub fn is_domain(&self) -> bool {
        self.kind() == ErrorKind::Domain
    }

    /// Shorthand for `kind() == ErrorKind::Convergence`.
    pub fn is_convergence(&self) -> bool {
        self.kind() == ErrorKind::Convergence
    }
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            ModelError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid parameter {name} = {value}: {reason}")
            }
            ModelError::InvalidInitialGuess { name, value, reason } => {
                write!(f, "Invalid initial guess for {name} = {value}: {reason}")
            }
            ModelError::InvalidBounds { name, lower, upper } => {
                write!(f, "Bounds for {name} must satisfy lower <= upper; got [{lower}, {upper}]")
            }
            ModelError::UnknownRegime { name } => {
                write!(
                    f,
                    "Unknown policy regime '{name}'. Valid options are case insensitive 'free' or 'balanced'."
                )
            }
            ModelError::SolverConfig { text } => {
                write!(f, "Solver configuration error: {text}")
            }
            // ---- Domain ----
            ModelError::NonPositiveWage { value } => {
                write!(f, "Wage must be finite and > 0; got: {value}")
            }
            ModelError::NonPositivePrice { name, value } => {
                write!(f, "Price {name} must be finite and > 0; got: {value}")
            }
            ModelError::NonPositiveConsumerPrice { value } => {
                write!(f, "Consumer price of good 2 (p2 + tau) must be > 0; got: {value}")
            }
            ModelError::NonPositiveConsumption { name, value } => {
                write!(f, "Consumption {name} must be > 0; got: {value}")
            }
            ModelError::InvalidLabor { value, reason } => {
                write!(f, "Invalid labor {value}: {reason}")
            }
            ModelError::NonFiniteQuantity { name, value } => {
                write!(f, "Quantity {name} is non-finite: {value}")
            }
            // ---- Convergence ----
            ModelError::BracketNotFound { lower, upper, expansions } => {
                write!(
                    f,
                    "No sign change on [{lower}, {upper}] after {expansions} bracket expansions."
                )
            }
            ModelError::RootNotConverged { status, iterations } => {
                write!(f, "Root finder did not converge after {iterations} iterations: {status}")
            }
            ModelError::NotConverged { iterations, residual_norm } => {
                write!(
                    f,
                    "Equilibrium not reached after {iterations} iterations; residual norm {residual_norm:e}"
                )
            }
            ModelError::Stalled { iteration, residual_norm } => {
                write!(
                    f,
                    "Equilibrium search stalled at iteration {iteration}; residual norm {residual_norm:e}"
                )
            }
            ModelError::SingularJacobian { iteration } => {
                write!(f, "Market-clearing Jacobian is singular at iteration {iteration}.")
            }
            // ---- Fallback ----
            ModelError::UnknownError => {
                write!(f, "An unknown model error occurred.")
            }
        }
    }
}

impl From<OptError> for ModelError {
    fn from(err: OptError) -> ModelError {
        match err {
            OptError::BracketNotFound { lower, upper, expansions } => {
                ModelError::BracketNotFound { lower, upper, expansions }
            }
            OptError::RootNotConverged { status, iterations } => {
                ModelError::RootNotConverged { status, iterations }
            }
            OptError::MaxItersReached { iterations, residual_norm } => {
                ModelError::NotConverged { iterations, residual_norm }
            }
            OptError::LineSearchStalled { iteration, residual_norm } => {
                ModelError::Stalled { iteration, residual_norm }
            }
            OptError::SingularJacobian { iteration } => ModelError::SingularJacobian { iteration },
            OptError::NonFiniteResidual { value, .. } => {
                ModelError::NonFiniteQuantity { name: "residual", value }
            }
            OptError::InvalidJacobian { value, .. } => {
                ModelError::NonFiniteQuantity { name: "jacobian", value }
            }
            OptError::InvalidStartingPoint { value, .. } => ModelError::InvalidInitialGuess {
                name: "starting point",
                value,
                reason: "Starting values must be finite.",
            },
            OptError::UnknownError => ModelError::UnknownError,
            other => ModelError::SolverConfig { text: other.to_string() },
        }
    }
}
