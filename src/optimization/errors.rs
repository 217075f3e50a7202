use argmin::core::{ArgminError, Error};

use crate::economy::errors::ModelError;

/// Crate-wide result alias for optimizer and root-finder operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MinimizerOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// Invalid search method name.
    InvalidSearchMethod {
        name: String,
        reason: &'static str,
    },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    /// Nelder–Mead simplex step needs to be positive and finite.
    InvalidSimplexStep {
        value: f64,
        reason: &'static str,
    },

    // ---- Root-finder options ----
    /// Root tolerance needs to be positive and finite.
    InvalidRootTol {
        tol: f64,
        reason: &'static str,
    },

    /// Invalid Jacobian scheme name.
    InvalidJacobianScheme {
        name: String,
        reason: &'static str,
    },

    /// Bracket endpoints must be finite with lower < upper.
    InvalidBracket {
        lower: f64,
        upper: f64,
        reason: &'static str,
    },

    /// Starting point entries must be finite.
    InvalidStartingPoint {
        index: usize,
        value: f64,
    },

    /// Parameter vector length does not match the objective.
    ParameterDimMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Residual systems ----
    /// Residual vector length does not match the number of unknowns.
    ResidualDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Residual elements need to be finite.
    NonFiniteResidual {
        index: usize,
        value: f64,
    },

    /// Finite-difference Jacobian contains a non-finite entry.
    InvalidJacobian {
        row: usize,
        col: usize,
        value: f64,
    },

    /// Newton system could not be solved (zero pivot or non-finite step).
    SingularJacobian {
        iteration: usize,
    },

    // ---- Convergence ----
    /// Iteration budget exhausted before the residual tolerance was met.
    MaxItersReached {
        iterations: usize,
        residual_norm: f64,
    },

    /// Backtracking could not find a step that reduces the residual norm.
    LineSearchStalled {
        iteration: usize,
        residual_norm: f64,
    },

    /// No sign change found while expanding a bracket.
    BracketNotFound {
        lower: f64,
        upper: f64,
        expansions: usize,
    },

    /// Scalar root finder terminated without reporting convergence.
    RootNotConverged {
        status: String,
        iterations: usize,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Model ----
    /// A model evaluation failed inside an objective.
    ModelFailure {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl OptError {
    /// `true` for failures caused by an exhausted iteration budget or a
    /// solver that could not make progress, as opposed to bad settings.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            OptError::MaxItersReached { .. }
                | OptError::LineSearchStalled { .. }
                | OptError::BracketNotFound { .. }
                | OptError::RootNotConverged { .. }
                | OptError::SingularJacobian { .. }
        )
    }
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Gradient optimization not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MinimizerOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidSearchMethod { name, reason } => {
                write!(f, "Invalid search method '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            OptError::InvalidSimplexStep { value, reason } => {
                write!(f, "Invalid simplex step {value}: {reason}")
            }

            // ---- Root-finder options ----
            OptError::InvalidRootTol { tol, reason } => {
                write!(f, "Invalid root tolerance {tol}: {reason}")
            }
            OptError::InvalidJacobianScheme { name, reason } => {
                write!(f, "Invalid Jacobian scheme '{name}': {reason}")
            }
            OptError::InvalidBracket { lower, upper, reason } => {
                write!(f, "Invalid bracket [{lower}, {upper}]: {reason}")
            }
            OptError::InvalidStartingPoint { index, value } => {
                write!(f, "Invalid starting point at index {index}: {value}, must be finite")
            }
            OptError::ParameterDimMismatch { expected, found } => {
                write!(f, "Parameter dimension mismatch: expected {expected}, found {found}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Residual systems ----
            OptError::ResidualDimMismatch { expected, found } => {
                write!(f, "Residual dimension mismatch: expected {expected}, found {found}")
            }
            OptError::NonFiniteResidual { index, value } => {
                write!(f, "Non-finite residual at index {index}: {value}")
            }
            OptError::InvalidJacobian { row, col, value } => {
                write!(f, "Invalid Jacobian at ({row}, {col}): {value}, must be finite")
            }
            OptError::SingularJacobian { iteration } => {
                write!(f, "Singular Jacobian at Newton iteration {iteration}")
            }

            // ---- Convergence ----
            OptError::MaxItersReached { iterations, residual_norm } => {
                write!(
                    f,
                    "No convergence after {iterations} iterations (residual norm {residual_norm:e})"
                )
            }
            OptError::LineSearchStalled { iteration, residual_norm } => {
                write!(
                    f,
                    "Backtracking stalled at iteration {iteration} (residual norm {residual_norm:e})"
                )
            }
            OptError::BracketNotFound { lower, upper, expansions } => {
                write!(
                    f,
                    "No sign change in [{lower}, {upper}] after {expansions} bracket expansions"
                )
            }
            OptError::RootNotConverged { status, iterations } => {
                write!(f, "Root finder stopped after {iterations} iterations: {status}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Model ----
            OptError::ModelFailure { text } => {
                write!(f, "Model evaluation failed: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

impl From<ModelError> for OptError {
    fn from(err: ModelError) -> Self {
        OptError::ModelFailure { text: err.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Round-tripping an `OptError` through `argmin::core::Error`.
    // - Mapping of `ArgminError` variants into `OptError`.
    // - The convergence-failure classification.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // An `OptError` raised inside an argmin callback must come back out of
    // the executor as the same variant, not as an opaque backend error.
    //
    // Given
    // -----
    // - `OptError::NonFiniteCost` converted into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - Converting back yields the original variant and payload.
    fn opt_error_survives_argmin_round_trip() {
        // Arrange
        let original = OptError::NonFiniteCost { value: f64::INFINITY };
        let wrapped: Error = original.clone().into();

        // Act
        let recovered = OptError::from(wrapped);

        // Assert
        assert_eq!(recovered, original);
    }

    #[test]
    // Purpose
    // -------
    // Verify that argmin's own error variants map onto the wrapper variants.
    //
    // Given
    // -----
    // - `ArgminError::InvalidParameter` with a message.
    //
    // Expect
    // ------
    // - `OptError::InvalidParameter` carrying the same message.
    fn argmin_invalid_parameter_maps_to_wrapper() {
        // Arrange
        let err: Error = ArgminError::InvalidParameter { text: "bad".to_string() }.into();

        // Act
        let mapped = OptError::from(err);

        // Assert
        assert_eq!(mapped, OptError::InvalidParameter { text: "bad".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // Check which variants count as convergence failures.
    //
    // Given
    // -----
    // - One convergence variant and one configuration variant.
    //
    // Expect
    // ------
    // - Only the convergence variant is classified as such.
    fn convergence_failures_are_classified() {
        let stalled = OptError::LineSearchStalled { iteration: 3, residual_norm: 1.0 };
        let config = OptError::InvalidRootTol { tol: -1.0, reason: "Tolerance must be positive." };

        assert!(stalled.is_convergence_failure());
        assert!(!config.is_convergence_failure());
    }
}
