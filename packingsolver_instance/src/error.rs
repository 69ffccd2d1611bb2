//! Error taxonomy shared across the packing-solver workspace.
//!
//! Kinds, not type names: each variant corresponds to one of the kinds named
//! by the engine's error design (configuration, internal-assertion,
//! unsupported-objective, external-solver, cancellation). Cancellation is
//! modeled as a normal return elsewhere, not an error variant here.

use thiserror::Error;

/// Errors raised while building an [`crate::Instance`] or evaluating a
/// branching scheme against it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PackingError {
    /// A bad instance definition: missing column, non-positive dimension,
    /// `copies_min > copies`, or an objective/bin-count combination that the
    /// objective forbids. Raised at instance-build time; fatal for the call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A branching scheme computed an impossible successor node (negative
    /// waste, or a `to_solution` whose extent disagrees with the node's
    /// tracked extent). Indicates a bug in the branching scheme, not bad
    /// input; the caller should abort the search.
    #[error("infeasibility assertion failed at node {node_id}: {detail}")]
    InfeasibilityAssertion {
        /// The node at which the invariant failed.
        node_id: u64,
        /// Human-readable description of the violated invariant.
        detail: String,
    },

    /// A branching scheme was asked to evaluate `better`/`bound` for an
    /// objective it does not implement.
    #[error("objective {objective} is not supported by this branching scheme")]
    UnsupportedObjective {
        /// Name of the unsupported objective.
        objective: String,
    },

    /// The external nonlinear solver required by the irregular/NLP placement
    /// path is unavailable at runtime. Surfaces as an empty solution pool
    /// for that path; other branching schemes remain usable.
    #[error("external solver unavailable: {0}")]
    ExternalSolverUnavailable(String),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = core::result::Result<T, PackingError>;
