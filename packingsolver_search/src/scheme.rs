//! The trait every concrete branching scheme implements, and the generic
//! iterative beam search driver consumes.
//!
//! A scheme owns its own node arena internally (each concrete scheme wraps
//! [`packingsolver_domination::Arena`]) and exposes nodes to the driver only
//! through the opaque [`NodeKey`] handle; the driver never sees a concrete
//! `Node` value except through [`BranchingScheme::node`]. This keeps the
//! driver itself free of any geometry, so the same search loop runs the
//! rectangle, rectangle-guillotine, box, and box-stacks schemes unchanged.

use packingsolver_domination::{NodeHasher, NodeKey};
use packingsolver_solution::Solution;

/// A branching scheme: the set of operations the iterative beam search
/// driver needs to expand, rank, bound, and terminate a partial-placement
/// search tree.
///
/// Implementors are expected to be cheap to move (typically a reference to
/// an [`packingsolver_instance::Instance`] plus an internal node arena) and
/// are used by exactly one search invocation at a time; [`crate::run_parallel`]
/// gives each invocation its own scheme instance rather than sharing one
/// across threads.
pub trait BranchingScheme<'i> {
    /// The concrete node payload this scheme stores in its arena. Cloned
    /// when resolving a history bucket entry, so keep it cheap.
    type Node: Clone;

    /// The frontier-equality hasher this scheme uses for domination
    /// (`NodeHasher::frontier_hash`/`frontier_eq` over the node's geometric
    /// state only).
    type Hasher: NodeHasher<Self::Node>;

    /// Inserts a fresh root node and returns its key.
    fn root(&mut self) -> NodeKey;

    /// Reads a node by key. Panics if the key does not resolve (the driver
    /// never holds a key past the arena that produced it).
    fn node(&self, key: NodeKey) -> &Self::Node;

    /// The node's depth (number of insertions since the root). Most
    /// insertions advance depth by exactly one; a scheme may advance by two
    /// for a single insertion that places a pair of items together (the
    /// rectangle-guillotine two-item variant).
    fn depth(&self, key: NodeKey) -> u32;

    /// Expands every feasible insertion from `key`, inserting each result
    /// into the arena and returning its key.
    fn children(&mut self, key: NodeKey) -> Vec<NodeKey>;

    /// Whether `key` has no feasible insertion left: either every item type
    /// is fully packed, or none of the remaining ones can be placed (a dead
    /// end). Either way `key` is terminal along this branch and is not
    /// expanded into children.
    fn leaf(&self, key: NodeKey) -> bool;

    /// Whether `candidate` can be pruned: `true` means no completion of
    /// `candidate` can beat `incumbent` under the instance's objective, so
    /// the driver discards it without expanding it further. `incumbent` is
    /// `None` before any complete solution has been found.
    fn bound(&self, candidate: NodeKey, incumbent: Option<&Solution<'_>>) -> bool;

    /// Frontier priority order: `Less` means `a` is explored before `b`.
    /// Used both to pick the next node to expand (best-first) and to decide
    /// which node to evict when a depth layer's queue is full.
    fn compare(&self, a: NodeKey, b: NodeKey) -> std::cmp::Ordering;

    /// Whether node value `a` dominates (is strictly preferred to) node
    /// value `b` among nodes with an equal geometric frontier. Used by the
    /// per-depth history to decide whether a newly produced duplicate
    /// should evict the one already recorded.
    fn node_better(&self, a: &Self::Node, b: &Self::Node) -> bool;

    /// Materializes the complete [`Solution`] represented by the path from
    /// the root to `key`.
    fn to_solution(&self, key: NodeKey) -> Solution<'i>;

    /// The hasher used to bucket this scheme's nodes for domination.
    fn node_hasher(&self) -> Self::Hasher;
}
