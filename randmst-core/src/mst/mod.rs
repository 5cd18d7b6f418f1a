//! Minimum spanning tree construction with Prim's algorithm.
//!
//! The driver grows a single tree from vertex 0 over the implicit complete
//! graph described by a [`DistanceOracle`]. Vertices outside the tree wait in
//! an [`IndexedMinHeap`] keyed by their cheapest known connection. After each
//! extraction every remaining vertex is relaxed against the new tree vertex.
//!
//! Two relaxation policies are provided:
//!
//! - [`RelaxationPolicy::Rebuild`] lowers keys in place and rebuilds the heap
//!   once per extraction. Each extraction costs `O(n)`, so a run costs
//!   `O(n^2)` heap work on top of the `O(n^2)` distance queries.
//! - [`RelaxationPolicy::SiftUp`] sifts each lowered key towards the root as
//!   soon as it changes, costing `O(log n)` per tightened key.
//!
//! Both visit every remaining vertex exactly once per extraction, so they
//! issue the same number of distance queries.

use std::fmt;

use tracing::{debug, instrument};

use crate::{
    DistanceOracle,
    heap::{HeapEntry, HeapError, IndexedMinHeap},
};

/// Key assigned to vertices with no known connection to the tree.
///
/// Every edge weight produced by the built-in oracles lies in `[0, 2]`.
pub const SENTINEL_DISTANCE: f64 = 3.0;

/// Errors returned while computing a minimum spanning tree.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
#[non_exhaustive]
pub enum MstError {
    /// The oracle describes a graph without vertices.
    #[error("cannot compute an MST for an empty graph")]
    EmptyGraph,
    /// The heap rejected an operation, indicating a driver logic error.
    #[error("heap contract violated: {0}")]
    Heap(#[from] HeapError),
}

impl MstError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> MstErrorCode {
        match self {
            Self::EmptyGraph => MstErrorCode::EmptyGraph,
            Self::Heap(_) => MstErrorCode::HeapContract,
        }
    }
}

/// Machine-readable error codes for [`MstError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MstErrorCode {
    /// The oracle describes a graph without vertices.
    EmptyGraph,
    /// The heap rejected an operation.
    HeapContract,
}

impl MstErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyGraph => "EMPTY_GRAPH",
            Self::HeapContract => "HEAP_CONTRACT",
        }
    }
}

/// How tightened keys are folded back into the heap order.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RelaxationPolicy {
    /// Lower keys in place, then rebuild the heap once per extraction.
    #[default]
    Rebuild,
    /// Sift every lowered key up immediately.
    SiftUp,
}

impl fmt::Display for RelaxationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rebuild => "rebuild",
            Self::SiftUp => "sift-up",
        })
    }
}

/// A tree edge joining `vertex` to its `parent`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeEdge {
    /// The vertex admitted to the tree.
    pub vertex: usize,
    /// The tree vertex it attached to.
    pub parent: usize,
    /// Weight of the connecting edge at admission time.
    pub weight: f64,
}

/// Result of one Prim run.
///
/// # Examples
/// ```
/// use randmst_core::{Dimension, Instance, RelaxationPolicy, prim_spanning_tree};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let instance = Instance::from_points(
///     Dimension::One,
///     &[vec![0.0], vec![0.1], vec![0.5], vec![0.9]],
/// )?;
/// let mut rng = SmallRng::seed_from_u64(0);
/// let tree = prim_spanning_tree(&mut instance.oracle(&mut rng), RelaxationPolicy::Rebuild)?;
/// assert!((tree.total_weight() - 0.9).abs() < 1e-12);
/// assert!(tree.is_spanning_tree());
/// assert_eq!(tree.parent(3), Some(2));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SpanningTree {
    parents: Vec<Option<usize>>,
    attachment_weights: Vec<f64>,
    extraction_order: Vec<usize>,
    total_weight: f64,
}

impl SpanningTree {
    /// Returns the accumulated tree weight.
    #[must_use]
    #[rustfmt::skip]
    pub const fn total_weight(&self) -> f64 { self.total_weight }

    /// Returns the number of vertices spanned.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.parents.len()
    }

    /// Returns the parent of `vertex`; `None` for the root or unknown vertices.
    #[must_use]
    pub fn parent(&self, vertex: usize) -> Option<usize> {
        self.parents.get(vertex).copied().flatten()
    }

    /// Returns the key `vertex` carried when it was extracted.
    #[must_use]
    pub fn attachment_weight(&self, vertex: usize) -> Option<f64> {
        self.attachment_weights.get(vertex).copied()
    }

    /// Returns vertices in the order they joined the tree.
    #[must_use]
    pub fn extraction_order(&self) -> &[usize] {
        &self.extraction_order
    }

    /// Iterates over the tree edges of every non-root vertex.
    pub fn edges(&self) -> impl Iterator<Item = TreeEdge> + '_ {
        self.parents
            .iter()
            .zip(self.attachment_weights.iter())
            .enumerate()
            .filter_map(|(vertex, (parent, weight))| {
                parent.map(|parent| TreeEdge {
                    vertex,
                    parent,
                    weight: *weight,
                })
            })
    }

    /// Checks that parent pointers form a single tree rooted at vertex 0.
    ///
    /// Exactly one vertex (0) lacks a parent and every other vertex reaches
    /// it by following parents without revisiting a vertex.
    #[must_use]
    pub fn is_spanning_tree(&self) -> bool {
        let count = self.parents.len();
        if count == 0 || self.parents[0].is_some() {
            return false;
        }
        // 0 = unvisited, 1 = on the current walk, 2 = known to reach the root.
        let mut state = vec![0_u8; count];
        state[0] = 2;
        for start in 1..count {
            let mut walk = Vec::new();
            let mut current = start;
            while state[current] == 0 {
                state[current] = 1;
                walk.push(current);
                match self.parents[current] {
                    Some(parent) if parent < count => current = parent,
                    _ => return false,
                }
            }
            if state[current] == 1 {
                return false;
            }
            for vertex in walk {
                state[vertex] = 2;
            }
        }
        true
    }
}

/// Computes a minimum spanning tree of the complete graph behind `oracle`.
///
/// Vertex 0 seeds the tree with key 0; every other vertex starts at
/// [`SENTINEL_DISTANCE`]. The total is the sum of extracted keys. For a
/// metric oracle this is the exact MST weight; for the random-weight oracle
/// it is the weight of the greedy structure Prim's rule produces.
///
/// # Errors
/// Returns [`MstError::EmptyGraph`] when the oracle has no vertices and
/// [`MstError::Heap`] if the heap contract is violated.
#[instrument(name = "mst.prim", skip(oracle), fields(vertex_count = oracle.vertex_count()))]
pub fn prim_spanning_tree<O: DistanceOracle + ?Sized>(
    oracle: &mut O,
    policy: RelaxationPolicy,
) -> Result<SpanningTree, MstError> {
    let vertex_count = oracle.vertex_count();
    if vertex_count == 0 {
        return Err(MstError::EmptyGraph);
    }

    let mut entries = Vec::with_capacity(vertex_count);
    entries.push(HeapEntry::new(0, 0.0));
    entries.extend((1..vertex_count).map(|vertex| HeapEntry::new(vertex, SENTINEL_DISTANCE)));
    let mut heap = IndexedMinHeap::build(entries);

    let mut parents = vec![None; vertex_count];
    let mut attachment_weights = vec![0.0; vertex_count];
    let mut extraction_order = Vec::with_capacity(vertex_count);
    let mut total_weight = 0.0;

    while !heap.is_empty() {
        let nearest = heap.extract_min()?;
        let from = nearest.vertex();
        total_weight += nearest.distance();
        parents[from] = nearest.parent();
        attachment_weights[from] = nearest.distance();
        extraction_order.push(from);

        relax_remaining(&mut heap, oracle, from, policy)?;
    }

    debug!(total_weight, "spanning tree complete");
    Ok(SpanningTree {
        parents,
        attachment_weights,
        extraction_order,
        total_weight,
    })
}

fn relax_remaining<O: DistanceOracle + ?Sized>(
    heap: &mut IndexedMinHeap,
    oracle: &mut O,
    from: usize,
    policy: RelaxationPolicy,
) -> Result<(), MstError> {
    // Sift-up only moves entries between already-visited positions, so a
    // single forward scan still visits every remaining vertex once.
    for position in 0..heap.len() {
        let candidate = heap.entries()[position];
        let distance = oracle.distance(from, candidate.vertex());
        if distance < candidate.distance() {
            match policy {
                RelaxationPolicy::Rebuild => heap.decrease_key(position, distance, Some(from))?,
                RelaxationPolicy::SiftUp => {
                    heap.decrease_key_and_sift(position, distance, Some(from))?;
                }
            }
        }
    }
    if policy == RelaxationPolicy::Rebuild {
        heap.heapify();
    }
    Ok(())
}

#[cfg(test)]
mod tests;
