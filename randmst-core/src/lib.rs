//! randmst core library.
//!
//! Estimates the expected weight of a minimum spanning tree over random
//! instances: points drawn uniformly from the unit hypercube in one to four
//! dimensions, or a complete graph with independent uniform edge weights.
//! Each trial generates an [`Instance`], runs [`prim_spanning_tree`] over
//! its [`DistanceOracle`] and reports the tree weight; an [`Experiment`]
//! repeats trials over one seeded random stream and averages the results.

mod error;
mod experiment;
mod heap;
mod instance;
mod mst;

pub use crate::{
    error::{RandMstError, RandMstErrorCode, Result},
    experiment::{Experiment, ExperimentBuilder, ExperimentSummary, TrialOutcome},
    heap::{HeapEntry, HeapError, HeapErrorCode, IndexedMinHeap},
    instance::{
        Dimension, DistanceOracle, EuclideanOracle, Instance, InstanceOracle, MAX_VERTEX_COUNT,
        Point, RandomWeightOracle,
    },
    mst::{
        MstError, MstErrorCode, RelaxationPolicy, SENTINEL_DISTANCE, SpanningTree, TreeEdge,
        prim_spanning_tree,
    },
};
