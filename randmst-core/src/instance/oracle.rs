//! Distance oracles over the implicit complete graph of an instance.

use rand::{Rng, distributions::Standard};

use super::Point;

/// On-demand edge weights for a complete graph over `0..vertex_count()`.
///
/// Implementations are queried by vertex index; no adjacency structure is
/// ever materialised. The receiver is mutable so oracles may draw from a
/// random stream.
///
/// # Examples
/// ```
/// use randmst_core::DistanceOracle;
///
/// struct Line(Vec<f64>);
///
/// impl DistanceOracle for Line {
///     fn vertex_count(&self) -> usize { self.0.len() }
///     fn distance(&mut self, left: usize, right: usize) -> f64 {
///         (self.0[left] - self.0[right]).abs()
///     }
/// }
///
/// let mut line = Line(vec![0.0, 0.25, 1.0]);
/// assert_eq!(line.distance(1, 2), 0.75);
/// ```
pub trait DistanceOracle {
    /// Returns the number of vertices in the graph.
    fn vertex_count(&self) -> usize;

    /// Returns the weight of the edge between `left` and `right`.
    fn distance(&mut self, left: usize, right: usize) -> f64;
}

/// Euclidean distances between generated points.
#[derive(Clone, Copy, Debug)]
pub struct EuclideanOracle<'a> {
    points: &'a [Point],
}

impl<'a> EuclideanOracle<'a> {
    /// Wraps a borrowed point slice.
    #[must_use]
    pub const fn new(points: &'a [Point]) -> Self {
        Self { points }
    }
}

impl DistanceOracle for EuclideanOracle<'_> {
    fn vertex_count(&self) -> usize {
        self.points.len()
    }

    fn distance(&mut self, left: usize, right: usize) -> f64 {
        self.points[left].distance_to(&self.points[right])
    }
}

/// Independent uniform `[0, 1)` weights drawn on every query.
///
/// Repeated queries for the same pair return different values; the graph
/// this models is not a metric space.
#[derive(Debug)]
pub struct RandomWeightOracle<'a, R: ?Sized> {
    vertex_count: usize,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RandomWeightOracle<'a, R> {
    /// Creates an oracle over `vertex_count` vertices backed by `rng`.
    pub fn new(vertex_count: usize, rng: &'a mut R) -> Self {
        Self { vertex_count, rng }
    }
}

impl<R: Rng + ?Sized> DistanceOracle for RandomWeightOracle<'_, R> {
    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn distance(&mut self, _left: usize, _right: usize) -> f64 {
        self.rng.sample(Standard)
    }
}

/// The oracle matching an [`super::Instance`]'s dimension.
#[derive(Debug)]
pub enum InstanceOracle<'a, R: ?Sized> {
    /// Geometric instance.
    Euclidean(EuclideanOracle<'a>),
    /// Dimension-zero instance.
    RandomWeight(RandomWeightOracle<'a, R>),
}

impl<R: Rng + ?Sized> DistanceOracle for InstanceOracle<'_, R> {
    fn vertex_count(&self) -> usize {
        match self {
            Self::Euclidean(oracle) => oracle.vertex_count(),
            Self::RandomWeight(oracle) => oracle.vertex_count(),
        }
    }

    fn distance(&mut self, left: usize, right: usize) -> f64 {
        match self {
            Self::Euclidean(oracle) => oracle.distance(left, right),
            Self::RandomWeight(oracle) => oracle.distance(left, right),
        }
    }
}
