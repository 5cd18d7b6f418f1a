//! Random instance generation for spanning tree trials.
//!
//! An [`Instance`] is either a cloud of points drawn uniformly from the unit
//! hypercube in one to four dimensions, or, in dimension zero, a bare vertex
//! count whose edge weights are drawn afresh on every query. Unused
//! coordinates stay at `0.0`, so one Euclidean routine serves every
//! geometric dimension and every distance lies in `[0, 2]`.

mod oracle;

use std::fmt;

use rand::{Rng, distributions::Standard};

use crate::{Result, error::RandMstError};

pub use self::oracle::{DistanceOracle, EuclideanOracle, InstanceOracle, RandomWeightOracle};

/// Largest vertex count an experiment accepts.
pub const MAX_VERTEX_COUNT: usize = 131_072;

const AXES: usize = 4;

/// Embedding dimension of an instance.
///
/// # Examples
/// ```
/// use randmst_core::{Dimension, RandMstError};
///
/// assert_eq!(Dimension::try_from(3_i64)?, Dimension::Three);
/// assert_eq!(Dimension::Three.axes(), 3);
/// assert!(matches!(
///     Dimension::try_from(5_i64),
///     Err(RandMstError::InvalidDimension { got: 5 })
/// ));
/// # Ok::<(), RandMstError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Dimension {
    /// No geometry: every edge weight is an independent uniform draw.
    RandomWeight,
    /// Points on the unit interval.
    One,
    /// Points in the unit square.
    Two,
    /// Points in the unit cube.
    Three,
    /// Points in the unit 4-cube.
    Four,
}

impl Dimension {
    /// Returns the number of coordinates drawn per point.
    #[must_use]
    pub const fn axes(self) -> usize {
        match self {
            Self::RandomWeight => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }

    /// Returns `true` when the instance carries points.
    #[must_use]
    pub const fn is_geometric(self) -> bool {
        !matches!(self, Self::RandomWeight)
    }
}

impl TryFrom<i64> for Dimension {
    type Error = RandMstError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::RandomWeight),
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            got => Err(RandMstError::InvalidDimension { got }),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.axes())
    }
}

/// A point in the unit hypercube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    coordinates: [f64; AXES],
    axes: usize,
}

impl Point {
    fn sample<R: Rng + ?Sized>(axes: usize, rng: &mut R) -> Self {
        let mut coordinates = [0.0; AXES];
        for value in coordinates.iter_mut().take(axes) {
            *value = rng.sample(Standard);
        }
        Self { coordinates, axes }
    }

    /// Returns the coordinates along the instance's used axes.
    #[must_use]
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates[..self.axes]
    }

    /// Euclidean distance to `other`.
    ///
    /// Unused axes hold `0.0` on both sides and contribute nothing.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.coordinates
            .iter()
            .zip(other.coordinates.iter())
            .map(|(left, right)| {
                let diff = left - right;
                diff * diff
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// The vertices of one trial.
///
/// # Examples
/// ```
/// use randmst_core::{Dimension, Instance};
///
/// let instance = Instance::from_points(Dimension::Two, &[vec![0.0, 0.0], vec![0.3, 0.4]])?;
/// assert_eq!(instance.vertex_count(), 2);
/// let table = instance.distance_table().expect("geometric instance");
/// assert!((table[0][1] - 0.5).abs() < 1e-12);
/// # Ok::<(), randmst_core::RandMstError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    dimension: Dimension,
    vertex_count: usize,
    points: Vec<Point>,
}

impl Instance {
    /// Draws a fresh instance of `vertex_count` vertices from `rng`.
    ///
    /// Coordinates are drawn point by point, axis by axis. Random-weight
    /// instances consume no entropy here; their weights are drawn by the
    /// oracle.
    ///
    /// # Errors
    /// Returns [`RandMstError::InvalidVertexCount`] when `vertex_count` is
    /// zero or exceeds [`MAX_VERTEX_COUNT`].
    pub fn generate<R: Rng + ?Sized>(
        vertex_count: usize,
        dimension: Dimension,
        rng: &mut R,
    ) -> Result<Self> {
        validate_vertex_count(vertex_count)?;
        let points = if dimension.is_geometric() {
            (0..vertex_count)
                .map(|_| Point::sample(dimension.axes(), rng))
                .collect()
        } else {
            Vec::new()
        };
        Ok(Self {
            dimension,
            vertex_count,
            points,
        })
    }

    /// Builds a geometric instance from explicit coordinates.
    ///
    /// # Errors
    /// Returns [`RandMstError::InvalidDimension`] for
    /// [`Dimension::RandomWeight`], [`RandMstError::InvalidVertexCount`] when
    /// `coordinates` is empty or too long, and
    /// [`RandMstError::CoordinateMismatch`] when a point's length differs from
    /// the dimension.
    pub fn from_points(dimension: Dimension, coordinates: &[Vec<f64>]) -> Result<Self> {
        if !dimension.is_geometric() {
            return Err(RandMstError::InvalidDimension { got: 0 });
        }
        validate_vertex_count(coordinates.len())?;
        let axes = dimension.axes();
        let points = coordinates
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                if raw.len() != axes {
                    return Err(RandMstError::CoordinateMismatch {
                        index,
                        expected: axes,
                        actual: raw.len(),
                    });
                }
                let mut point = [0.0; AXES];
                point[..axes].copy_from_slice(raw);
                Ok(Point {
                    coordinates: point,
                    axes,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            dimension,
            vertex_count: points.len(),
            points,
        })
    }

    /// Returns the instance dimension.
    #[must_use]
    #[rustfmt::skip]
    pub const fn dimension(&self) -> Dimension { self.dimension }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertex_count(&self) -> usize { self.vertex_count }

    /// Returns the generated points; empty in random-weight mode.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the Euclidean distance between two vertices.
    ///
    /// Yields `None` for random-weight instances and out-of-range vertices.
    #[must_use]
    pub fn distance(&self, left: usize, right: usize) -> Option<f64> {
        Some(self.points.get(left)?.distance_to(self.points.get(right)?))
    }

    /// Lazily computes the distances from `vertex` to every vertex in order.
    ///
    /// Nothing is stored, so walking every row costs `O(n)` memory. The
    /// iterator is empty for random-weight instances and out-of-range
    /// vertices.
    ///
    /// # Examples
    /// ```
    /// use randmst_core::{Dimension, Instance};
    ///
    /// let instance = Instance::from_points(Dimension::One, &[vec![0.0], vec![0.25], vec![1.0]])?;
    /// let row: Vec<f64> = instance.distance_row(1).collect();
    /// assert_eq!(row, [0.25, 0.0, 0.75]);
    /// assert_eq!(instance.distance_row(3).count(), 0);
    /// # Ok::<(), randmst_core::RandMstError>(())
    /// ```
    pub fn distance_row(&self, vertex: usize) -> impl Iterator<Item = f64> + '_ {
        let origin = self.points.get(vertex);
        self.points
            .iter()
            .filter_map(move |point| origin.map(|origin| origin.distance_to(point)))
    }

    /// Returns the full pairwise Euclidean distance matrix.
    ///
    /// Allocates `n^2` values; prefer [`Self::distance_row`] for large
    /// instances. Random-weight instances have no fixed distances and yield
    /// `None`.
    #[must_use]
    pub fn distance_table(&self) -> Option<Vec<Vec<f64>>> {
        self.dimension.is_geometric().then(|| {
            (0..self.vertex_count)
                .map(|vertex| self.distance_row(vertex).collect())
                .collect()
        })
    }

    /// Returns the distance oracle for this instance.
    ///
    /// The random stream is only drawn from in random-weight mode.
    pub fn oracle<'a, R: Rng + ?Sized>(&'a self, rng: &'a mut R) -> InstanceOracle<'a, R> {
        if self.dimension.is_geometric() {
            InstanceOracle::Euclidean(EuclideanOracle::new(&self.points))
        } else {
            InstanceOracle::RandomWeight(RandomWeightOracle::new(self.vertex_count, rng))
        }
    }
}

fn validate_vertex_count(vertex_count: usize) -> Result<()> {
    if vertex_count == 0 || vertex_count > MAX_VERTEX_COUNT {
        return Err(RandMstError::InvalidVertexCount {
            got: vertex_count,
            max: MAX_VERTEX_COUNT,
        });
    }
    Ok(())
}
