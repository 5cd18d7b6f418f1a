//! Monte-Carlo experiment configuration and trial loop.
//!
//! [`ExperimentBuilder`] validates the run parameters once, before any
//! trial executes. [`Experiment`] then owns a single random stream for the
//! whole run: each trial draws a fresh instance from it, computes the
//! spanning tree and reports the elapsed wall-clock time.

use std::time::{Duration, Instant};

use rand::{Rng, RngCore, SeedableRng, rngs::SmallRng};
use tracing::{debug, info, instrument};

use crate::{
    Result,
    error::RandMstError,
    instance::{Dimension, Instance, MAX_VERTEX_COUNT},
    mst::{RelaxationPolicy, SpanningTree, prim_spanning_tree},
};

/// Configures and constructs [`Experiment`] instances.
///
/// # Examples
/// ```
/// use randmst_core::{Dimension, ExperimentBuilder};
///
/// let experiment = ExperimentBuilder::new()
///     .with_vertex_count(128)
///     .with_trial_count(5)
///     .with_dimension(2)
///     .with_seed(Some(7))
///     .build()?;
/// assert_eq!(experiment.vertex_count(), 128);
/// assert_eq!(experiment.dimension(), Dimension::Two);
/// # Ok::<(), randmst_core::RandMstError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ExperimentBuilder {
    vertex_count: usize,
    trial_count: usize,
    dimension: i64,
    seed: Option<u64>,
    policy: RelaxationPolicy,
}

impl Default for ExperimentBuilder {
    fn default() -> Self {
        Self {
            vertex_count: 1,
            trial_count: 1,
            dimension: 2,
            seed: None,
            policy: RelaxationPolicy::default(),
        }
    }
}

impl ExperimentBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of vertices per instance.
    #[must_use]
    pub const fn with_vertex_count(mut self, vertex_count: usize) -> Self {
        self.vertex_count = vertex_count;
        self
    }

    /// Sets the number of trials to average over.
    #[must_use]
    pub const fn with_trial_count(mut self, trial_count: usize) -> Self {
        self.trial_count = trial_count;
        self
    }

    /// Sets the embedding dimension; validated by [`Self::build`].
    #[must_use]
    pub const fn with_dimension(mut self, dimension: i64) -> Self {
        self.dimension = dimension;
        self
    }

    /// Fixes the random seed. `None` seeds from operating system entropy.
    #[must_use]
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Selects the heap relaxation policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: RelaxationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates the configuration and constructs an [`Experiment`].
    ///
    /// # Errors
    /// Returns [`RandMstError::InvalidVertexCount`],
    /// [`RandMstError::InvalidTrialCount`] or
    /// [`RandMstError::InvalidDimension`] for out-of-range parameters.
    pub fn build(self) -> Result<Experiment> {
        if self.vertex_count == 0 || self.vertex_count > MAX_VERTEX_COUNT {
            return Err(RandMstError::InvalidVertexCount {
                got: self.vertex_count,
                max: MAX_VERTEX_COUNT,
            });
        }
        if self.trial_count == 0 {
            return Err(RandMstError::InvalidTrialCount {
                got: self.trial_count,
            });
        }
        let dimension = Dimension::try_from(self.dimension)?;
        Ok(Experiment {
            vertex_count: self.vertex_count,
            trial_count: self.trial_count,
            dimension,
            seed: self.seed,
            policy: self.policy,
        })
    }
}

/// The result of a single trial.
#[derive(Debug, Clone)]
pub struct TrialOutcome {
    /// One-based trial number.
    pub trial: usize,
    /// The generated instance.
    pub instance: Instance,
    /// The spanning tree computed over the instance.
    pub tree: SpanningTree,
    /// Wall-clock time spent generating the instance and building the tree.
    pub elapsed: Duration,
}

impl TrialOutcome {
    /// Returns the spanning tree weight.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.tree.total_weight()
    }
}

/// Aggregated results of an experiment run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentSummary {
    /// Vertices per instance.
    pub vertex_count: usize,
    /// Number of trials run.
    pub trial_count: usize,
    /// Embedding dimension.
    pub dimension: Dimension,
    /// Seed the random stream was initialised with.
    pub seed: u64,
    /// Sum of every trial's tree weight.
    pub total_weight: f64,
    /// Sum of every trial's elapsed time.
    pub total_elapsed: Duration,
}

impl ExperimentSummary {
    /// Mean tree weight across trials.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "trial counts stay far below 2^52"
    )]
    pub fn average_weight(&self) -> f64 {
        self.total_weight / self.trial_count as f64
    }

    /// Mean elapsed time per trial.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "trial counts stay far below 2^52"
    )]
    pub fn average_elapsed(&self) -> Duration {
        self.total_elapsed.div_f64(self.trial_count as f64)
    }
}

/// A validated experiment ready to run.
///
/// # Examples
/// ```
/// use randmst_core::ExperimentBuilder;
///
/// let summary = ExperimentBuilder::new()
///     .with_vertex_count(1)
///     .with_trial_count(3)
///     .with_dimension(0)
///     .with_seed(Some(1))
///     .build()?
///     .run()?;
/// assert_eq!(summary.average_weight(), 0.0);
/// assert_eq!(summary.trial_count, 3);
/// # Ok::<(), randmst_core::RandMstError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Experiment {
    vertex_count: usize,
    trial_count: usize,
    dimension: Dimension,
    seed: Option<u64>,
    policy: RelaxationPolicy,
}

impl Experiment {
    /// Returns the number of vertices per instance.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertex_count(&self) -> usize { self.vertex_count }

    /// Returns the number of trials.
    #[must_use]
    #[rustfmt::skip]
    pub const fn trial_count(&self) -> usize { self.trial_count }

    /// Returns the embedding dimension.
    #[must_use]
    #[rustfmt::skip]
    pub const fn dimension(&self) -> Dimension { self.dimension }

    /// Returns the fixed seed, if one was configured.
    #[must_use]
    #[rustfmt::skip]
    pub const fn seed(&self) -> Option<u64> { self.seed }

    /// Returns the heap relaxation policy.
    #[must_use]
    #[rustfmt::skip]
    pub const fn policy(&self) -> RelaxationPolicy { self.policy }

    /// Runs every trial and returns the aggregate.
    ///
    /// # Errors
    /// Propagates the first trial failure.
    pub fn run(&self) -> Result<ExperimentSummary> {
        self.run_with(|_| Ok(()))
    }

    /// Runs every trial, handing each outcome to `on_trial` before it is
    /// discarded.
    ///
    /// An error returned by `on_trial` stops the run before the next trial
    /// starts.
    ///
    /// # Errors
    /// Returns the first trial failure, converted into `E`, or the first
    /// error returned by `on_trial`. No later trial runs in either case.
    ///
    /// # Examples
    /// ```
    /// use randmst_core::{ExperimentBuilder, RandMstError};
    ///
    /// let experiment = ExperimentBuilder::new()
    ///     .with_vertex_count(4)
    ///     .with_trial_count(10)
    ///     .with_seed(Some(3))
    ///     .build()?;
    /// let mut seen = 0;
    /// let stopped = experiment.run_with(|outcome| {
    ///     seen += 1;
    ///     if outcome.trial == 2 {
    ///         return Err(RandMstError::InvalidTrialCount { got: 2 });
    ///     }
    ///     Ok(())
    /// });
    /// assert!(stopped.is_err());
    /// assert_eq!(seen, 2);
    /// # Ok::<(), RandMstError>(())
    /// ```
    #[instrument(
        name = "experiment.run",
        skip(self, on_trial),
        fields(
            vertex_count = self.vertex_count,
            trial_count = self.trial_count,
            dimension = %self.dimension,
            policy = %self.policy,
        ),
    )]
    pub fn run_with<E, F>(&self, mut on_trial: F) -> core::result::Result<ExperimentSummary, E>
    where
        E: From<RandMstError>,
        F: FnMut(&TrialOutcome) -> core::result::Result<(), E>,
    {
        let seed = self
            .seed
            .unwrap_or_else(|| SmallRng::from_entropy().next_u64());
        info!(seed, "starting experiment");
        let mut rng = SmallRng::seed_from_u64(seed);

        let mut total_weight = 0.0;
        let mut total_elapsed = Duration::ZERO;
        for trial in 1..=self.trial_count {
            let outcome = self.run_trial(trial, &mut rng)?;
            debug!(
                trial,
                weight = outcome.weight(),
                elapsed_secs = outcome.elapsed.as_secs_f64(),
                "trial complete"
            );
            total_weight += outcome.weight();
            total_elapsed += outcome.elapsed;
            on_trial(&outcome)?;
        }

        let summary = ExperimentSummary {
            vertex_count: self.vertex_count,
            trial_count: self.trial_count,
            dimension: self.dimension,
            seed,
            total_weight,
            total_elapsed,
        };
        info!(average_weight = summary.average_weight(), "experiment complete");
        Ok(summary)
    }

    /// Runs one trial against a caller-supplied random stream.
    ///
    /// The instance and heap are built from scratch, so no state carries over
    /// between trials except the position of `rng`.
    ///
    /// # Errors
    /// Returns [`RandMstError::Mst`] if the spanning tree computation fails.
    pub fn run_trial<R: Rng + ?Sized>(&self, trial: usize, rng: &mut R) -> Result<TrialOutcome> {
        let started = Instant::now();
        let instance = Instance::generate(self.vertex_count, self.dimension, rng)?;
        let tree = prim_spanning_tree(&mut instance.oracle(rng), self.policy)?;
        let elapsed = started.elapsed();
        Ok(TrialOutcome {
            trial,
            instance,
            tree,
            elapsed,
        })
    }
}
