//! Argument parsing, experiment execution and report rendering.

use std::io::{self, Write};

use clap::{Parser, ValueEnum};
use randmst_core::{
    ExperimentBuilder, ExperimentSummary, Instance, RandMstError, RelaxationPolicy, TrialOutcome,
};
use thiserror::Error;

use super::format::General;

/// Width of one cell in the rendered distance table.
const TABLE_CELL_WIDTH: usize = 10;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "randmst",
    about = "Estimate the expected minimum spanning tree weight of random graphs."
)]
pub struct Cli {
    /// Reporting level: 0 prints only the summary line, 1 adds distance
    /// tables and coordinates, 1-2 per-trial weights, 1-3 per-trial times
    /// and 1-4 the average time.
    #[arg(value_parser = clap::value_parser!(u8).range(0..=4))]
    pub debug_level: u8,

    /// Number of vertices per instance (1 to 131072).
    pub vertex_count: usize,

    /// Number of trials to average over.
    pub trial_count: usize,

    /// Embedding dimension: 0 for random edge weights, 1-4 for points in
    /// the unit hypercube.
    #[arg(allow_negative_numbers = true)]
    pub dimension: i64,

    /// Seed for the random stream; drawn from system entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// How lowered heap keys are reordered.
    #[arg(long, value_enum, default_value_t = PolicyArg::Rebuild)]
    pub policy: PolicyArg,
}

/// Heap relaxation policies selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Rebuild the heap once per extracted vertex.
    Rebuild,
    /// Sift each lowered key up immediately.
    SiftUp,
}

impl From<PolicyArg> for RelaxationPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Rebuild => Self::Rebuild,
            PolicyArg::SiftUp => Self::SiftUp,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
    /// Configuration or computation failed in the core library.
    #[error(transparent)]
    Core(#[from] RandMstError),
}

/// Summarises the outcome of executing the CLI.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Reporting level the run was invoked with.
    pub debug_level: u8,
    /// Aggregated experiment results.
    pub experiment: ExperimentSummary,
}

const fn reports_instance(debug_level: u8) -> bool {
    debug_level == 1
}

const fn reports_trial_weight(debug_level: u8) -> bool {
    matches!(debug_level, 1..=2)
}

const fn reports_trial_time(debug_level: u8) -> bool {
    matches!(debug_level, 1..=3)
}

const fn reports_average_time(debug_level: u8) -> bool {
    matches!(debug_level, 1..=4)
}

/// Executes the experiment described by `cli`, streaming per-trial reports
/// to `writer`.
///
/// Configuration is validated before the first trial, so a rejected
/// configuration writes nothing. A failed write stops the run before the next
/// trial starts.
///
/// # Errors
/// Returns [`CliError::Core`] for invalid parameters or failed trials and
/// [`CliError::Io`] when writing a per-trial report fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use randmst_cli::cli::{Cli, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cli = Cli::try_parse_from(["randmst", "0", "1", "2", "3", "--seed", "9"])?;
/// let mut buffer = Vec::new();
/// let summary = run_cli(&cli, &mut buffer)?;
/// assert_eq!(summary.experiment.average_weight(), 0.0);
/// assert!(buffer.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn run_cli(cli: &Cli, mut writer: impl Write) -> Result<ExecutionSummary, CliError> {
    let experiment = ExperimentBuilder::new()
        .with_vertex_count(cli.vertex_count)
        .with_trial_count(cli.trial_count)
        .with_dimension(cli.dimension)
        .with_seed(cli.seed)
        .with_policy(cli.policy.into())
        .build()?;

    let summary = experiment.run_with(|outcome| {
        render_trial(outcome, cli.debug_level, &mut writer).map_err(CliError::from)
    })?;

    Ok(ExecutionSummary {
        debug_level: cli.debug_level,
        experiment: summary,
    })
}

/// Renders the debug-gated report for one trial.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
pub fn render_trial(
    outcome: &TrialOutcome,
    debug_level: u8,
    mut writer: impl Write,
) -> io::Result<()> {
    if reports_trial_time(debug_level) {
        writeln!(
            writer,
            "The time taken to generate the minimum spanning tree in trial #{} is {}",
            outcome.trial,
            General(outcome.elapsed.as_secs_f64())
        )?;
    }
    if reports_trial_weight(debug_level) {
        writeln!(
            writer,
            "The sum of the edges of the minimum spanning tree over {} vertices for trial #{} is {}",
            outcome.instance.vertex_count(),
            outcome.trial,
            General(outcome.weight())
        )?;
    }
    if reports_instance(debug_level) {
        render_instance(&outcome.instance, &mut writer)?;
    }
    Ok(())
}

/// Renders the distance table and coordinate dump of a geometric instance.
///
/// Distances are computed and written one row at a time, so memory stays
/// linear in the vertex count. Every coordinate entry, the last included, is
/// followed by `", "`. Random-weight instances have neither table nor
/// coordinates and render nothing.
///
/// # Errors
/// Returns [`io::Error`] if writing to `writer` fails.
pub fn render_instance(instance: &Instance, mut writer: impl Write) -> io::Result<()> {
    if !instance.dimension().is_geometric() {
        return Ok(());
    }
    for vertex in 0..instance.vertex_count() {
        for distance in instance.distance_row(vertex) {
            write!(writer, "{:>TABLE_CELL_WIDTH$}", General(distance))?;
        }
        writeln!(writer)?;
    }

    write!(writer, "[")?;
    for point in instance.points() {
        match point.coordinates() {
            [x] => write!(writer, "{}, ", General(*x))?,
            coordinates => {
                write!(writer, "(")?;
                for (axis, value) in coordinates.iter().enumerate() {
                    if axis > 0 {
                        write!(writer, ", ")?;
                    }
                    write!(writer, "{}", General(*value))?;
                }
                write!(writer, "), ")?;
            }
        }
    }
    writeln!(writer, "]")
}

/// Renders the closing report: the average time when requested, then the
/// `average_weight vertex_count trial_count dimension` line.
///
/// Floating-point values print with six significant digits.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::time::Duration;
/// # use randmst_cli::cli::{ExecutionSummary, render_summary};
/// # use randmst_core::{Dimension, ExperimentSummary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     debug_level: 0,
///     experiment: ExperimentSummary {
///         vertex_count: 4,
///         trial_count: 2,
///         dimension: Dimension::One,
///         seed: 1,
///         total_weight: 1.5,
///         total_elapsed: Duration::from_millis(4),
///     },
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "0.75 4 2 1\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let experiment = &summary.experiment;
    if reports_average_time(summary.debug_level) {
        writeln!(
            writer,
            "The average time taken to build a minimum spanning tree per trial is {} seconds",
            General(experiment.average_elapsed().as_secs_f64())
        )?;
    }
    writeln!(
        writer,
        "{} {} {} {}",
        General(experiment.average_weight()),
        experiment.vertex_count,
        experiment.trial_count,
        experiment.dimension
    )
}
