use std::path::PathBuf;

use actrec_stats::{
    config::{TrackerConfig, TrackerMode},
    reducer::{self, Backend, Reducer},
    tracker::Tracker as _,
    value::Value,
};
use anyhow::{Context, bail};

use crate::{
    schema::snapshot::Snapshot,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SummarizeArg {
    /// JSON file holding an array of data; reads stdin if omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// Tracker to use [default: auto, or the mode of the resumed snapshot]
    #[arg(long)]
    mode: Option<TrackerMode>,
    /// JSON tracker configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of recent values kept for median, quantiles and std
    #[arg(long)]
    max_size: Option<usize>,
    /// Comma-separated quantile points in [0, 1]
    #[arg(long, value_delimiter = ',')]
    quantiles: Option<Vec<f64>>,
    /// Numeric backend to use instead of the automatically detected one
    #[arg(long)]
    backend: Option<Backend>,
    /// Snapshot file to continue accumulating from
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Save the tracker state to this file after accumulating
    #[arg(long)]
    save_state: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print a text summary instead of JSON
    #[arg(long)]
    text: bool,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let snapshot = arg
        .resume
        .as_deref()
        .map(util::read_snapshot_file)
        .transpose()?;

    let config = resolve_config(arg, snapshot.as_ref())?;
    let mode = resolve_mode(arg.mode, snapshot.as_ref())?;
    let reducer = resolve_reducer(arg.backend)?;
    eprintln!(
        "Tracking with mode {mode} (max size {}, backend {})",
        config.max_size(),
        reducer.backend()
    );

    let mut tracker = config.build_with_reducer(mode, reducer);
    if let Some(snapshot) = snapshot {
        tracker
            .load_state_dict(snapshot.state)
            .context("Failed to restore tracker state from snapshot")?;
        eprintln!(
            "Resumed {} elements saved at {}",
            tracker.count(),
            snapshot.saved_at
        );
    }

    let data: Vec<Value> = util::read_json_input("data", arg.input.as_deref())?;
    eprintln!("Read {} data", data.len());
    for (i, datum) in data.iter().enumerate() {
        tracker
            .add(datum)
            .with_context(|| format!("Failed to add datum #{i}: {datum}"))?;
    }
    eprintln!("Tracked {} elements", tracker.count());

    if let Some(path) = &arg.save_state {
        let snapshot = Snapshot::new(mode, config.clone(), tracker.state_dict());
        Output::create(Some(path.as_path()))?.write_json(&snapshot)?;
        eprintln!("Saved tracker state to {}", path.display());
    }

    let stats = tracker
        .statistics()
        .context("Failed to compute statistics")?;
    Output::create(arg.output.as_deref())?.write_statistics(&stats, arg.text)
}

/// Configuration file (or the resumed snapshot's), then command-line overrides.
fn resolve_config(
    arg: &SummarizeArg,
    snapshot: Option<&Snapshot>,
) -> anyhow::Result<TrackerConfig> {
    let mut config = match (&arg.config, snapshot) {
        (Some(path), _) => util::read_json_file("config", path)?,
        (None, Some(snapshot)) => snapshot.config.clone(),
        (None, None) => TrackerConfig::default(),
    };
    if let Some(max_size) = arg.max_size {
        config = config
            .with_max_size(max_size)
            .context("Invalid --max-size")?;
    }
    if let Some(quantiles) = &arg.quantiles {
        config = config
            .with_quantiles(quantiles.clone())
            .context("Invalid --quantiles")?;
    }
    Ok(config)
}

fn resolve_mode(
    mode: Option<TrackerMode>,
    snapshot: Option<&Snapshot>,
) -> anyhow::Result<TrackerMode> {
    match (mode, snapshot) {
        (Some(mode), Some(snapshot)) if mode != snapshot.mode => {
            bail!(
                "Mode {mode} does not match the snapshot's mode {}",
                snapshot.mode
            )
        }
        (Some(mode), _) => Ok(mode),
        (None, Some(snapshot)) => Ok(snapshot.mode),
        (None, None) => Ok(TrackerMode::default()),
    }
}

fn resolve_reducer(backend: Option<Backend>) -> anyhow::Result<&'static dyn Reducer> {
    match backend {
        Some(backend) => backend
            .reducer()
            .with_context(|| format!("Backend {backend} is not available in this build")),
        None => Ok(reducer::auto_reducer()),
    }
}
