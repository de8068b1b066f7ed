use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use swingdash_analysis::{
    balance::BalanceMode,
    catalogue::MetricCatalogue,
    config::PipelineConfig,
    pipeline::{self, SessionLabels},
    side::Handedness,
};

use crate::{
    loader,
    util::{self, Output},
    view,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    /// Baseline session CSV
    baseline: PathBuf,
    /// Comparison session CSV
    comparison: PathBuf,
    /// Label of the baseline session [default: file stem]
    #[arg(long)]
    baseline_label: Option<String>,
    /// Label of the comparison session [default: file stem]
    #[arg(long)]
    comparison_label: Option<String>,
    /// Pipeline configuration JSON file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Downsample both sessions to equal shot counts
    #[arg(long)]
    balance: bool,
    /// Balancing mode: "Simple" or "Stratified"
    #[arg(long)]
    balance_mode: Option<String>,
    /// Seed for balancing
    #[arg(long)]
    seed: Option<u64>,
    /// Keep IQR outliers
    #[arg(long)]
    no_iqr: bool,
    /// IQR whisker multiplier
    #[arg(long)]
    whisker: Option<f64>,
    /// Do not classify shots as Left / Straight / Right
    #[arg(long)]
    no_side: bool,
    /// Column used for side classification
    #[arg(long)]
    deviation_col: Option<String>,
    /// Deviation (degrees) still counted as straight
    #[arg(long)]
    dead_zone: Option<f64>,
    /// Swap left and right for a left-handed player
    #[arg(long)]
    left_handed: bool,
    /// Negate the deviation before classifying
    #[arg(long)]
    invert: bool,
    /// Write the report as JSON
    #[arg(long)]
    json: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl CompareArg {
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => PipelineConfig::default(),
        };
        if self.balance {
            config.balance = true;
        }
        if let Some(mode) = &self.balance_mode {
            config.balance_mode = BalanceMode::parse(mode);
        }
        if let Some(seed) = self.seed {
            config.balance_seed = seed;
        }
        if self.no_iqr {
            config.apply_iqr = false;
        }
        if let Some(whisker) = self.whisker {
            config.iqr_whisker = whisker;
        }
        if self.no_side {
            config.classify_side = false;
        }
        if let Some(column) = &self.deviation_col {
            config.primary_deviation_col.clone_from(column);
        }
        if let Some(dead_zone) = self.dead_zone {
            config.dead_zone = dead_zone;
        }
        if self.left_handed {
            config.handed = Handedness::LeftHanded;
        }
        if self.invert {
            config.invert = true;
        }
        Ok(config)
    }

    fn labels(&self) -> SessionLabels {
        let defaults = SessionLabels::default();
        SessionLabels {
            baseline: self
                .baseline_label
                .clone()
                .or_else(|| file_stem(&self.baseline))
                .unwrap_or(defaults.baseline),
            comparison: self
                .comparison_label
                .clone()
                .or_else(|| file_stem(&self.comparison))
                .unwrap_or(defaults.comparison),
        }
    }
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let config = arg.pipeline_config()?;
    let labels = arg.labels();
    let catalogue = MetricCatalogue::default();

    let baseline = loader::read_session_csv(&arg.baseline)?;
    let comparison = loader::read_session_csv(&arg.comparison)?;

    log::info!(
        "comparing '{}' against '{}'",
        labels.comparison,
        labels.baseline
    );
    let report = pipeline::run_comparison(&baseline, &comparison, &labels, &config, &catalogue)
        .context("Invalid pipeline configuration")?;

    let mut output = Output::from_output_path(arg.output.clone())?;
    if arg.json {
        output.write_json(&report)?;
    } else {
        view::write_report(&mut output, &report)
            .with_context(|| format!("Failed to write report to {}", output.display_path()))?;
        output.finish()?;
    }
    Ok(())
}
