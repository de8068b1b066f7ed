use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use swingdash_analysis::{analytics, catalogue::MetricCatalogue, config::PipelineConfig, pipeline};

use crate::{
    loader,
    util::{self, Output},
    view,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeArg {
    /// Session CSV
    session: PathBuf,
    /// Session label [default: file stem]
    #[arg(long)]
    label: Option<String>,
    /// Pipeline configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the summary as JSON
    #[arg(long)]
    json: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let config = match &arg.config {
        Some(path) => util::read_config_file(path)?,
        None => PipelineConfig::default(),
    };
    config.validate().context("Invalid pipeline configuration")?;
    let catalogue = MetricCatalogue::default();
    let label = arg.label.clone().unwrap_or_else(|| {
        arg.session
            .file_stem()
            .map_or_else(|| "Session".to_owned(), |s| s.to_string_lossy().into_owned())
    });

    let raw = loader::read_session_csv(&arg.session)?;
    let dataset = pipeline::process_session(&raw, &label, &config, &catalogue);
    let summary = analytics::describe_session(&dataset, &catalogue.key_metric_names());

    let mut output = Output::from_output_path(arg.output.clone())?;
    if arg.json {
        output.write_json(&summary)?;
    } else {
        view::write_summary(
            &mut output,
            &format!("{label} summary ({} shots)", dataset.len()),
            &summary,
        )
        .with_context(|| format!("Failed to write summary to {}", output.display_path()))?;
        output.finish()?;
    }
    Ok(())
}
