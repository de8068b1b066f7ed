use std::{io::Write as _, path::PathBuf};

use anyhow::Context;
use clap::Args;

use crate::{loader, util::Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct SessionsArg {
    /// Directories to search for session CSV files
    #[arg(default_values = [".", "data", "datasets"])]
    dirs: Vec<PathBuf>,
}

pub(crate) fn run(arg: &SessionsArg) -> anyhow::Result<()> {
    let sessions = loader::discover_sessions(&arg.dirs)?;
    if sessions.is_empty() {
        log::warn!("no session CSV files found");
        return Ok(());
    }
    let mut output = Output::stdout();
    let width = sessions
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0);
    for session in &sessions {
        writeln!(output, "{:<width$}  {}", session.label, session.path.display())
            .context("Failed to write session list")?;
    }
    output.finish()
}
