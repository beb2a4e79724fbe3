use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use dash_cli::render::{formats_table, write_dashboard};
use dash_cli::repl::{Repl, SessionCommand};
use dash_core::{DashboardConfig, Upload, build_dashboard};
use dash_model::SessionState;
use tracing::{info, info_span};

use crate::cli::{SessionArgs, ShowArgs};

pub fn run_formats() -> Result<()> {
    println!("{}", formats_table());
    Ok(())
}

pub fn run_show(args: &ShowArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let upload = read_upload(&args.file)?;

    let mut state = SessionState::new();
    for (key, column) in &args.select {
        state.set(*key, column.clone());
    }

    let span = info_span!("show", file = %args.file.display());
    let _guard = span.enter();
    let start = Instant::now();
    let dashboard = build_dashboard(&upload, &state, &config)?;
    info!(
        charts = dashboard.charts.len(),
        duration_ms = start.elapsed().as_millis(),
        "render complete"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let json = serde_json::to_string_pretty(&dashboard).context("serialize dashboard")?;
        writeln!(out, "{json}").context("write output")?;
    } else {
        write_dashboard(&mut out, &dashboard, config.table_width).context("write output")?;
    }
    Ok(())
}

pub fn run_session(args: &SessionArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut repl = Repl::new(&config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(path) = &args.file {
        repl.execute(SessionCommand::Upload(path.clone()), &mut out)
            .context("write output")?;
    }
    let stdin = io::stdin();
    repl.run(stdin.lock(), &mut out).context("session I/O")?;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(path) => Ok(DashboardConfig::load_from(path)?),
        None => Ok(DashboardConfig::default()),
    }
}

fn read_upload(path: &Path) -> Result<Upload> {
    Upload::from_path(path).map_err(|error| anyhow!("failed to read {}: {error}", path.display()))
}
