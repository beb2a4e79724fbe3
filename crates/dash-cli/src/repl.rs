//! Line-oriented interactive session.
//!
//! Each state-changing command re-renders the whole dashboard, mirroring a
//! page that reruns on every widget change.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use comfy_table::{Cell, Table};
use dash_core::{Dashboard, DashboardConfig, Session, Upload};
use dash_model::{ModelError, SelectionKey};
use dash_viz::resolve_selection;
use thiserror::Error;
use tracing::{debug, warn};

use crate::render::{apply_table_style, header_cell, write_dashboard};

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Upload(PathBuf),
    Select { key: SelectionKey, column: String },
    Show,
    Keys,
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error(transparent)]
    Key(#[from] ModelError),
}

impl FromStr for SessionCommand {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));
        match word.to_lowercase().as_str() {
            "upload" if rest.is_empty() => Err(CommandError::MissingArgument {
                command: "upload",
                argument: "a file path",
            }),
            "upload" => Ok(Self::Upload(PathBuf::from(rest))),
            "select" => {
                let (key, column) = rest
                    .split_once(char::is_whitespace)
                    .map(|(key, column)| (key, column.trim()))
                    .filter(|(_, column)| !column.is_empty())
                    .ok_or(CommandError::MissingArgument {
                        command: "select",
                        argument: "a key and a column",
                    })?;
                Ok(Self::Select {
                    key: key.parse()?,
                    column: column.to_string(),
                })
            }
            "show" => Ok(Self::Show),
            "keys" => Ok(Self::Keys),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

const HELP: &str = "\
Commands:
  upload <PATH>          load a file and reset all selections
  select <KEY> <COLUMN>  choose the column for a chart selector
  show                   render the dashboard again
  keys                   list selector keys and their current columns
  quit                   leave the session";

/// Drives a [`Session`] from text commands.
pub struct Repl<'a> {
    session: Session,
    config: &'a DashboardConfig,
    /// Result of the latest successful render; cleared when a render fails.
    dashboard: Option<Dashboard>,
}

impl<'a> Repl<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self {
            session: Session::new(),
            config,
            dashboard: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    /// Reads commands until `quit` or end of input.
    ///
    /// Command and pipeline failures are reported inline and the session
    /// continues; only I/O errors on `input`/`out` end it.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<SessionCommand>() {
                Ok(SessionCommand::Quit) => break,
                Ok(command) => self.execute(command, out)?,
                Err(error) => writeln!(out, "error: {error}")?,
            }
        }
        Ok(())
    }

    pub fn execute<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> io::Result<()> {
        debug!(?command, "session command");
        match command {
            SessionCommand::Upload(path) => match Upload::from_path(&path) {
                Ok(upload) => {
                    self.session.upload(upload);
                    self.rerender(out)?;
                }
                Err(error) => {
                    writeln!(out, "error: failed to read {}: {error}", path.display())?;
                }
            },
            SessionCommand::Select { key, column } => {
                self.session.select(key, column.clone());
                let rendered = self.refresh();
                self.report_fallback(key, &column, out)?;
                match rendered {
                    Ok(()) => self.render(out)?,
                    Err(error) => writeln!(out, "error: {error}")?,
                }
            }
            SessionCommand::Show => self.rerender(out)?,
            SessionCommand::Keys => self.write_keys(out)?,
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => {}
        }
        Ok(())
    }

    /// Re-runs the pipeline for the current upload and selections.
    fn refresh(&mut self) -> dash_core::Result<()> {
        self.dashboard = None;
        self.dashboard = self.session.render(self.config)?;
        Ok(())
    }

    fn rerender<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.refresh() {
            Ok(()) => self.render(out),
            Err(error) => writeln!(out, "error: {error}"),
        }
    }

    fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match &self.dashboard {
            Some(dashboard) => write_dashboard(out, dashboard, self.config.table_width),
            None => writeln!(out, "Nothing uploaded yet. Use 'upload <PATH>'."),
        }
    }

    /// Notes when a stored column will not be used for its selector.
    fn report_fallback<W: Write>(
        &self,
        key: SelectionKey,
        column: &str,
        out: &mut W,
    ) -> io::Result<()> {
        let Some(dashboard) = &self.dashboard else {
            return Ok(());
        };
        let resolved = resolve_selection(key, self.session.state(), &dashboard.column_sets);
        if resolved != Some(column) {
            warn!(%key, column, ?resolved, "selection is not eligible");
            writeln!(
                out,
                "note: '{column}' is not a {} column; {key} uses {}",
                key.class(),
                resolved.unwrap_or("nothing")
            )?;
        }
        Ok(())
    }

    fn write_keys<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let sets = self.dashboard.as_ref().map(|dashboard| &dashboard.column_sets);
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Key"),
            header_cell("Prompt"),
            header_cell("Column"),
        ]);
        apply_table_style(&mut table, self.config.table_width);
        for key in SelectionKey::all() {
            let column = sets
                .and_then(|sets| resolve_selection(key, self.session.state(), sets))
                .unwrap_or("-");
            table.add_row(vec![
                Cell::new(key),
                Cell::new(key.prompt()),
                Cell::new(column),
            ]);
        }
        writeln!(out, "{table}")
    }
}
