//! Terminal rendition of the data set page.
//!
//! One line of input is one user action. The page is redrawn after every
//! action and every live event.

use anyhow::Result;
use mlnano_client::{ClientError, DataApi, ObjectStorage};
use mlnano_models::DataSetRecord;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::controller::{CreateOutcome, DataSetController, PendingFile};

const HELP: &str = "\
commands:
  file <path>    pick a file to upload
  text <value>   upload a raw text value instead of a file
  name <label>   set the data set name
  save           upload the file and record it
  open <n>       show a link to the file of list entry n
  list           redraw the page
  help           show this message
  quit           leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    File(PathBuf),
    Text(String),
    Name(String),
    Save,
    /// 1-based position in the rendered list.
    Open(usize),
    List,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'file' needs a path")]
    MissingPath,
    #[error("'open' needs a list number, got '{0}'")]
    BadIndex(String),
}

impl ConsoleInput {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, InputError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        let input = match command {
            "file" | "f" if rest.is_empty() => return Err(InputError::MissingPath),
            "file" | "f" => ConsoleInput::File(PathBuf::from(rest)),
            "text" | "t" => ConsoleInput::Text(rest.to_string()),
            "name" | "n" => ConsoleInput::Name(rest.to_string()),
            "save" | "s" => ConsoleInput::Save,
            "open" | "o" => match rest.parse::<usize>() {
                Ok(index) if index > 0 => ConsoleInput::Open(index),
                _ => return Err(InputError::BadIndex(rest.to_string())),
            },
            "list" | "ls" => ConsoleInput::List,
            "help" | "?" => ConsoleInput::Help,
            "quit" | "q" | "exit" => ConsoleInput::Quit,
            other => return Err(InputError::Unknown(other.to_string())),
        };
        Ok(Some(input))
    }
}

/// Draw the form, the list and the resolved file link.
pub fn render_page<A, S, W>(
    controller: &DataSetController<A, S>,
    out: &mut W,
) -> std::io::Result<()>
where
    A: DataApi,
    S: ObjectStorage,
    W: Write,
{
    writeln!(out, "== data sets ==")?;
    match controller.pending_file() {
        Some(file) if file.name.is_empty() => {
            writeln!(out, "file: <text value> ({}, {} bytes)", file.mime_type, file.len())?
        }
        Some(file) => writeln!(
            out,
            "file: {} ({}, {} bytes)",
            file.name,
            file.mime_type,
            file.len()
        )?,
        None => writeln!(out, "file: <none>")?,
    }
    writeln!(out, "name: {}", controller.pending_name())?;
    writeln!(out)?;

    let data_sets = controller.data_sets();
    if data_sets.is_empty() {
        writeln!(out, "  (no data sets)")?;
    }
    for (index, record) in data_sets.iter().enumerate() {
        writeln!(out, "{:>3}. {}", index + 1, record.name)?;
    }

    if let Some(image) = controller.image() {
        writeln!(out)?;
        writeln!(out, "file {}: {}", image.key, image.url)?;
    }
    out.flush()
}

enum Step {
    Line(Option<String>),
    Live(Option<Result<DataSetRecord, ClientError>>),
}

/// Run the page against stdin/stdout until `quit` or end of input.
pub async fn run_console<A, S>(controller: &mut DataSetController<A, S>) -> Result<()>
where
    A: DataApi,
    S: ObjectStorage,
{
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_console_with(controller, stdin, &mut stdout).await
}

pub async fn run_console_with<A, S, R, W>(
    controller: &mut DataSetController<A, S>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    A: DataApi,
    S: ObjectStorage,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    controller.activate().await;
    render_page(controller, out)?;

    let mut lines = input.lines();
    let result = loop {
        let step = tokio::select! {
            line = lines.next_line() => match line {
                Ok(line) => Step::Line(line),
                Err(e) => break Err(e.into()),
            },
            event = controller.next_live_event(), if controller.is_active() => Step::Live(event),
        };

        match step {
            Step::Line(None) => break Ok(()),
            Step::Line(Some(line)) => match ConsoleInput::parse(&line) {
                Ok(None) => continue,
                Ok(Some(ConsoleInput::Quit)) => break Ok(()),
                Ok(Some(input)) => handle_input(controller, input, out).await?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Step::Live(event) => controller.apply_live_event(event),
        }
        render_page(controller, out)?;
    };

    controller.deactivate();
    result
}

async fn handle_input<A, S, W>(
    controller: &mut DataSetController<A, S>,
    input: ConsoleInput,
    out: &mut W,
) -> Result<()>
where
    A: DataApi,
    S: ObjectStorage,
    W: Write,
{
    debug!(?input, "console input");
    match input {
        ConsoleInput::File(path) => match PendingFile::from_path(&path).await {
            Ok(file) => controller.select_file(file),
            Err(e) => {
                warn!("cannot pick file: {e:#}");
                writeln!(out, "cannot read {}: {e:#}", path.display())?;
            }
        },
        ConsoleInput::Text(value) => controller.select_file(PendingFile::from_text(value)),
        ConsoleInput::Name(name) => controller.set_name(name),
        ConsoleInput::Save => match controller.create().await {
            CreateOutcome::Alert(message) => writeln!(out, "!! {message}")?,
            CreateOutcome::Skipped => {}
            CreateOutcome::Stored { key } => writeln!(out, "saved {key}")?,
            CreateOutcome::Failed { stage, .. } => {
                writeln!(out, "{stage} failed, see log")?
            }
        },
        ConsoleInput::Open(index) => {
            let key = controller
                .data_sets()
                .get(index - 1)
                .map(|record| record.file.key.clone());
            match key {
                Some(key) => controller.fetch_image(&key).await,
                None => writeln!(out, "no data set #{index}")?,
            }
        }
        ConsoleInput::Help => writeln!(out, "{HELP}")?,
        ConsoleInput::List | ConsoleInput::Quit => {}
    }
    Ok(())
}
