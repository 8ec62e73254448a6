//! # Data Sources
//!
//! Concrete [`DataSource`] implementations behind the `[source]` table:
//!
//! - `csv` - header row names the columns, every cell is a text value
//! - `jsonl` - one JSON object per line, JSON types preserved
//! - `stdin` - comma separated rows zipped with the headers, `STOP` ends input

use crate::config::{KastConfig, SourceKind, validate_file_path, validate_file_size};
use kast_core::{DataSource, Frame, KastError, ReplaySource, Value, primitives::check_frame_limits};
use std::io::BufRead;
use std::path::Path;

/// Maximum size of a replay file (100 MB).
///
/// Replay files are read into memory whole.
const MAX_SOURCE_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Line that ends an interactive session.
pub const STOP_COMMAND: &str = "STOP";

// =============================================================================
// RECORD SPLITTING
// =============================================================================

/// Split one comma separated record.
///
/// Double-quoted cells may contain commas (`"[0,0,1]"`); a doubled quote
/// inside a quoted cell is a literal quote. Cells are trimmed.
pub fn split_record(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => {
                cells.push(cell.trim().to_string());
                cell.clear();
            }
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

fn zip_record(headers: &[String], cells: Vec<String>, line_no: usize) -> Result<Frame, KastError> {
    if cells.len() != headers.len() {
        return Err(KastError::Source(format!(
            "line {}: expected {} values, found {}",
            line_no,
            headers.len(),
            cells.len()
        )));
    }
    Ok(headers
        .iter()
        .cloned()
        .zip(cells.into_iter().map(Value::Text))
        .collect())
}

// =============================================================================
// FILE REPLAY
// =============================================================================

/// Parse CSV text into a replay.
pub fn parse_csv(text: &str) -> Result<ReplaySource, KastError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines
        .next()
        .ok_or_else(|| KastError::Source("CSV input has no header row".to_string()))?;
    let headers = split_record(header_line);
    check_frame_limits(headers.iter()).map_err(KastError::Source)?;

    let frames = lines
        .map(|(i, line)| zip_record(&headers, split_record(line), i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReplaySource::new(headers, frames))
}

/// Parse JSON lines into a replay.
///
/// Headers are the union of every frame's names.
pub fn parse_jsonl(text: &str) -> Result<ReplaySource, KastError> {
    let mut frames = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let frame: Frame = serde_json::from_str(line)
            .map_err(|e| KastError::Source(format!("line {}: {}", i + 1, e)))?;
        check_frame_limits(frame.keys()).map_err(KastError::Source)?;
        frames.push(frame);
    }
    Ok(ReplaySource::from_frames(frames))
}

fn read_source_file(path: &Path) -> Result<String, KastError> {
    let path = validate_file_path(path)?;
    validate_file_size(&path, MAX_SOURCE_FILE_SIZE)?;
    std::fs::read_to_string(&path)
        .map_err(|e| KastError::IoError(format!("Read source: {}", e)))
}

/// Load a CSV replay file.
pub fn load_csv(path: &Path) -> Result<ReplaySource, KastError> {
    let source = parse_csv(&read_source_file(path)?)?;
    tracing::info!(path = %path.display(), frames = source.remaining(), "csv source loaded");
    Ok(source)
}

/// Load a JSON lines replay file.
pub fn load_jsonl(path: &Path) -> Result<ReplaySource, KastError> {
    let source = parse_jsonl(&read_source_file(path)?)?;
    tracing::info!(path = %path.display(), frames = source.remaining(), "jsonl source loaded");
    Ok(source)
}

// =============================================================================
// LINE SOURCE (stdin)
// =============================================================================

/// Frames typed one row at a time.
///
/// Blank lines are skipped, and so are rows with the wrong number of cells
/// (logged at warn). End of input or a `STOP` line ends the source.
pub struct LineSource<R> {
    reader: R,
    headers: Vec<String>,
    pending: Option<Result<Frame, KastError>>,
    finished: bool,
    line_no: usize,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R, headers: Vec<String>) -> Self {
        Self {
            reader,
            headers,
            pending: None,
            finished: false,
            line_no: 0,
        }
    }

    fn read_next(&mut self) {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.finished = true;
                    return;
                }
                Ok(_) => {
                    self.line_no += 1;
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if trimmed == STOP_COMMAND {
                        tracing::info!("stop requested");
                        self.finished = true;
                        return;
                    }
                    match zip_record(&self.headers, split_record(trimmed), self.line_no) {
                        Ok(frame) => {
                            self.pending = Some(Ok(frame));
                            return;
                        }
                        Err(e) => {
                            tracing::warn!(line = self.line_no, error = %e, "skipping row");
                            continue;
                        }
                    }
                }
                Err(e) => {
                    self.pending = Some(Err(KastError::IoError(format!("Read line: {}", e))));
                    self.finished = true;
                    return;
                }
            }
        }
    }
}

impl<R: BufRead> DataSource for LineSource<R> {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn has_more(&mut self) -> bool {
        if self.pending.is_none() && !self.finished {
            self.read_next();
        }
        self.pending.is_some()
    }

    fn get_new_information(&mut self) -> Result<Frame, KastError> {
        if self.pending.is_none() && !self.finished {
            self.read_next();
        }
        self.pending
            .take()
            .unwrap_or_else(|| Err(KastError::Source("input ended".to_string())))
    }
}

// =============================================================================
// FACTORY
// =============================================================================

/// Open the source described by `config`.
pub fn open(config: &KastConfig) -> Result<Box<dyn DataSource>, KastError> {
    let data_path = config.data_path();
    let missing_path = || KastError::Config("source.path is not set".to_string());

    match config.source.kind {
        SourceKind::Csv => Ok(Box::new(load_csv(&data_path.ok_or_else(missing_path)?)?)),
        SourceKind::Jsonl => Ok(Box::new(load_jsonl(&data_path.ok_or_else(missing_path)?)?)),
        SourceKind::Stdin => Ok(Box::new(open_stdin(config))),
    }
}

/// A line source over standard input, using the configured headers.
pub fn open_stdin(config: &KastConfig) -> LineSource<std::io::StdinLock<'static>> {
    LineSource::new(std::io::stdin().lock(), config.low_level_headers(&[]))
}

// =============================================================================
// TESTS
// =============================================================================
