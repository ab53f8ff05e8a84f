//! Log line parser
//!
//! Turns the text output of the increment workers into a sequence of
//! [`Event`]s. A recognizable line contains, anywhere in it:
//!
//! ```text
//! [<thread_id>] <variable> = <value>
//! ```
//!
//! e.g. `[2] glob = 10481`. At least one whitespace character must separate
//! `]` from the variable name; whitespace around `=` is optional. Lines that
//! do not contain this shape are skipped silently and file order is kept.
//! Bytes that are not valid UTF-8 are replaced before matching, so a stray
//! Latin-1 byte only affects the line it is on.

use crate::config::ParserConfig;
use crate::types::{AnalyzerError, Event, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse a single log line.
///
/// Returns the first observation in the line whose thread passes the
/// config's thread filter, or `None` if there is none.
pub fn parse_line(line: &str, config: &ParserConfig) -> Option<Event> {
    line.match_indices('[').find_map(|(start, _)| {
        match_observation(&line[start + 1..], &config.variable_name)
            .filter(|event| config.should_keep_thread(event.thread_id))
    })
}

/// Try to match `<digits>] <variable> = <digits>` at the start of `rest`
/// (the text right after a `[`).
fn match_observation(rest: &str, variable: &str) -> Option<Event> {
    let (thread_str, rest) = take_digits(rest)?;
    let rest = rest.strip_prefix(']')?;

    let after_space = rest.trim_start();
    if after_space.len() == rest.len() {
        return None;
    }

    let rest = after_space.strip_prefix(variable)?;
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let (value_str, _) = take_digits(rest)?;

    // Numbers too large for their type make the line unrecognizable
    let thread_id = thread_str.parse().ok()?;
    let value = value_str.parse().ok()?;
    Some(Event::new(thread_id, value))
}

/// Split off the leading run of ASCII digits, if there is at least one.
fn take_digits(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    (end > 0).then(|| s.split_at(end))
}

/// Parse all events from an in-memory log
pub fn parse_str(text: &str, config: &ParserConfig) -> Vec<Event> {
    text.lines()
        .filter_map(|line| parse_line(line, config))
        .collect()
}

/// Parse all events from a buffered reader
pub fn parse_reader<R: BufRead>(reader: R, config: &ParserConfig) -> Result<Vec<Event>> {
    EventIterator::new(reader, config.clone()).collect()
}

/// Parse all events from a log file
pub fn parse_file(path: &Path, config: &ParserConfig) -> Result<Vec<Event>> {
    LogParser::parse(path, config.clone())?.collect()
}

/// Text log file parser
pub struct LogParser;

impl LogParser {
    /// Open a log file and return an iterator over its events
    pub fn parse(path: &Path, config: ParserConfig) -> Result<EventIterator<BufReader<File>>> {
        log::info!("Parsing log file: {:?}", path);

        if !path.exists() {
            return Err(AnalyzerError::LogRead(format!(
                "Log file not found: {:?}",
                path
            )));
        }

        let file = File::open(path).map_err(|e| {
            AnalyzerError::LogRead(format!("Failed to open log file {:?}: {}", path, e))
        })?;

        Ok(EventIterator::new(BufReader::new(file), config))
    }
}

/// Iterator over the events of a line-oriented log
pub struct EventIterator<R> {
    reader: R,
    buffer: Vec<u8>,
    config: ParserConfig,
    lines_read: usize,
    events_emitted: usize,
    finished: bool,
}

impl<R: BufRead> EventIterator<R> {
    pub fn new(reader: R, config: ParserConfig) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(256),
            config,
            lines_read: 0,
            events_emitted: 0,
            finished: false,
        }
    }

    /// Lines consumed so far
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Lines consumed so far that produced no event
    pub fn lines_skipped(&self) -> usize {
        self.lines_read - self.events_emitted
    }
}

impl<R: BufRead> Iterator for EventIterator<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => {
                    self.finished = true;
                    log::debug!(
                        "Parsed {} events from {} lines ({} skipped)",
                        self.events_emitted,
                        self.lines_read,
                        self.lines_skipped()
                    );
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }

            self.lines_read += 1;
            let line = String::from_utf8_lossy(trim_line_ending(&self.buffer));
            if let Some(event) = parse_line(&line, &self.config) {
                self.events_emitted += 1;
                return Some(Ok(event));
            }
            log::trace!("Skipping line {}: {:?}", self.lines_read, line);
        }
    }
}

/// Strip a trailing `\n` or `\r\n`
fn trim_line_ending(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}
