//! Drives the engine from a stream of JSON event lines.

use crate::engine::{Outcome, RecommendationEngine};
use keynudge_common::{EventContext, InteractionEvent, Response};
use std::error::Error;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

#[derive(Clone, Copy)]
pub struct OutputHandlers {
    pub out: fn(&str),
    pub err: fn(&str),
}

pub enum LineErrorMode {
    Plain,
    WithLine,
}

pub struct StreamOptions<'a> {
    pub exit_commands: &'a [&'a str],
    pub handle_ctrl_c: bool,
    pub ctrl_c_message: Option<&'a str>,
    pub error_mode: LineErrorMode,
    /// Report skipped events too, not only suggestions.
    pub report_skips: bool,
}

impl Default for StreamOptions<'_> {
    fn default() -> Self {
        Self {
            exit_commands: &["exit", "quit"],
            handle_ctrl_c: true,
            ctrl_c_message: None,
            error_mode: LineErrorMode::WithLine,
            report_skips: false,
        }
    }
}

/// Totals for one stream run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub events: usize,
    pub presented: usize,
    pub learned: usize,
    pub errors: usize,
}

/// Parse one event line.
pub fn parse_event(line: &str) -> Result<InteractionEvent, serde_json::Error> {
    let context: EventContext = serde_json::from_str(line)?;
    Ok(InteractionEvent::new(context))
}

pub fn describe_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Skipped(reason) => format!("No suggestion ({:?})", reason),
        Outcome::Presented {
            suggestion,
            response,
            learned,
        } => {
            let answer = match response {
                Some(Response::Acknowledge) => "acknowledged",
                Some(Response::Dismiss) => "dismissed",
                None => "no response",
            };
            if *learned {
                format!("{} [{}, learned]", suggestion.message, answer)
            } else {
                format!("{} [{}]", suggestion.message, answer)
            }
        }
    }
}

async fn handle_line(
    engine: &RecommendationEngine,
    output: OutputHandlers,
    options: &StreamOptions<'_>,
    summary: &mut StreamSummary,
    line: &str,
) {
    let event = match parse_event(line) {
        Ok(event) => event,
        Err(e) => {
            summary.errors += 1;
            report_error(output, options, line, &format!("Invalid event: {}", e));
            return;
        }
    };
    summary.events += 1;

    match engine.on_interaction(&event).await {
        Ok(outcome) => {
            if let Outcome::Presented { learned, .. } = &outcome {
                summary.presented += 1;
                if *learned {
                    summary.learned += 1;
                }
                (output.out)(&describe_outcome(&outcome));
            } else if options.report_skips {
                (output.out)(&describe_outcome(&outcome));
            }
        }
        Err(e) => {
            summary.errors += 1;
            report_error(output, options, line, &e.to_string());
        }
    }
}

fn report_error(output: OutputHandlers, options: &StreamOptions<'_>, line: &str, message: &str) {
    match options.error_mode {
        LineErrorMode::Plain => (output.err)(&format!("Error: {}", message)),
        LineErrorMode::WithLine => {
            (output.err)(&format!("Error handling event '{}': {}", line, message))
        }
    }
}

/// Fire the synthetic tip-of-the-day event.
pub async fn tip_of_the_day(engine: &RecommendationEngine, output: OutputHandlers) {
    let event = InteractionEvent::new(EventContext::TipOfTheDay);
    match engine.on_interaction(&event).await {
        Ok(outcome @ Outcome::Presented { .. }) => (output.out)(&describe_outcome(&outcome)),
        Ok(_) => {}
        Err(e) => (output.err)(&format!("Error: {}", e)),
    }
}

/// Read every event from a file. Event errors are reported and skipped.
pub async fn run_file(
    engine: &RecommendationEngine,
    output: OutputHandlers,
    path: &str,
    options: StreamOptions<'_>,
) -> Result<StreamSummary, Box<dyn Error>> {
    let content = tokio::fs::read_to_string(path).await?;
    let mut summary = StreamSummary::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        handle_line(engine, output, &options, &mut summary, trimmed).await;
    }
    Ok(summary)
}

/// Possible outcomes from reading a single input line.
enum ReadLineResult {
    /// A non-empty event line to process.
    Input(String),
    /// Empty line or comment -- skip.
    Skip,
    /// EOF or exit command -- terminate the loop.
    Exit,
    /// I/O error while reading.
    Error(io::Error),
}

async fn read_line<R: AsyncBufRead + Unpin>(
    reader: &mut tokio::io::Lines<R>,
    options: &StreamOptions<'_>,
    output: OutputHandlers,
) -> ReadLineResult {
    if options.handle_ctrl_c {
        tokio::select! {
            line = reader.next_line() => {
                classify_line(line, options.exit_commands)
            }
            _ = tokio::signal::ctrl_c() => {
                if let Some(message) = options.ctrl_c_message {
                    (output.out)(message);
                }
                ReadLineResult::Exit
            }
        }
    } else {
        classify_line(reader.next_line().await, options.exit_commands)
    }
}

fn classify_line(
    result: Result<Option<String>, io::Error>,
    exit_commands: &[&str],
) -> ReadLineResult {
    match result {
        Ok(Some(input)) => {
            let trimmed = input.trim().to_string();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                ReadLineResult::Skip
            } else if exit_commands.contains(&trimmed.as_str()) {
                ReadLineResult::Exit
            } else {
                ReadLineResult::Input(trimmed)
            }
        }
        Ok(None) => ReadLineResult::Exit,
        Err(e) => ReadLineResult::Error(e),
    }
}

/// Read events from any line source until EOF or an exit command.
pub async fn run_stream<R: AsyncBufRead + Unpin>(
    engine: &RecommendationEngine,
    output: OutputHandlers,
    reader: R,
    options: StreamOptions<'_>,
) -> Result<StreamSummary, Box<dyn Error>> {
    let mut lines = reader.lines();
    let mut summary = StreamSummary::default();

    loop {
        match read_line(&mut lines, &options, output).await {
            ReadLineResult::Input(line) => {
                handle_line(engine, output, &options, &mut summary, &line).await
            }
            ReadLineResult::Skip => continue,
            ReadLineResult::Exit => break,
            ReadLineResult::Error(e) => return Err(e.into()),
        }
    }
    Ok(summary)
}

pub async fn run_stdin(
    engine: &RecommendationEngine,
    output: OutputHandlers,
    options: StreamOptions<'_>,
) -> Result<StreamSummary, Box<dyn Error>> {
    run_stream(engine, output, BufReader::new(tokio::io::stdin()), options).await
}
