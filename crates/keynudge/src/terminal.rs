//! Terminal adapters for presenting suggestions and confirming a clear.

use async_trait::async_trait;
use keynudge_engine::common::{Response, Suggestion};
use keynudge_engine::manage::ClearConfirmation;
use keynudge_engine::presenter::PresentationSink;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Map a typed answer to a response. Anything unrecognized is no answer.
pub fn parse_answer(answer: &str) -> Option<Response> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "got it" => Some(Response::Acknowledge),
        "n" | "no" | "dismiss" => Some(Response::Dismiss),
        _ => None,
    }
}

async fn prompt(reader: &Mutex<Lines<BufReader<Stdin>>>, question: &str) -> Option<String> {
    print!("{}", question);
    if io::stdout().flush().is_err() {
        return None;
    }
    let mut lines = reader.lock().await;
    lines.next_line().await.ok().flatten()
}

fn stdin_lines() -> Mutex<Lines<BufReader<Stdin>>> {
    Mutex::new(BufReader::new(tokio::io::stdin()).lines())
}

/// Asks on the terminal and waits for the answer.
pub struct PromptPresenter {
    reader: Mutex<Lines<BufReader<Stdin>>>,
}

impl PromptPresenter {
    pub fn new() -> Self {
        Self {
            reader: stdin_lines(),
        }
    }
}

#[async_trait]
impl PresentationSink for PromptPresenter {
    async fn present(&self, suggestion: &Suggestion) -> Option<Response> {
        let [acknowledge, dismiss] = suggestion.options;
        let question = format!(
            "\n{}\n  [y] {}  [n] {} > ",
            suggestion.message,
            acknowledge.label(),
            dismiss.label()
        );
        let answer = prompt(&self.reader, &question).await?;
        parse_answer(&answer)
    }
}

/// Requires the literal answer `yes`.
pub struct PromptConfirmation {
    reader: Mutex<Lines<BufReader<Stdin>>>,
}

impl PromptConfirmation {
    pub fn new() -> Self {
        Self {
            reader: stdin_lines(),
        }
    }
}

#[async_trait]
impl ClearConfirmation for PromptConfirmation {
    async fn confirm_clear(&self, count: usize) -> bool {
        let question = format!(
            "This forgets {} learned shortcut(s) and cannot be undone. Type 'yes' to continue: ",
            count
        );
        prompt(&self.reader, &question)
            .await
            .is_some_and(|answer| answer.trim() == "yes")
    }
}
