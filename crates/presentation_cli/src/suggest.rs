//! Interactive suggestion session on stdin
//!
//! Every line is treated as the new content of the search box. A line of the
//! form `:N` picks suggestion number N from the current list.

use std::time::Duration;

use application::{SessionPhase, SuggestionSession};
use domain::ResolvedLocation;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::output;

/// Extra time allowed for an in-flight search once input has ended
const PENDING_SEARCH_GRACE: Duration = Duration::from_secs(10);

/// What a single input line asks for
#[derive(Debug, PartialEq, Eq)]
pub enum InputLine {
    /// New search box content
    Text(String),
    /// Zero-based index of the chosen suggestion
    Select(usize),
}

/// Interpret one input line
pub fn parse_line(line: &str) -> InputLine {
    line.trim()
        .strip_prefix(':')
        .and_then(|n| n.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .map_or_else(|| InputLine::Text(line.to_string()), |n| InputLine::Select(n - 1))
}

/// Drive `session` from `input` until a suggestion is picked or input ends
///
/// # Errors
///
/// Returns an error if reading the input fails.
pub async fn run<R>(session: &SuggestionSession, input: R) -> anyhow::Result<Option<ResolvedLocation>>
where
    R: AsyncRead + Unpin,
{
    let mut updates = session.subscribe();
    let mut lines = BufReader::new(input).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line) {
                    InputLine::Text(text) => {
                        session.on_input(text);
                    },
                    InputLine::Select(index) => match session.select(index) {
                        Some(location) => return Ok(Some(location)),
                        None => println!("No suggestion #{}", index + 1),
                    },
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                println!("{}", output::suggestions(&snapshot));
            }
        }
    }

    if session.phase() != SessionPhase::Idle {
        let wait = session.config().debounce() + PENDING_SEARCH_GRACE;
        if matches!(tokio::time::timeout(wait, updates.changed()).await, Ok(Ok(()))) {
            let snapshot = updates.borrow_and_update().clone();
            println!("{}", output::suggestions(&snapshot));
        }
    }

    Ok(None)
}
