//! Interactive surface: line classification, rendering, and the read loop.

use crate::resolve::{Dispatcher, Session, TurnReport, NOT_UNDERSTOOD_MESSAGE};
use crate::tools::ToolCatalog;
use crate::types::{Result, TurnId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::Instrument;

pub const PROMPT: &str = "Enter command or natural language math expression (or 'quit'): ";

/// Inputs that print the catalog instead of being resolved.
pub const LISTING_SYNONYMS: &[&str] = &[
    "tools",
    "list tools",
    "what tools do you have",
    "available tools",
    "list available tools",
];

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    ListTools,
    Empty,
    Resolve(String),
}

pub fn classify(line: &str) -> Command {
    let trimmed = line.trim();
    let lowered = trimmed.to_lowercase();
    match lowered.as_str() {
        "" => Command::Empty,
        "quit" | "exit" => Command::Quit,
        s if LISTING_SYNONYMS.contains(&s) => Command::ListTools,
        _ => Command::Resolve(trimmed.to_string()),
    }
}

pub fn render_catalog(catalog: &ToolCatalog) -> String {
    let mut lines = vec!["=== Available MCP Tools ===".to_string()];
    for tool in catalog.iter() {
        lines.push(format!(
            "- {}: {}",
            tool.name,
            tool.description.as_deref().unwrap_or("(no description)")
        ));
    }
    lines.push("============================".to_string());
    lines.join("\n")
}

pub fn render_report(report: &TurnReport) -> String {
    match report {
        TurnReport::NotUnderstood => NOT_UNDERSTOOD_MESSAGE.to_string(),
        TurnReport::Completed {
            invocation, output, ..
        } => format!(
            "Calling tool '{}' with arguments: {}\n=== Result ===\n{} = {}\n==============",
            invocation.tool_name,
            serde_json::Value::Object(invocation.args.clone()),
            invocation,
            output.text
        ),
    }
}

/// Read commands until quit or EOF.
///
/// Tool failures are printed and the loop continues; only a fatal error ends it.
pub async fn run<R, W>(
    input: R,
    output: &mut W,
    dispatcher: &Dispatcher,
    session: &mut Session,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let text = match classify(&line) {
            Command::Empty => continue,
            Command::Quit => {
                output.write_all(b"Bye!\n").await?;
                break;
            }
            Command::ListTools => {
                let listing = render_catalog(session.catalog());
                output.write_all(format!("\n{}\n\n", listing).as_bytes()).await?;
                continue;
            }
            Command::Resolve(text) => text,
        };

        let span = tracing::info_span!(
            "turn",
            turn_id = %TurnId::new(),
            session = session.id().as_str()
        );
        let rendered = match dispatcher.run_turn(&text, session).instrument(span).await {
            Ok(report) => render_report(&report),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!(kind = e.kind(), "turn_failed: {}", e);
                format!("Error: {}", e)
            }
        };
        output.write_all(format!("{}\n\n", rendered).as_bytes()).await?;
    }

    output.flush().await?;
    Ok(())
}
