//! mcp-intent - interactive entry point.
//!
//! Launches the tool server over stdio, discovers its tools, and resolves
//! each line typed by the user into a tool call.

use clap::Parser;
use mcp_intent::repl;
use mcp_intent::transport::McpClient;
use mcp_intent::{Config, Dispatcher, Session};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};

#[derive(Debug, Parser)]
#[command(
    name = "mcp-intent",
    version,
    about = "Resolve plain-language commands into MCP tool calls"
)]
struct Args {
    /// JSON config file; flags below override it.
    #[arg(long, env = "MCP_INTENT_CONFIG")]
    config: Option<PathBuf>,

    /// Tool server executable (speaks MCP on stdio).
    #[arg(long, env = "MCP_INTENT_SERVER")]
    server: Option<String>,

    /// Argument for the tool server; repeat for several.
    #[arg(long = "server-arg")]
    server_args: Vec<String>,

    /// Chat-completion endpoint for assisted resolution.
    #[arg(long, env = "MCP_INTENT_ASSISTANT_URL")]
    assistant_url: Option<String>,

    /// Model requested from the assistant.
    #[arg(long, env = "MCP_INTENT_MODEL")]
    model: Option<String>,

    /// Assisted resolution timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Skip assisted resolution; use intercepts and keywords only.
    #[arg(long)]
    no_assistant: bool,

    /// Location used by the weather intercept when none is named.
    #[arg(long)]
    default_location: Option<String>,

    /// Emit JSON logs.
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn into_config(self) -> mcp_intent::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(server) = self.server {
            config.server.command = server;
            config.server.args = self.server_args;
        } else if !self.server_args.is_empty() {
            config.server.args = self.server_args;
        }
        if let Some(url) = self.assistant_url {
            config.assistant.endpoint = url;
        }
        if let Some(model) = self.model {
            config.assistant.model = model;
        }
        if let Some(secs) = self.timeout_secs {
            config.assistant.timeout = Duration::from_secs(secs);
        }
        if self.no_assistant {
            config.assistant.enabled = false;
        }
        if let Some(location) = self.default_location {
            config.intercepts.default_location = location;
        }
        config.observability.json_logs |= self.json_logs;

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize observability
    mcp_intent::observability::init_tracing(&config.observability);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind(), "session_failed: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> mcp_intent::Result<()> {
    let dispatcher = Dispatcher::from_config(&config)?;
    let client = McpClient::spawn(&config.server).await?;
    let mut session = Session::connect(Box::new(client)).await?;

    let mut stdout = tokio::io::stdout();
    let banner = format!(
        "\n{}\n\nType commands like 'add 5 3' or 'recent'. Type 'quit' to exit.\n\n",
        repl::render_catalog(session.catalog())
    );
    stdout.write_all(banner.as_bytes()).await?;

    let stdin = BufReader::new(tokio::io::stdin());
    repl::run(stdin, &mut stdout, &dispatcher, &mut session).await
}
