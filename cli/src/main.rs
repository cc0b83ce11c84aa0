use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{Value, json};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid route '{0}': expected <category>/<tool> or /api/<category>/<tool>")]
    InvalidRoute(String),
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },
}

#[derive(Parser, Debug)]
#[command(name = "toolbench-cli", about = "Command-line client for the toolbench server")]
struct Cli {
    #[arg(long, env = "TOOLBENCH_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    /// List every available tool.
    Tools,
    /// Show per-tool usage counters.
    Analytics,
    /// POST a raw JSON body to any tool route.
    Run {
        /// `converters/caesar` or `/api/converters/caesar`.
        route: String,
        #[arg(long, default_value = "{}")]
        json: String,
    },
    /// Encode text as Morse code (or decode with --decode).
    Morse {
        text: String,
        #[arg(long)]
        decode: bool,
    },
    /// Parse a User-Agent string.
    Ua { user_agent: String },
    /// Caesar-shift text.
    Caesar {
        text: String,
        #[arg(long, default_value_t = 3)]
        shift: i64,
        #[arg(long)]
        decode: bool,
        #[arg(long, conflicts_with_all = ["shift", "decode"])]
        brute_force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli.base_url, cli.command).await {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(rendered) => {
                println!("{rendered}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("error: {error}");
                ExitCode::FAILURE
            }
        },
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(base_url: &str, command: Command) -> Result<Value, CliError> {
    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let api = Api { client, base_url: base_url.trim_end_matches('/').to_owned() };

    match command {
        Command::Ping => {
            api.get("/healthz").await?;
            Ok(json!("ok"))
        }
        Command::Tools => api.get("/api/tools").await,
        Command::Analytics => api.get("/api/analytics").await,
        Command::Run { route, json } => {
            let body = serde_json::from_str::<Value>(&json)?;
            api.post(&route_path(&route)?, &body).await
        }
        Command::Morse { text, decode } => {
            let mode = if decode { "decode" } else { "encode" };
            api.post("/api/converters/text-to-morse", &json!({ "text": text, "mode": mode })).await
        }
        Command::Ua { user_agent } => {
            api.post("/api/web-tools/user-agent-parser", &json!({ "userAgent": user_agent })).await
        }
        Command::Caesar { text, shift, decode, brute_force } => {
            let mode = match (brute_force, decode) {
                (true, _) => "brute_force",
                (false, true) => "decode",
                (false, false) => "encode",
            };
            api.post("/api/converters/caesar", &json!({ "text": text, "shift": shift, "mode": mode })).await
        }
    }
}

struct Api {
    client: reqwest::Client,
    base_url: String,
}

impl Api {
    async fn get(&self, path: &str) -> Result<Value, CliError> {
        let response = self.client.get(format!("{}{path}", self.base_url)).send().await?;
        read_response(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, CliError> {
        let response = self.client.post(format!("{}{path}", self.base_url)).json(body).send().await?;
        read_response(response).await
    }
}

/// Decode the body (`Null` when empty or not JSON) and turn non-2xx
/// statuses into an error carrying the server's message.
async fn read_response(response: reqwest::Response) -> Result<Value, CliError> {
    let status = response.status();
    let text = response.text().await?;
    let value = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
    if status.is_success() {
        return Ok(value);
    }
    Err(CliError::Server { status: status.as_u16(), message: error_message(&value, &text) })
}

fn error_message(value: &Value, raw: &str) -> String {
    match (value.get("error").and_then(Value::as_str), value.get("code").and_then(Value::as_str)) {
        (Some(message), Some(code)) => format!("{message} ({code})"),
        (Some(message), None) => message.to_owned(),
        _ if raw.is_empty() => "empty response".to_owned(),
        _ => raw.to_owned(),
    }
}

/// Normalize a route argument to an `/api/...` path.
fn route_path(route: &str) -> Result<String, CliError> {
    let trimmed = route.trim().trim_matches('/');
    let rest = trimmed.strip_prefix("api/").unwrap_or(trimmed);
    let segments: Vec<&str> = rest.split('/').collect();
    let valid = segments.len() == 2
        && segments
            .iter()
            .all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    if !valid {
        return Err(CliError::InvalidRoute(route.to_owned()));
    }
    Ok(format!("/api/{rest}"))
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
