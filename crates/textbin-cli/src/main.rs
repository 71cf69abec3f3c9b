//! `textbin` CLI: command-line client for a `textbin` server.
//!
//! A standalone HTTP client with no internal crate dependencies. It talks to
//! the server exclusively through `/fetch`, `/save` and `/append`. `pull` is
//! `fetch` with the API token attached.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";

const TOKEN_HEADER: &str = "X-API-Token";
const BYTES_WRITTEN_HEADER: &str = "X-Bytes-Written";

// ── CLI structure ────────────────────────────────────────────────────

/// textbin: one shared text document, over HTTP.
#[derive(Parser)]
#[command(
    name = "textbin",
    version,
    about = "textbin CLI: fetch the shared document or push text to it",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         TEXTBIN_URL     Server address (default: http://127.0.0.1:8080)\n  \
         TEXTBIN_TOKEN   API token for push and pull\n\n\
         {DIM}Examples:{RESET}\n  \
         textbin fetch\n  \
         textbin pull --token $TEXTBIN_TOKEN\n  \
         textbin push \"replace everything\"\n  \
         textbin push --append \"one more line\""
    ),
)]
struct Cli {
    /// textbin server address.
    #[arg(
        short,
        long,
        global = true,
        env = "TEXTBIN_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    url: String,

    /// API token sent as `X-API-Token`.
    #[arg(long, global = true, env = "TEXTBIN_TOKEN")]
    token: Option<String>,

    /// Skip TLS certificate verification.
    #[arg(short, long, global = true, default_value = "false")]
    insecure_skip_verify: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current document.
    Fetch,
    /// Print the current document, authenticating with the API token.
    Pull,
    /// Replace the document, or append to it with `--append`.
    ///
    /// Arguments are joined with newlines. Appended text starts on a new line.
    Push {
        /// Text to send.
        text: Vec<String>,
        /// Append instead of replacing.
        #[arg(short, long, default_value = "false")]
        append: bool,
    },
}

// ── HTTP client ──────────────────────────────────────────────────────

struct Client {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl Client {
    fn new(url: &str, token: Option<String>, insecure_skip_verify: bool) -> Result<Self> {
        let url = url.trim_end_matches('/');
        if url.is_empty() {
            bail!("server URL is empty: set TEXTBIN_URL or use --url");
        }
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure_skip_verify)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            url: url.to_owned(),
            token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("no token provided: set TEXTBIN_TOKEN or use --token"))
    }

    async fn fetch(&self, authenticated: bool) -> Result<String> {
        let mut req = self.http.get(self.endpoint("/fetch"));
        if authenticated {
            req = req.header(TOKEN_HEADER, self.token()?);
        }
        let resp = req.send().await.context("request failed")?;
        let resp = check_status(resp).await?;
        resp.text().await.context("failed to read response body")
    }

    async fn post_content(&self, path: &str, content: &str) -> Result<(Value, Option<String>)> {
        let token = self.token()?;
        let resp = self
            .http
            .post(self.endpoint(path))
            .header(TOKEN_HEADER, token)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .context("request failed")?;
        let resp = check_status(resp).await?;
        let written = resp
            .headers()
            .get(BYTES_WRITTEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = resp.json().await.context("failed to parse response JSON")?;
        Ok((body, written))
    }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or(body);
    bail!("server returned {status}: {message}");
}

/// Body sent by `push`. Appended text is put on its own line.
fn push_body(text: &[String], append: bool) -> Result<String> {
    if text.is_empty() {
        bail!("you must push at least one character");
    }
    let joined = text.join("\n");
    Ok(if append { format!("\n{joined}") } else { joined })
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{RED}{BOLD}error:{RESET} {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = Client::new(&cli.url, cli.token, cli.insecure_skip_verify)?;
    match cli.command {
        Commands::Fetch => cmd_fetch(&client, false).await,
        Commands::Pull => cmd_fetch(&client, true).await,
        Commands::Push { text, append } => cmd_push(&client, &text, append).await,
    }
}

async fn cmd_fetch(client: &Client, authenticated: bool) -> Result<()> {
    let text = client.fetch(authenticated).await?;
    print!("{text}");
    if !text.is_empty() && !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

async fn cmd_push(client: &Client, text: &[String], append: bool) -> Result<()> {
    let body = push_body(text, append)?;
    let path = if append { "/append" } else { "/save" };
    let (resp, written) = client.post_content(path, &body).await?;

    let status = resp.get("status").and_then(Value::as_str).unwrap_or("ok");
    match written {
        Some(bytes) => println!("{GREEN}✓{RESET} {status} {DIM}({bytes} bytes written){RESET}"),
        None => println!("{GREEN}✓{RESET} {status}"),
    }
    Ok(())
}
