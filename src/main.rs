// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! capture_fetch CLI
//!
//! Fetches a single URL and writes the body to stdout or a file.

use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use capture_fetch::{Fetcher, FetcherConfig, RequestConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so the body can be piped
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("capture_fetch=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "fetch" => match FetchArgs::parse(&args[2..]) {
            Ok(fetch_args) => fetch_url(fetch_args).await,
            Err(e) => {
                eprintln!("{e:#}");
                eprintln!("Usage: capture-fetch fetch <url> [OPTIONS]");
                ExitCode::from(1)
            }
        },
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("capture-fetch {}", capture_fetch::VERSION);
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"capture-fetch - HTTP content fetcher

USAGE:
    capture-fetch <COMMAND> [OPTIONS]

COMMANDS:
    fetch <url>     GET a URL and write the body
    help            Show this help message
    version         Show version information

FETCH OPTIONS:
    --param <query>      Query string to append
    --proxy <spec>       host, host:port or host:port:socks
    --config <file>      JSON request config
    --timeout <ms>       Default connect/read timeout
    --header <k:v>       Extra request header (repeatable)
    --show-headers       Prefix output with request/response headers
    --no-redirect        Do not follow 301/302
    --insecure           Accept any TLS certificate and hostname
    --out <file>         Write body to file instead of stdout

EXAMPLES:
    capture-fetch fetch example.com
    capture-fetch fetch https://example.com/api --param "page=2" --proxy 127.0.0.1:8888
    capture-fetch fetch https://example.com --proxy 127.0.0.1:1080:socks --insecure
"#
    );
}

/// Parsed `fetch` arguments
#[derive(Debug, Default)]
struct FetchArgs {
    url: String,
    request: RequestConfig,
    timeout: Option<Duration>,
    insecure: bool,
    out: Option<PathBuf>,
}

impl FetchArgs {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut parsed = FetchArgs::default();
        let mut url = None;
        let mut overrides: Vec<(&str, &str)> = Vec::new();
        let mut flags: Vec<&str> = Vec::new();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--show-headers" | "--no-redirect" | "--insecure" => flags.push(arg.as_str()),
                opt @ ("--param" | "--proxy" | "--config" | "--timeout" | "--header" | "--out") => {
                    let value = iter
                        .next()
                        .with_context(|| format!("{opt} requires a value"))?;
                    overrides.push((opt, value.as_str()));
                }
                other if other.starts_with("--") => bail!("Unknown option: {other}"),
                other => {
                    if url.replace(other.to_string()).is_some() {
                        bail!("Only one URL may be given");
                    }
                }
            }
        }

        parsed.url = url.context("Missing URL")?;

        // The config file is the base; command line options override it
        if let Some((_, file)) = overrides.iter().find(|(opt, _)| *opt == "--config") {
            let raw = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read config file {file}"))?;
            parsed.request = serde_json::from_str(&raw)
                .with_context(|| format!("Invalid request config in {file}"))?;
        }

        for (opt, value) in overrides {
            match opt {
                "--param" => parsed.request.param = Some(value.to_string()),
                "--proxy" => parsed.request.proxy = Some(value.to_string()),
                "--timeout" => {
                    let ms: u64 = value
                        .parse()
                        .with_context(|| format!("Invalid timeout: {value}"))?;
                    parsed.timeout = Some(Duration::from_millis(ms));
                }
                "--header" => {
                    let (name, val) = value
                        .split_once(':')
                        .with_context(|| format!("Header must be name:value, got {value}"))?;
                    parsed
                        .request
                        .headers
                        .insert(name.trim().to_string(), val.trim().to_string());
                }
                "--out" => parsed.out = Some(PathBuf::from(value)),
                _ => {}
            }
        }

        for flag in flags {
            match flag {
                "--show-headers" => parsed.request.show_headers = true,
                "--no-redirect" => parsed.request.follow_redirects = false,
                "--insecure" => parsed.insecure = true,
                _ => {}
            }
        }

        Ok(parsed)
    }
}

async fn fetch_url(args: FetchArgs) -> ExitCode {
    let mut config = FetcherConfig::new().insecure(args.insecure);
    if let Some(timeout) = args.timeout {
        config = config.timeout(timeout);
    }
    let fetcher = Fetcher::with_config(config);

    let body = match fetcher.fetch(&args.url, Some(&args.request)).await {
        Ok(Some(body)) => body,
        Ok(None) => {
            eprintln!("No content returned for {}", args.url);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Failed to fetch URL: {}", e);
            return ExitCode::from(1);
        }
    };

    let written = match args.out {
        Some(ref path) => std::fs::write(path, &body)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => std::io::stdout()
            .lock()
            .write_all(&body)
            .context("Failed to write to stdout"),
    };

    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::from(1)
        }
    }
}
