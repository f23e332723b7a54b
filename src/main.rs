// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! requests CLI
//!
//! Thin wrapper over the library: send one request, print what came back.

use std::env;
use std::process::ExitCode;

use requests::{Args, HttpClient, Method, Response};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("requests=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let method = match args[1].as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("requests {}", requests::VERSION);
            return ExitCode::SUCCESS;
        }
        "get" => Method::GET,
        "head" => Method::HEAD,
        "options" => Method::OPTIONS,
        "post" => Method::POST,
        "put" => Method::PUT,
        "patch" => Method::PATCH,
        "delete" => Method::DELETE,
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    if args.len() < 3 {
        eprintln!("Usage: requests {} <url> [options]", args[1]);
        return ExitCode::from(1);
    }

    let request_args = match parse_options(&args[3..]) {
        Ok(request_args) => request_args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(1);
        }
    };

    let client = HttpClient::new();
    let response = client.request(method, &args[2], request_args).await;
    print_response(response).await
}

fn parse_options(options: &[String]) -> Result<Args, String> {
    let mut request_args = Args::new();
    let mut iter = options.iter();

    while let Some(option) = iter.next() {
        match option.as_str() {
            "-d" | "--data" => {
                let data = iter.next().ok_or("--data needs a value")?;
                request_args = request_args.data(data.as_str());
            }
            "-j" | "--json" => {
                let raw = iter.next().ok_or("--json needs a value")?;
                let json: serde_json::Value =
                    serde_json::from_str(raw).map_err(|e| format!("Invalid JSON: {}", e))?;
                request_args = request_args.json(json);
            }
            "-H" | "--header" => {
                let header = iter.next().ok_or("--header needs a value")?;
                let (name, value) = header
                    .split_once(':')
                    .ok_or_else(|| format!("Header must look like 'Name: value': {}", header))?;
                request_args = request_args.header(name.trim(), value.trim());
            }
            "-x" | "--proxy" => {
                let proxy = iter.next().ok_or("--proxy needs a value")?;
                request_args = request_args.proxy(proxy.as_str());
            }
            "--no-redirects" => request_args = request_args.allow_redirects(false),
            "--insecure" => request_args = request_args.verify(false),
            "--stream" => request_args = request_args.stream(true),
            other => return Err(format!("Unknown option: {}", other)),
        }
    }

    request_args.validate().map_err(|e| e.to_string())?;
    Ok(request_args)
}

async fn print_response(mut response: Response) -> ExitCode {
    if response.status_code == 0 {
        eprintln!("Request failed: {}", response.text);
        return ExitCode::from(2);
    }

    println!("Status: {}", response.status_code);
    for (name, value) in response.headers.iter() {
        println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
    for cookie in &response.cookies {
        println!("Cookie: {}={} (domain {})", cookie.name, cookie.value, cookie.domain);
    }
    println!();

    if let Some(mut body) = response.take_body() {
        while let Some(chunk) = body.chunk().await {
            match chunk {
                Ok(bytes) => print!("{}", String::from_utf8_lossy(&bytes)),
                Err(e) => {
                    eprintln!("Stream error: {}", e);
                    return ExitCode::from(2);
                }
            }
        }
    } else {
        println!("{}", response.text);
    }

    if response.is_success() || response.is_redirect() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn print_usage() {
    println!(
        r#"requests - Convenience HTTP client

USAGE:
    requests <METHOD> <url> [OPTIONS]

METHODS:
    get, head, options, post, put, patch, delete

OPTIONS:
    -d, --data <body>        Send a raw body
    -j, --json <json>        Send a JSON body
    -H, --header <N: v>      Add a header
    -x, --proxy <url>        Route through a proxy
    --no-redirects           Return the first redirect response as-is
    --insecure               Skip TLS certificate verification
    --stream                 Print the body as it arrives

EXAMPLES:
    requests get https://example.com
    requests post https://httpbin.org/post --json '{{"a":1}}'
    requests get https://example.com/events --stream

Logging is controlled with RUST_LOG, e.g. RUST_LOG=requests=debug
"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(raw: &[&str]) -> Result<Args, String> {
        let owned: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        parse_options(&owned)
    }

    #[test]
    fn test_parse_options() {
        let args = options(&["-H", "X-Trace: 1", "--json", r#"{"a":1}"#, "--no-redirects"]).unwrap();
        assert_eq!(args.headers["X-Trace"], "1");
        assert_eq!(args.json, Some(serde_json::json!({"a": 1})));
        assert!(!args.allow_redirects);
    }

    #[test]
    fn test_parse_options_errors() {
        assert!(options(&["--data"]).is_err());
        assert!(options(&["--header", "no-colon"]).is_err());
        assert!(options(&["--json", "{broken"]).is_err());
        assert!(options(&["--bogus"]).is_err());
    }
}
