mod report;

use intentc::{IntentcError, RunOptions, run};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("intentc=info")))
        .with_writer(io::stderr)
        .with_ansi(config.color)
        .with_target(false)
        .init();

    match run(&config.options) {
        Ok(summary) => {
            report::print_summary(&config.options.input_file.display().to_string(), &summary, config.color);
        }
        Err(err) => {
            eprintln!("error: {err}");
            let code = match err {
                IntentcError::InputFileNotFound(_) => 2,
                _ => 1,
            };
            std::process::exit(code);
        }
    }
}

struct CliConfig {
    options: RunOptions,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut options = RunOptions::default();
    let mut input: Option<PathBuf> = None;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    let mut set_input = |input: &mut Option<PathBuf>, value: String| {
        if input.is_some() {
            return Err("error: input file provided multiple times".to_string());
        }
        *input = Some(PathBuf::from(value));
        Ok(())
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("intentc {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--max" => options.limits.max_both = Some(parse_limit("--max", args.next())?),
            "--max-pt" => options.limits.max_pt = Some(parse_limit("--max-pt", args.next())?),
            "--max-en" => options.limits.max_en = Some(parse_limit("--max-en", args.next())?),
            "--base-dir" => {
                let value = args.next().ok_or_else(|| "error: --base-dir expects a value".to_string())?;
                options.base_dir = PathBuf::from(value);
            }
            "--domain" => {
                let value = args.next().ok_or_else(|| "error: --domain expects a value".to_string())?;
                options.domain_path = PathBuf::from(value);
            }
            _ if arg.starts_with("--max-pt=") => {
                options.limits.max_pt = Some(parse_limit("--max-pt", arg.strip_prefix("--max-pt="))?);
            }
            _ if arg.starts_with("--max-en=") => {
                options.limits.max_en = Some(parse_limit("--max-en", arg.strip_prefix("--max-en="))?);
            }
            _ if arg.starts_with("--max=") => {
                options.limits.max_both = Some(parse_limit("--max", arg.strip_prefix("--max="))?);
            }
            _ if arg.starts_with("--base-dir=") => {
                options.base_dir = PathBuf::from(arg.trim_start_matches("--base-dir="));
            }
            _ if arg.starts_with("--domain=") => {
                options.domain_path = PathBuf::from(arg.trim_start_matches("--domain="));
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => set_input(&mut input, arg)?,
        }
    }

    if let Some(input) = input {
        options.input_file = input;
    }

    Ok(CliConfig { options, color })
}

fn parse_limit(flag: &str, value: Option<impl AsRef<str>>) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("error: {flag} expects a value"))?;
    value
        .as_ref()
        .parse::<usize>()
        .map_err(|_| format!("error: invalid {flag} '{}' (expected a non-negative integer)", value.as_ref()))
}

fn print_help() {
    println!(
        "intentc {version}

Intent markup compiler and registry reconciler.

Usage:
  intentc [OPTIONS] [input-file]

Arguments:
  [input-file]            Input document with `---`-separated intent blocks.
                          Default: input.txt

Options:
  --max <n>               Global example limit for both languages.
  --max-pt <n>            Global example limit for PT only.
  --max-en <n>            Global example limit for EN only.
  --base-dir <dir>        Base directory for per-intent artifacts and the
                          rule/story documents. Default: data
  --domain <path>         Path of the domain document. Default: domain.yml
  --color                 Force ANSI color output.
  --no-color              Disable ANSI color output.
  -h, --help              Show this help message.
  -V, --version           Print version information.

Exit codes:
  0  Success (malformed blocks are skipped and counted, not fatal).
  1  Fatal failure: corrupt registry document or I/O error.
  2  Invalid arguments or missing input file.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
