use std::io::{self, BufRead};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use itertools::Itertools;

use sdex::pattern::{DEFAULT_MAX_DEPTH, Part};
use sdex::{CompileOptions, CompiledPattern, Diagnostics, FormatOptions, ParamMap, compile};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Compare literals and tag arguments case-insensitively
    #[arg(short = 'i', long, global = true)]
    ignore_case: bool,

    /// Maximum pattern nesting depth
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH, global = true)]
    max_depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the compiled parts of a pattern
    Compile { pattern: String },

    /// Match input against a pattern and print the captures
    Check {
        pattern: String,

        /// Input to match; lines are read from stdin when omitted
        input: Option<String>,
    },

    /// Render a pattern from parameter values
    Format {
        pattern: String,

        /// Parameter value
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_binding)]
        params: Vec<(String, String)>,

        /// Render missing parameters as empty text
        #[arg(long)]
        ignore_missing: bool,

        /// Render parameters whose tags fail as empty text
        #[arg(long)]
        ignore_tag_failure: bool,

        /// Use each parameter value at most once
        #[arg(long)]
        remove_consumed: bool,
    },

    /// Print a sample input for a pattern
    Example { pattern: String },
}

fn parse_binding(text: &str) -> Result<(String, String)> {
    let Some((name, value)) = text.split_once('=') else {
        bail!("expected NAME=VALUE, found {text:?}");
    };
    Ok((name.to_string(), value.to_string()))
}

/// Log to stderr when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn report(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        eprintln!("warning: {diagnostic}");
    }
}

fn print_parts(pattern: &CompiledPattern) {
    for part in &pattern.parts {
        match part {
            Part::Literal(literal) => println!("literal {:?}", literal.text),
            Part::Parameter(param) => {
                let mut line = format!("param {:?}", param.name);
                if let Some(len) = param.length_fixed {
                    line.push_str(&format!(" fixed={len}"));
                }
                if let Some(len) = param.length_min {
                    line.push_str(&format!(" min={len}"));
                }
                println!("{line}");
                for tag in &param.tags {
                    let known = if tag.function.is_some() { "" } else { " (unknown)" };
                    println!(
                        "  tag {}{known} {:?} groups={}",
                        tag.name,
                        tag.ops,
                        tag.groups.len()
                    );
                }
            }
        }
    }
}

/// Print the captures of one input; false if it did not match.
fn check_line(pattern: &CompiledPattern, input: &str) -> bool {
    let mut params = ParamMap::new();
    if pattern.check(input, &mut params).is_none() {
        println!("no match");
        return false;
    }
    let captures = pattern
        .parameter_names()
        .into_iter()
        .map(|name| format!("{name}={:?}", params.get(name).unwrap_or_default()))
        .join(" ");
    println!("{captures}");
    true
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let options = CompileOptions {
        case_sensitive: !args.ignore_case,
        max_depth: args.max_depth,
    };

    match args.command {
        Command::Compile { pattern } => {
            let pattern = compile(&pattern, options);
            report(&pattern.diagnostics);
            print_parts(&pattern);
        }
        Command::Check { pattern, input } => {
            let pattern = compile(&pattern, options);
            report(&pattern.diagnostics);
            let all_matched = match input {
                Some(input) => check_line(&pattern, &input),
                None => {
                    let mut all_matched = true;
                    for line in io::stdin().lock().lines() {
                        let line = line.context("Failed to read stdin")?;
                        all_matched &= check_line(&pattern, &line);
                    }
                    all_matched
                }
            };
            if !all_matched {
                process::exit(1);
            }
        }
        Command::Format {
            pattern,
            params,
            ignore_missing,
            ignore_tag_failure,
            remove_consumed,
        } => {
            let pattern = compile(&pattern, options);
            report(&pattern.diagnostics);
            let mut params: ParamMap = params.into_iter().collect();
            let format_options = FormatOptions::new()
                .ignore_missing(ignore_missing)
                .ignore_tag_failure(ignore_tag_failure)
                .remove_consumed(remove_consumed);
            let Some(text) = pattern.format_string(&mut params, format_options) else {
                bail!("Pattern could not be rendered from the given parameters");
            };
            println!("{text}");
        }
        Command::Example { pattern } => {
            let pattern = compile(&pattern, options);
            report(&pattern.diagnostics);
            println!("{}", pattern.example());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn bindings() {
        assert_eq!(
            parse_binding("nick=bob=2").unwrap(),
            ("nick".to_string(), "bob=2".to_string())
        );
        assert!(parse_binding("nick").is_err());
    }

    #[test]
    fn format_flags_parse() {
        let args = Args::try_parse_from([
            "sdex",
            "-i",
            "format",
            "%[a]",
            "-p",
            "a=1",
            "--param",
            "b=2",
            "--ignore-missing",
        ])
        .unwrap();
        assert!(args.ignore_case);
        let Command::Format {
            params,
            ignore_missing,
            ..
        } = args.command
        else {
            panic!("expected format");
        };
        assert_eq!(params.len(), 2);
        assert!(ignore_missing);
    }
}
