mod debug_report;

use chrono::NaiveDate;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use dictee::{Context, Options, parse_verbose_with};
use flexi_logger::Logger;
use log::debug;
use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "dictee", version)]
#[command(about = "Resolve French spoken numbers, dates, times and spelled characters", long_about = None)]
struct Cli {
    /// Date relative phrases resolve against (YYYY-MM-DD). Default: today.
    #[arg(long, value_parser = parse_today)]
    today: Option<NaiveDate>,

    /// Keep only these dimensions (numeral, digits, date, time, characters).
    #[arg(long = "dim", value_name = "NAME")]
    dims: Vec<String>,

    /// Print the results as JSON instead of a report.
    #[arg(long)]
    json: bool,

    /// Force ANSI color output.
    #[arg(long, overrides_with = "no_color")]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long, overrides_with = "color")]
    no_color: bool,

    /// Text to parse. Read from stdin when omitted.
    text: Vec<String>,
}

fn parse_today(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| format!("invalid date '{value}' (expected YYYY-MM-DD)"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Log records go to stderr; RUST_LOG overrides the default level.
    let _logger = match Logger::try_with_env_or_str("warn").and_then(|logger| logger.start()) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("error: failed to start logger: {err}");
            return ExitCode::FAILURE;
        }
    };

    let input = if cli.text.is_empty() {
        let mut buffer = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut buffer) {
            eprintln!("error: failed to read stdin: {err}");
            return ExitCode::FAILURE;
        }
        buffer
    } else {
        cli.text.join(" ")
    };
    let input = input.trim();
    if input.is_empty() {
        Cli::command().error(ErrorKind::MissingRequiredArgument, "no input provided").exit();
    }

    let ctx = cli.today.map(Context::new).unwrap_or_default();
    let opts = Options { dimensions: cli.dims };
    debug!("today={} dimensions={:?}", ctx.today, opts.dimensions);

    let res = parse_verbose_with(input, &ctx, &opts);
    if cli.json {
        let out = serde_json::json!({ "text": res.text, "today": ctx.today.to_string(), "results": res.results });
        match serde_json::to_string_pretty(&out) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to encode results: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        let color = if cli.color {
            true
        } else if cli.no_color {
            false
        } else {
            io::stdout().is_terminal()
        };
        debug_report::print_run(input, &ctx, &res, color);
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from(["dictee", "--today", "2024-03-15", "--dim", "date", "--dim", "time", "--json", "lundi", "dernier"])
            .unwrap();
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(cli.dims, vec!["date", "time"]);
        assert!(cli.json);
        assert_eq!(cli.text.join(" "), "lundi dernier");
    }

    #[test]
    fn bad_dates_are_usage_errors() {
        let err = Cli::try_parse_from(["dictee", "--today", "15/03/2024", "demain"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert_eq!(err.exit_code(), 2);
    }
}
