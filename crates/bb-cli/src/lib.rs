//! Beyond Burndown command line
//!
//! `burndown analyze`, `burndown what-if` and `burndown envelope` read a JSON
//! work item export and a capacity file, run the feasibility engine, and
//! print the result. The clock is only read here, when `--today` is absent.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod input;
mod render;

use anyhow::{bail, Result};
use bb_core::{AnalysisResult, FeasibilityEngine, StatusReport, WhatIfOutcome, WhatIfRequest};
use bb_envelope::Granularity;
use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

pub use input::{load_capacity, load_config, load_items};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    bb_model::calendar::parse_date(value).ok_or_else(|| format!("not a date: {value}"))
}

fn input_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("items")
                .long("items")
                .short('i')
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("JSON work item export"),
        )
        .arg(
            Arg::new("capacity")
                .long("capacity")
                .short('c')
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Capacity file (TOML for .toml, JSON otherwise)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("Engine configuration TOML"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .value_parser(parse_day)
                .help("Analysis date, YYYY-MM-DD (defaults to the local date)"),
        )
}

fn hours_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .help(help)
}

/// Command-line definition
#[must_use]
pub fn command() -> Command {
    Command::new("burndown")
        .version(VERSION)
        .about("Beyond Burndown project feasibility analysis")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            input_args(Command::new("analyze").about("Run every analysis and print the result"))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .default_value("summary")
                        .value_parser(["summary", "json", "report", "report-json"])
                        .help("Output format"),
                ),
        )
        .subcommand(
            input_args(Command::new("what-if").about("Preview hypothetical changes"))
                .arg(hours_arg("add-devs", "Developers to add (negative removes)"))
                .arg(hours_arg("hours-per-dev", "Hours per developer per day"))
                .arg(hours_arg("add-scope", "Scope hours to add"))
                .arg(hours_arg("remove-scope", "Scope hours to remove"))
                .arg(
                    Arg::new("extend-weeks")
                        .long("extend-weeks")
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .help("Weeks to move the deadline (negative pulls it in)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            input_args(Command::new("envelope").about("Print the capacity/demand series"))
                .arg(
                    Arg::new("granularity")
                        .long("granularity")
                        .short('g')
                        .default_value("week")
                        .value_parser(["day", "week", "month"])
                        .help("Bucket size"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn analyze(args: &ArgMatches) -> Result<(FeasibilityEngine, AnalysisResult, NaiveDate)> {
    let items_path = args.get_one::<PathBuf>("items");
    let capacity_path = args.get_one::<PathBuf>("capacity");
    let (Some(items_path), Some(capacity_path)) = (items_path, capacity_path) else {
        bail!("--items and --capacity are required");
    };

    let items = load_items(items_path)?;
    let capacity = load_capacity(capacity_path)?;
    let config = load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let today = args
        .get_one::<NaiveDate>("today")
        .copied()
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let engine = FeasibilityEngine::new(config);
    let result = engine.analyze(&items, &capacity, today)?;
    Ok((engine, result, today))
}

/// Execute parsed arguments and return the text to print
///
/// # Errors
/// Fails on unreadable or malformed inputs, an invalid capacity
/// configuration, or a what-if request without any change.
pub fn run(matches: &ArgMatches) -> Result<String> {
    match matches.subcommand() {
        Some(("analyze", args)) => {
            let (_, result, today) = analyze(args)?;
            let format = args.get_one::<String>("format").map_or("summary", String::as_str);
            Ok(match format {
                "json" => serde_json::to_string_pretty(&result)?,
                "report" => render::report(&StatusReport::from_analysis(&result, today)),
                "report-json" => {
                    serde_json::to_string_pretty(&StatusReport::from_analysis(&result, today))?
                }
                _ => render::summary(&result),
            })
        }
        Some(("what-if", args)) => {
            let request = WhatIfRequest {
                add_developers: args.get_one::<f64>("add-devs").copied(),
                hours_per_dev_per_day: args.get_one::<f64>("hours-per-dev").copied(),
                add_scope_hours: args.get_one::<f64>("add-scope").copied(),
                remove_scope_hours: args.get_one::<f64>("remove-scope").copied(),
                extend_weeks: args.get_one::<i64>("extend-weeks").copied(),
            };
            if request.is_empty() {
                bail!(
                    "no change requested: pass one of --add-devs, --add-scope, \
                     --remove-scope or --extend-weeks"
                );
            }

            let (engine, result, _) = analyze(args)?;
            let outcome =
                WhatIfOutcome::evaluate(&result.envelope, &request, &engine.config().scenarios);
            if args.get_flag("json") {
                Ok(serde_json::to_string_pretty(&outcome)?)
            } else {
                Ok(render::what_if(&outcome))
            }
        }
        Some(("envelope", args)) => {
            let granularity = match args.get_one::<String>("granularity").map(String::as_str) {
                Some("day") => Granularity::Day,
                Some("month") => Granularity::Month,
                _ => Granularity::Week,
            };
            let (_, result, _) = analyze(args)?;
            let buckets = result.envelope.rollup(granularity);
            if args.get_flag("json") {
                Ok(serde_json::to_string_pretty(&buckets)?)
            } else {
                Ok(render::periods(&buckets))
            }
        }
        Some((other, _)) => bail!("unknown command: {other}"),
        None => bail!("no command given"),
    }
}
