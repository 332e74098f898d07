//! Entry point for the ncbrowse application.
//! Handles CLI parsing, file loading, and dispatches listing, description or time-series output.

use clap::Parser;
use ncbrowse::Dataset;

mod cli;

use cli::Args;

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::open(&args.file)?;

    let nothing_requested = args.describe.is_none() && args.series.is_none();

    if args.list_vars || nothing_requested {
        let variables = dataset.list_variables()?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&variables)?);
        } else {
            cli::print_variables(&variables);
        }
    }

    if let Some(name) = &args.describe {
        let var = dataset.variable(name)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&var)?);
        } else {
            cli::describe_variable(&var);
        }
    }

    if let Some(name) = &args.series {
        let var = dataset.variable(name)?;
        let series = dataset.read_any_time_series(&var)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&series)?);
        } else {
            cli::print_series(&var, &series);
        }
    }

    dataset.close()?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
