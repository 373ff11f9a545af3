use autolog::cli::args::{RED_REPORT_USAGE, RedReportArgs, usage_error};
use autolog::cli::commands::{self, shared::setup_logging};
use autolog::constants::exit_codes;
use clap::Parser;
use std::process;

fn main() {
    let args = match RedReportArgs::try_parse() {
        Ok(args) => args,
        Err(error) => match usage_error(&error, RED_REPORT_USAGE) {
            Some(usage) => {
                println!("{}", RED_REPORT_USAGE);
                process::exit(usage.exit_code());
            }
            None => error.exit(),
        },
    };

    if let Err(error) = setup_logging(args.get_log_level(), args.quiet) {
        eprintln!("Warning: {}", error);
    }

    let result = args
        .to_config()
        .and_then(|config| commands::run_red_report(&config));

    match result {
        Ok(summary) => {
            if !args.quiet {
                summary.print();
            }
            process::exit(exit_codes::SUCCESS);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(error.exit_code());
        }
    }
}
