use autolog::cli::args::{AUTOLOG_USAGE, Args, usage_error};
use autolog::cli::commands::{self, shared::setup_logging};
use autolog::Error;
use autolog::constants::exit_codes;
use clap::Parser;
use std::process;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => match usage_error(&error, AUTOLOG_USAGE) {
            Some(usage) => {
                println!("{}", AUTOLOG_USAGE);
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
        .and_then(|config| commands::run_autolog(&config));

    match result {
        Ok(summary) => {
            if !args.quiet {
                summary.print();
            }
            process::exit(exit_codes::SUCCESS);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            match &error {
                Error::DirectoryOpen { .. } => println!("\n{}", AUTOLOG_USAGE),
                Error::StatusLogOpen { .. } => println!("Proceeding no further"),
                _ => {}
            }
            process::exit(error.exit_code());
        }
    }
}
