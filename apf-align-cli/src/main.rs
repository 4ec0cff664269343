use apf_align_cli::{run, Args};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(summary) => {
            println!("{}", summary.counts);
            if summary.is_success() {
                ExitCode::SUCCESS
            } else {
                eprintln!(
                    "{} of {} documents failed:",
                    summary.failures.len(),
                    summary.failures.len() + summary.converted
                );
                for failure in &summary.failures {
                    eprintln!("  {}: {}", failure.name, failure.error);
                }
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
