use clap::Parser;
use pidstat_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();
    let file_path = args.file_path.clone();

    let result = commands::run(args).map_err(|error| {
        let context = commands::failure_context(&error, &file_path);
        anyhow::Error::new(error).context(context)
    });

    match result {
        Ok(_stats) => {
            // Stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
