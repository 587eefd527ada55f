//! cvtex's main application entry point.
//! Parses arguments, configures logging and runs the generation pipeline.

use cvtex::{
    cli::get_args,
    error::default_error_handler,
    pipeline::run,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    match run(&args) {
        Ok(()) => println!("Rendered '{}'", args.output.display()),
        Err(err) => default_error_handler(err),
    }
}
