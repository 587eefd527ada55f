//! Command-line interface implementation for cvtex.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for cvtex.
#[derive(Parser, Debug)]
#[command(author, version, about = "cvtex: generate a LaTeX CV from a config file using a Jinja template", long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Path to the Jinja template file.
    /// Sibling templates in the same directory can be included from it.
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Path to save the generated LaTeX file
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Path to the BibTeX file for publications
    #[arg(long, value_name = "BIBTEX")]
    pub bibtex: Option<PathBuf>,

    /// Fail when the template references an undefined variable
    #[arg(short, long)]
    pub strict: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
