use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about,
    help_template(
        "{before-help}{name} {version}\n{author-with-newline}{about-with-newline}\n{usage-heading} {usage}\n\n{all-args}{after-help}"
    )
)]
pub struct Args {
    /// Path to a JSON or TOML run configuration.
    #[arg(short, long, default_value = "sramlib.json")]
    pub config: PathBuf,

    /// Directory to which output files should be saved.
    ///
    /// Each memory is written to a subdirectory named after it.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Also generate a behavioral Verilog model for each memory.
    #[arg(long)]
    pub verilog: bool,
}
