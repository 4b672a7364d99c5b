use std::fs::canonicalize;

use anyhow::Context;
use clap::Parser;

use crate::cli::args::Args;
use crate::cli::progress::StepContext;
use crate::config::load_run_config;
use crate::liberty::{save_lib, LibOptions};
use crate::verilog::save_1rw_verilog;

pub mod args;
pub mod progress;

pub const BANNER: &str = r"
  ___ _ __ __ _ _ __ ___  | (_) |__
 / __| '__/ _` | '_ ` _ \ | | | '_ \
 \__ \ | | (_| | | | | | || | | |_) |
 |___/_|  \__,_|_| |_| |_||_|_|_.__/

SRAMLIB v0.1
";

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = canonicalize(&args.config)
        .with_context(|| format!("configuration file {:?} not found", &args.config))?;

    println!("{BANNER}");

    println!("Reading configuration file...\n");
    let config = load_run_config(&config_path)
        .with_context(|| format!("failed to load configuration {:?}", &config_path))?;

    println!("Configuration file: {:?}", &config_path);
    println!("Process parameters:");
    println!("\tFeature size: {} nm", config.process.tech_nm());
    println!("\tVoltage: {}", config.process.voltage());
    println!(
        "\tUnits: {}, {}, {}",
        config.process.time_unit(),
        config.process.cap_unit(),
        config.process.power_unit()
    );
    println!();

    let memories = config.memories(args.output_dir.as_deref())?;
    let views_per_memory = if args.verilog { 2 } else { 1 };
    let mut ctx = StepContext::new(memories.len() * views_per_memory);

    let opts = LibOptions::new();
    let mut artifacts = Vec::new();
    for memory in &memories {
        let desc = format!("Generate LIB for {}", memory.name);
        let res = save_lib(memory, &opts)
            .with_context(|| format!("failed to generate Liberty view for {}", memory.name));
        match ctx.check(desc, res) {
            Ok(path) => artifacts.push(path),
            Err(e) => {
                ctx.skip_remaining("Remaining views");
                return Err(e);
            }
        }

        if args.verilog {
            let desc = format!("Generate Verilog for {}", memory.name);
            let res = save_1rw_verilog(memory)
                .with_context(|| format!("failed to generate Verilog model for {}", memory.name));
            match ctx.check(desc, res) {
                Ok(path) => artifacts.push(path),
                Err(e) => {
                    ctx.skip_remaining("Remaining views");
                    return Err(e);
                }
            }
        }
    }
    ctx.done();

    println!("\nArtifacts:");
    for path in &artifacts {
        println!("\t{:?}", path);
    }
    println!();

    Ok(())
}
