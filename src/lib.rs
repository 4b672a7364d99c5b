//! Liberty and behavioral views for characterized SRAM macros.
//!
//! A run starts from a [`config::RunConfig`], which holds one shared
//! [`process::Process`] and the characterized [`memory::MemoryModel`]s built
//! against it. [`liberty::save_lib`] and [`verilog::save_1rw_verilog`] then
//! write one view per memory.

use lazy_static::lazy_static;
use tera::Tera;

pub mod cli;
pub mod config;
pub mod error;
pub mod liberty;
pub mod memory;
pub mod paths;
pub mod process;
pub mod units;
pub mod verilog;

pub use error::{Error, Result};

lazy_static! {
    pub static ref TEMPLATES: Tera =
        match Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/*")) {
            Ok(t) => t,
            Err(e) => panic!("Error parsing templates: {e}"),
        };
}
