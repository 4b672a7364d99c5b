//! Liberty (`.lib`) view generation.
//!
//! The timing and power numbers come straight from the [`MemoryModel`]; this
//! module only converts units, derives table axes and lays out the library.
//! Every interpolation table uses a single value across all of its entries.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use tera::Context;

use crate::error::{InvalidModelError, Result};
use crate::memory::MemoryModel;
use crate::paths::{out_lib, write_view};
use crate::TEMPLATES;

pub mod params;

pub use params::{addr_width, LibParams, PortPins, TableIndices};

pub const LIB_TEMPLATE: &str = "sram_1rw.lib";

/// Internal power reported on the clock pin, in milliwatts.
pub trait ClockPowerModel: Send + Sync {
    fn clock_internal_power_mw(&self, memory: &MemoryModel) -> f64;
}

/// Reports the macro's pin dynamic power as the clock pin internal power.
///
/// This conflates dynamic and internal power. It is kept as the default so
/// existing downstream flows see unchanged numbers.
#[derive(Debug, Default, Clone, Copy)]
pub struct DynamicAsInternal;

impl ClockPowerModel for DynamicAsInternal {
    fn clock_internal_power_mw(&self, memory: &MemoryModel) -> f64 {
        memory.pin_dynamic_power_mw
    }
}

#[derive(Clone)]
pub struct LibOptions {
    pub timestamp: DateTime<Utc>,
    pub clock_power: Arc<dyn ClockPowerModel>,
}

impl Default for LibOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl LibOptions {
    /// Options stamped with the current time.
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now(),
            clock_power: Arc::new(DynamicAsInternal),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_clock_power(mut self, model: impl ClockPowerModel + 'static) -> Self {
        self.clock_power = Arc::new(model);
        self
    }

    fn date(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%SZ").to_string()
    }
}

pub fn generate_lib(memory: &MemoryModel, opts: &LibOptions) -> Result<String> {
    let clk_power_mw = opts.clock_power.clock_internal_power_mw(memory);
    if !clk_power_mw.is_finite() || clk_power_mw < 0.0 {
        return Err(InvalidModelError::Negative {
            memory: memory.name.to_string(),
            field: "clock_internal_power_mw",
            value: clk_power_mw,
        }
        .into());
    }
    let params = LibParams::new(memory, clk_power_mw, opts.date())?;
    debug!(
        "liberty params for {}: addr_width={}, ports={}, slew=({}), load=({})",
        params.name,
        params.addr_width,
        params.ports.len(),
        params.slew_indices,
        params.load_indices
    );

    Ok(TEMPLATES.render(LIB_TEMPLATE, &Context::from_serialize(&params)?)?)
}

/// Writes `<results_dir>/<name>.lib`.
///
/// The whole library is rendered before anything touches the disk, and the
/// file is replaced in a single rename, so on error the output path keeps
/// whatever it held before. Concurrent calls for the same memory and
/// directory race, and the last writer wins.
pub fn save_lib(memory: &MemoryModel, opts: &LibOptions) -> Result<PathBuf> {
    let lib = generate_lib(memory, opts)?;

    let path = out_lib(&memory.results_dir, &memory.name);
    write_view(&path, lib)?;
    info!("wrote liberty view for {} to {:?}", memory.name, path);

    Ok(path)
}
