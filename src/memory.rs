use std::path::PathBuf;
use std::sync::Arc;

use arcstr::ArcStr;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::config::default_results_dir;
use crate::error::{InvalidModelError, Result};
use crate::process::Process;

/// A characterized memory macro.
///
/// All timing quantities are in nanoseconds except [`fo4_ps`](Self::fo4_ps),
/// capacitances are in picofarads and powers in milliwatts. Unit selection
/// for the generated views comes from [`process`](Self::process).
#[derive(Debug, Clone, Builder)]
#[builder(derive(Debug))]
pub struct MemoryModel {
    #[builder(setter(into))]
    pub name: ArcStr,
    /// Number of words.
    pub depth: usize,
    pub width_in_bits: usize,
    pub area_um2: f64,
    pub width_um: f64,
    pub height_um: f64,
    pub t_setup_ns: f64,
    pub t_hold_ns: f64,
    /// Clock-to-output delay.
    pub access_time_ns: f64,
    /// Minimum clock period.
    pub cycle_time_ns: f64,
    pub fo4_ps: f64,
    /// Input capacitance of the smallest driver in the process.
    pub cap_input_pf: f64,
    pub standby_leakage_per_bank_mw: f64,
    pub pin_dynamic_power_mw: f64,
    /// Number of combined read/write ports.
    #[builder(default = "1")]
    pub rw_ports: usize,
    pub process: Arc<Process>,
    /// Directory generated views are written to.
    #[builder(default = "PathBuf::from(\".\")", setter(into))]
    pub results_dir: PathBuf,
}

impl MemoryModel {
    #[inline]
    pub fn builder() -> MemoryModelBuilder {
        MemoryModelBuilder::default()
    }

    /// Checks every numeric field before any view is generated.
    pub fn validate(&self) -> Result<()> {
        self.positive("depth", self.depth as f64)?;
        self.positive("width_in_bits", self.width_in_bits as f64)?;
        self.positive("rw_ports", self.rw_ports as f64)?;
        self.positive("fo4_ps", self.fo4_ps)?;
        self.positive("cap_input_pf", self.cap_input_pf)?;

        for (field, value) in [
            ("area_um2", self.area_um2),
            ("width_um", self.width_um),
            ("height_um", self.height_um),
            ("t_setup_ns", self.t_setup_ns),
            ("t_hold_ns", self.t_hold_ns),
            ("access_time_ns", self.access_time_ns),
            ("cycle_time_ns", self.cycle_time_ns),
            ("standby_leakage_per_bank_mw", self.standby_leakage_per_bank_mw),
            ("pin_dynamic_power_mw", self.pin_dynamic_power_mw),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(InvalidModelError::Negative {
                    memory: self.name.to_string(),
                    field,
                    value,
                }
                .into());
            }
        }
        Ok(())
    }

    fn positive(&self, field: &'static str, value: f64) -> Result<()> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(InvalidModelError::NonPositive {
                memory: self.name.to_string(),
                field,
                value,
            }
            .into())
        }
    }
}

/// One entry of the `srams` list in a run configuration.
///
/// Key names follow the characterization tool output the configuration is
/// usually assembled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub name: String,
    pub depth: i64,
    pub width: i64,
    pub area_um2: f64,
    pub width_um: f64,
    pub height_um: f64,
    pub t_setup_ns: f64,
    pub t_hold_ns: f64,
    pub access_time_ns: f64,
    pub cycle_time_ns: f64,
    pub fo4_ps: f64,
    pub cap_input_pf: f64,
    #[serde(rename = "standby_leakage_per_bank_mW")]
    pub standby_leakage_per_bank_mw: f64,
    #[serde(rename = "pin_dynamic_power_mW")]
    pub pin_dynamic_power_mw: f64,
    #[serde(default = "default_rw_ports")]
    pub rw_ports: i64,
    #[serde(default)]
    pub results_dir: Option<PathBuf>,
}

fn default_rw_ports() -> i64 {
    1
}

impl MemoryConfig {
    /// Resolves this entry against a shared process.
    ///
    /// `results_dir` overrides the directory given in the entry; entries with
    /// neither are written to `results/<name>`.
    pub fn into_model(
        self,
        process: Arc<Process>,
        results_dir: Option<PathBuf>,
    ) -> Result<MemoryModel> {
        let depth = self.count("depth", self.depth)?;
        let width_in_bits = self.count("width", self.width)?;
        let rw_ports = self.count("rw_ports", self.rw_ports)?;
        let results_dir = results_dir
            .or_else(|| self.results_dir.clone())
            .unwrap_or_else(|| default_results_dir(&self.name));

        let model = MemoryModel {
            name: ArcStr::from(self.name.as_str()),
            depth,
            width_in_bits,
            area_um2: self.area_um2,
            width_um: self.width_um,
            height_um: self.height_um,
            t_setup_ns: self.t_setup_ns,
            t_hold_ns: self.t_hold_ns,
            access_time_ns: self.access_time_ns,
            cycle_time_ns: self.cycle_time_ns,
            fo4_ps: self.fo4_ps,
            cap_input_pf: self.cap_input_pf,
            standby_leakage_per_bank_mw: self.standby_leakage_per_bank_mw,
            pin_dynamic_power_mw: self.pin_dynamic_power_mw,
            rw_ports,
            process,
            results_dir,
        };
        model.validate()?;
        Ok(model)
    }

    fn count(&self, field: &'static str, value: i64) -> Result<usize> {
        if value > 0 {
            Ok(value as usize)
        } else {
            Err(InvalidModelError::NonPositive {
                memory: self.name.clone(),
                field,
                value: value as f64,
            }
            .into())
        }
    }
}
