//! Structural parameters and unit-normalized values for a Liberty view.

use serde::Serialize;

use crate::error::{InvalidModelError, Result};
use crate::memory::MemoryModel;

/// Slew axis span, in multiples of the FO4 delay.
pub const MIN_SLEW_FO4: f64 = 1.0;
pub const MAX_SLEW_FO4: f64 = 25.0;

/// Load axis span, in multiples of the minimum driver input capacitance.
pub const MIN_LOAD_DRIVERS: f64 = 1.0;
pub const MAX_LOAD_DRIVERS: f64 = 100.0;

/// The clock pin is assumed to be driven through a 5x buffer.
pub const CLK_CAP_DRIVERS: f64 = 5.0;

/// Share of the macro's pin dynamic power attributed to each non-clock input.
pub const INPUT_PIN_POWER_FRACTION: f64 = 1e-2;

/// Index declared by the output slew template.
///
/// Arcs override it with the computed load indices, so the two never agree.
pub const TEMPLATE_INDEX_PLACEHOLDER: &str = "1000, 1001";

/// Number of address bits needed to select one of `depth` words.
///
/// A single-word memory needs no address bits. Its views carry no address
/// type or buses at all, the one case where the address bus count does not
/// follow the port count.
pub fn addr_width(depth: usize) -> Option<usize> {
    match depth {
        0 => None,
        d => Some((usize::BITS - (d - 1).leading_zeros()) as usize),
    }
}

#[inline]
pub fn fmt3(x: f64) -> String {
    format!("{x:.3}")
}

/// Interpolation table axes, already in Liberty units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableIndices {
    pub min_slew: f64,
    pub max_slew: f64,
    pub min_load: f64,
    pub max_load: f64,
}

impl TableIndices {
    /// Returns `None` unless both `fo4` and `min_driver_cap` are positive.
    pub fn new(fo4: f64, min_driver_cap: f64) -> Option<Self> {
        if !(fo4 > 0.0 && min_driver_cap > 0.0) {
            return None;
        }
        Some(Self {
            min_slew: MIN_SLEW_FO4 * fo4,
            max_slew: MAX_SLEW_FO4 * fo4,
            min_load: MIN_LOAD_DRIVERS * min_driver_cap,
            max_load: MAX_LOAD_DRIVERS * min_driver_cap,
        })
    }

    pub fn slew_indices(&self) -> String {
        format!("{}, {}", fmt3(self.min_slew), fmt3(self.max_slew))
    }

    pub fn load_indices(&self) -> String {
        format!("{}, {}", fmt3(self.min_load), fmt3(self.max_load))
    }
}

/// Pin names of one read/write port.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct PortPins {
    pub index: usize,
    pub rd_out: String,
    pub we_in: String,
    pub addr_in: String,
    pub wd_in: String,
    pub w_mask_in: String,
    /// Condition under which this port's write enable is deasserted.
    pub we_low: String,
    /// Condition under which this port's write enable is asserted.
    pub we_high: String,
}

impl PortPins {
    /// Port 0 keeps the bare pin names; later ports get an `_<index>` suffix.
    pub fn new(index: usize) -> Self {
        let pin = |base: &str| {
            if index == 0 {
                base.to_string()
            } else {
                format!("{base}_{index}")
            }
        };
        let we_in = pin("we_in");
        Self {
            index,
            rd_out: pin("rd_out"),
            we_low: format!("(! ({we_in}) )"),
            we_high: format!("({we_in})"),
            we_in,
            addr_in: pin("addr_in"),
            wd_in: pin("wd_in"),
            w_mask_in: pin("w_mask_in"),
        }
    }
}

/// Everything the Liberty template needs, formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibParams {
    pub name: String,
    pub date: String,
    pub time_unit: String,
    pub cap_unit: String,
    pub power_unit: String,
    pub voltage: String,
    pub template_index: String,

    pub data_width: usize,
    pub data_msb: usize,
    pub addr_width: usize,
    pub addr_msb: usize,

    pub area: String,
    pub clk_cap: String,
    pub min_period: String,
    pub clk_power: String,

    pub pin_cap: String,
    pub max_load: String,
    pub tcq: String,
    pub tsetup: String,
    pub thold: String,
    pub min_slew: String,
    pub max_slew: String,
    pub slew_indices: String,
    pub load_indices: String,
    pub pin_power: String,
    /// Internal power of data/mask inputs while write enable is low.
    pub write_power_we_low: String,
    /// Internal power of data/mask inputs while write enable is high.
    pub write_power_we_high: String,
    pub leakage: String,

    pub ports: Vec<PortPins>,
}

impl LibParams {
    /// Normalizes `memory` into the units selected by its process.
    ///
    /// `clk_power_mw` is the clock pin internal power in milliwatts and
    /// `date` the header timestamp.
    pub fn new(memory: &MemoryModel, clk_power_mw: f64, date: String) -> Result<Self> {
        memory.validate()?;
        let process = &memory.process;
        let time = process.time_unit();
        let cap = process.cap_unit();
        let power = process.power_unit();

        let addr_width =
            addr_width(memory.depth).ok_or_else(|| InvalidModelError::NonPositive {
                memory: memory.name.to_string(),
                field: "depth",
                value: memory.depth as f64,
            })?;

        let fo4 = time.from_ns(memory.fo4_ps / 1e3);
        let min_driver_cap = cap.from_pf(memory.cap_input_pf);
        let indices = TableIndices::new(fo4, min_driver_cap).ok_or_else(|| {
            InvalidModelError::Malformed {
                memory: memory.name.to_string(),
                reason: format!(
                    "table indices need a positive FO4 delay and driver capacitance, got {fo4} and {min_driver_cap}"
                ),
            }
        })?;

        let pin_power = fmt3(power.from_mw(
            memory.pin_dynamic_power_mw * INPUT_PIN_POWER_FRACTION,
        ));

        Ok(Self {
            name: memory.name.to_string(),
            date,
            time_unit: time.to_string(),
            cap_unit: cap.to_string(),
            power_unit: power.to_string(),
            voltage: process.voltage().to_string(),
            template_index: TEMPLATE_INDEX_PLACEHOLDER.to_string(),

            data_width: memory.width_in_bits,
            data_msb: memory.width_in_bits - 1,
            addr_width,
            addr_msb: addr_width.saturating_sub(1),

            area: fmt3(memory.area_um2),
            clk_cap: fmt3(CLK_CAP_DRIVERS * min_driver_cap),
            min_period: fmt3(time.from_ns(memory.cycle_time_ns)),
            clk_power: fmt3(power.from_mw(clk_power_mw)),

            pin_cap: fmt3(min_driver_cap),
            max_load: fmt3(indices.max_load),
            tcq: fmt3(time.from_ns(memory.access_time_ns)),
            tsetup: fmt3(time.from_ns(memory.t_setup_ns)),
            thold: fmt3(time.from_ns(memory.t_hold_ns)),
            min_slew: fmt3(indices.min_slew),
            max_slew: fmt3(indices.max_slew),
            slew_indices: indices.slew_indices(),
            load_indices: indices.load_indices(),
            write_power_we_low: pin_power.clone(),
            write_power_we_high: pin_power.clone(),
            pin_power,
            leakage: fmt3(power.from_mw(memory.standby_leakage_per_bank_mw)),

            ports: (0..memory.rw_ports).map(PortPins::new).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_addr_width() {
        assert_eq!(addr_width(0), None);
        assert_eq!(addr_width(1), Some(0));
        assert_eq!(addr_width(2), Some(1));
        assert_eq!(addr_width(3), Some(2));
        assert_eq!(addr_width(1024), Some(10));
        assert_eq!(addr_width(1025), Some(11));
        for depth in 2..5000usize {
            let w = addr_width(depth).unwrap();
            assert!(1usize << w >= depth, "depth {depth}");
            assert!(1usize << (w - 1) < depth, "depth {depth}");
            assert_eq!(w, (depth as f64).log2().ceil() as usize, "depth {depth}");
        }
    }

    #[test]
    fn test_addr_width_near_usize_max() {
        let half = 1usize << (usize::BITS - 1);
        assert_eq!(addr_width(half), Some(usize::BITS as usize - 1));
        assert_eq!(addr_width(half + 1), Some(usize::BITS as usize));
        assert_eq!(addr_width(usize::MAX / 2 + 2), Some(usize::BITS as usize));
        assert_eq!(addr_width(usize::MAX), Some(usize::BITS as usize));
    }

    #[test]
    fn test_table_indices() {
        let indices = TableIndices::new(0.04, 0.002).unwrap();
        assert_relative_eq!(indices.min_slew, 0.04);
        assert_relative_eq!(indices.max_slew, 1.0);
        assert_relative_eq!(indices.min_load, 0.002);
        assert_relative_eq!(indices.max_load, 0.2);
        assert_eq!(indices.slew_indices(), "0.040, 1.000");
        assert_eq!(indices.load_indices(), "0.002, 0.200");
    }

    #[test]
    fn test_table_indices_strictly_increasing() {
        for fo4 in [1e-3, 0.015, 0.04, 1.0, 40.0, 900.0] {
            for cap in [1e-4, 0.002, 1.0, 2.5] {
                let indices = TableIndices::new(fo4, cap).unwrap();
                assert!(indices.min_slew < indices.max_slew);
                assert!(indices.min_load < indices.max_load);
            }
        }
    }

    #[test]
    fn test_table_indices_reject_degenerate_axes() {
        assert!(TableIndices::new(0.0, 0.002).is_none());
        assert!(TableIndices::new(0.04, 0.0).is_none());
        assert!(TableIndices::new(-0.04, 0.002).is_none());
        assert!(TableIndices::new(0.04, -1.0).is_none());
        assert!(TableIndices::new(f64::NAN, 0.002).is_none());
    }

    #[test]
    fn test_port_pins() {
        let p0 = PortPins::new(0);
        assert_eq!(p0.rd_out, "rd_out");
        assert_eq!(p0.w_mask_in, "w_mask_in");
        let p2 = PortPins::new(2);
        assert_eq!(p2.we_in, "we_in_2");
        assert_eq!(p2.addr_in, "addr_in_2");
        assert_eq!(p2.we_low, "(! (we_in_2) )");
        assert_eq!(p2.we_high, "(we_in_2)");
    }
}
