use std::path::PathBuf;

use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};
use tera::Context;

use crate::error::{InvalidModelError, Result};
use crate::liberty::{addr_width, PortPins};
use crate::memory::MemoryModel;
use crate::paths::{out_verilog, write_view};
use crate::TEMPLATES;

#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Sram1RwParams {
    pub module_name: String,
    pub num_words: usize,
    pub data_width: usize,
    pub addr_width: usize,
    pub port_list: String,
    pub ports: Vec<VerilogPort>,
}

#[derive(Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct VerilogPort {
    pub we_in: String,
    pub addr_in: String,
    pub wd_in: String,
    pub w_mask_in: String,
    pub rd_out: String,
}

impl From<PortPins> for VerilogPort {
    fn from(pins: PortPins) -> Self {
        Self {
            we_in: pins.we_in,
            addr_in: pins.addr_in,
            wd_in: pins.wd_in,
            w_mask_in: pins.w_mask_in,
            rd_out: pins.rd_out,
        }
    }
}

/// Behavioral model with the same pin names as the Liberty view.
pub fn generate_1rw_verilog(memory: &MemoryModel) -> Result<String> {
    memory.validate()?;
    let addr_width = addr_width(memory.depth).ok_or_else(|| InvalidModelError::NonPositive {
        memory: memory.name.to_string(),
        field: "depth",
        value: memory.depth as f64,
    })?;

    let ports = (0..memory.rw_ports)
        .map(|i| VerilogPort::from(PortPins::new(i)))
        .collect::<Vec<_>>();
    let port_list = ["clk".to_string(), "ce_in".to_string()]
        .into_iter()
        .chain(ports.iter().flat_map(|p| {
            let mut names = vec![p.we_in.clone()];
            if addr_width > 0 {
                names.push(p.addr_in.clone());
            }
            names.extend([p.wd_in.clone(), p.w_mask_in.clone(), p.rd_out.clone()]);
            names
        }))
        .join(", ");

    let template_params = Sram1RwParams {
        module_name: memory.name.to_string(),
        num_words: memory.depth,
        data_width: memory.width_in_bits,
        addr_width,
        port_list,
        ports,
    };

    Ok(TEMPLATES.render("sram_1rw.v", &Context::from_serialize(template_params)?)?)
}

pub fn save_1rw_verilog(memory: &MemoryModel) -> Result<PathBuf> {
    let verilog = generate_1rw_verilog(memory)?;

    let path = out_verilog(&memory.results_dir, &memory.name);
    write_view(&path, verilog)?;
    info!("wrote behavioral model for {} to {:?}", memory.name, path);

    Ok(path)
}
