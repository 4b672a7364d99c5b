//! Run configuration: one process plus a list of characterized memories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use serde_json::{Map, Value};

use crate::error::{ConfigurationError, Error, InvalidModelError, Result};
use crate::memory::{MemoryConfig, MemoryModel};
use crate::process::Process;

pub const KEY_SRAMS: &str = "srams";

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub process: Arc<Process>,
    pub srams: Vec<MemoryConfig>,
}

impl RunConfig {
    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let process = Arc::new(Process::from_config(map)?);

        let entries = match map.get(KEY_SRAMS) {
            None => Vec::new(),
            Some(Value::Array(entries)) => entries.clone(),
            Some(v) => {
                return Err(ConfigurationError::InvalidValue {
                    key: KEY_SRAMS,
                    value: v.to_string(),
                    expected: "a list of memories",
                }
                .into())
            }
        };

        let srams = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let memory = entry
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{KEY_SRAMS}[{i}]"));
                serde_json::from_value::<MemoryConfig>(entry).map_err(|e| {
                    Error::from(InvalidModelError::Malformed {
                        memory,
                        reason: e.to_string(),
                    })
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { process, srams })
    }

    /// Builds every memory against the shared process.
    pub fn memories(&self, results_dir: Option<&Path>) -> Result<Vec<MemoryModel>> {
        self.srams
            .iter()
            .cloned()
            .map(|sram| {
                let dir = results_dir.map(|d| d.join(&sram.name));
                sram.into_model(self.process.clone(), dir)
            })
            .collect()
    }
}

/// Parses a JSON run configuration.
///
/// Lines whose first non-blank character is `#` are comments.
pub fn parse_json_config(contents: &str) -> Result<RunConfig> {
    let stripped = contents
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");
    let value: Value = serde_json::from_str(&stripped)
        .map_err(|e| ConfigurationError::Parse(e.to_string()))?;
    run_config_from_value(value)
}

pub fn parse_toml_config(contents: &str) -> Result<RunConfig> {
    let table: toml::Value =
        toml::from_str(contents).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
    let value =
        serde_json::to_value(table).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
    run_config_from_value(value)
}

fn run_config_from_value(value: Value) -> Result<RunConfig> {
    match value {
        Value::Object(map) => RunConfig::from_map(&map),
        other => Err(ConfigurationError::Parse(format!(
            "expected a table of configuration keys, found {other}"
        ))
        .into()),
    }
}

/// Loads a run configuration, choosing the format from the file extension.
pub fn load_run_config(path: impl AsRef<Path>) -> Result<RunConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let is_toml = path.extension().map(|ext| ext == "toml").unwrap_or(false);
    debug!(
        "parsing {} configuration {:?}",
        if is_toml { "toml" } else { "json" },
        path
    );
    if is_toml {
        parse_toml_config(&contents)
    } else {
        parse_json_config(&contents)
    }
}

/// Default directory for a memory's views when the configuration names none.
pub fn default_results_dir(name: &str) -> PathBuf {
    PathBuf::from("results").join(name)
}
