//! Loading cycle input files.

use std::path::Path;
use tc_cycles::{CycleInput, SimulationConfig};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Yaml,
    Json,
}

impl InputFormat {
    /// `.json` files are JSON; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Yaml,
        }
    }
}

/// Parse the loose input form from text.
pub fn parse_input(content: &str, format: InputFormat) -> AppResult<CycleInput> {
    match format {
        InputFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse cycle YAML: {}", e))),
        InputFormat::Json => serde_json::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse cycle JSON: {}", e))),
    }
}

/// Load the loose input form from a YAML or JSON file.
pub fn load_input(path: &Path) -> AppResult<CycleInput> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::InputFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_input(&content, InputFormat::from_path(path))
}

/// Load a file and convert it into a typed configuration.
///
/// Missing or invalid parameters surface as [`AppError::Cycle`].
pub fn load_config(path: &Path) -> AppResult<SimulationConfig> {
    let input = load_input(path)?;
    tracing::debug!(path = %path.display(), cycle = %input.cycle, "loaded cycle input");
    Ok(SimulationConfig::try_from(input)?)
}
