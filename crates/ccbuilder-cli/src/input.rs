use crate::error::{CliError, Result};
use ccbuilder::core::parameters::helix::HelixParameters;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// TOML layout: one `[[chain]]` table per helix.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ParameterDocument {
    #[serde(rename = "chain", default)]
    chains: Vec<HelixParameters>,
}

/// Reads a helix parameter list from a `.json` (array) or `.toml` file.
pub fn read_parameters(path: &Path) -> Result<Vec<HelixParameters>> {
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let parsed = match extension.as_deref() {
        Some("json") => parse_json(&content),
        Some("toml") => parse_toml(&content),
        _ => {
            return Err(CliError::Argument(format!(
                "Unsupported parameter file '{}': expected a .json or .toml extension.",
                path.display()
            )));
        }
    };

    let parameters = parsed.map_err(|source| CliError::FileParsing {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} helix parameter set(s) from {:?}", parameters.len(), path);
    Ok(parameters)
}

fn parse_json(content: &str) -> anyhow::Result<Vec<HelixParameters>> {
    Ok(serde_json::from_str(content)?)
}

fn parse_toml(content: &str) -> anyhow::Result<Vec<HelixParameters>> {
    let document: ParameterDocument = toml::from_str(content)?;
    Ok(document.chains)
}
