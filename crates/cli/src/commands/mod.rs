pub mod check;
pub mod resolve;

use app_utils::{parser_for_path, Site};
use std::fs;
use std::path::Path;

/// Read and parse a site file, picking the format from its extension
pub fn load_site(file_path: &str) -> anyhow::Result<Site> {
    let path = Path::new(file_path);
    let parser = parser_for_path(path)?;

    let content =
        fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Failed to read file: {}", e))?;

    Ok(parser.parse_site(&content)?)
}
