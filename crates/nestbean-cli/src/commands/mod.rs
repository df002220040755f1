use std::path::Path;

use anyhow::Context;
use nestbean_core::ClassCatalog;

pub mod describe;
pub mod transform;

/// Read and resolve a TOML class catalog
pub(crate) fn load_catalog(path: &Path) -> anyhow::Result<ClassCatalog> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let catalog = ClassCatalog::from_toml_str(&source)
        .with_context(|| format!("invalid catalog {}", path.display()))?;
    Ok(catalog)
}
