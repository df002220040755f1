//! Transform command
//!
//! Usage: nestbean transform --catalog <FILE> --class <NAME> --input <FILE> [--output <FILE>] [--pretty]
//!
//! The input file holds one alias layout and any number of rows:
//!
//! ```json
//! { "aliases": ["id", "customer.name"], "rows": [[1, "Ada"], [2, "Grace"]] }
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Deserialize;

use nestbean_core::{BeanClass, FieldType, NestBeanError, Value};

#[derive(Debug, Args)]
pub struct TransformArgs {
    /// TOML class catalog
    #[arg(long)]
    pub catalog: PathBuf,

    /// Fully qualified name of the root class
    #[arg(long)]
    pub class: String,

    /// JSON file with `aliases` and `rows`
    #[arg(long)]
    pub input: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Deserialize)]
struct TransformInput {
    aliases: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<serde_json::Value>>,
}

/// Execute transform command
pub fn execute(args: TransformArgs) -> anyhow::Result<()> {
    let catalog = super::load_catalog(&args.catalog)?;
    let transformer = catalog.transformer(&args.class)?;

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input {}", args.input.display()))?;
    let input: TransformInput = serde_json::from_str(&raw)
        .with_context(|| format!("invalid input {}", args.input.display()))?;

    // Alias errors surface even when there are no rows.
    let types = resolve_alias_types(transformer.class(), &input.aliases)?;

    let rows = input
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            coerce_row(transformer.class(), &input.aliases, &types, row)
                .with_context(|| format!("row {}", index))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let beans = transformer.transform_rows(&rows, &input.aliases)?;
    let json = beans
        .iter()
        .map(|bean| bean.to_json())
        .collect::<Result<Vec<_>, _>>()?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, rendered)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        println!("✓ Wrote {} beans to {}", beans.len(), output_path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

/// Target field type of every alias, in alias order
fn resolve_alias_types(
    class: &BeanClass,
    aliases: &[String],
) -> Result<Vec<FieldType>, NestBeanError> {
    aliases
        .iter()
        .map(|alias| class.resolve_path(alias).cloned())
        .collect()
}

/// Convert one JSON row into values typed by each alias's target field
///
/// Cells past the last alias are dropped unread.
fn coerce_row(
    class: &BeanClass,
    aliases: &[String],
    types: &[FieldType],
    row: &[serde_json::Value],
) -> Result<Vec<Value>, NestBeanError> {
    if row.len() < aliases.len() {
        return Err(NestBeanError::ArityMismatch {
            tuple_len: row.len(),
            alias_len: aliases.len(),
        });
    }

    aliases
        .iter()
        .zip(types)
        .zip(row)
        .map(|((alias, ty), cell)| {
            ty.coerce_json(cell)
                .ok_or_else(|| NestBeanError::TypeMismatch {
                    field: alias.clone(),
                    class: class.name().to_string(),
                    expected: ty.name().to_string(),
                    actual: json_type_name(cell).to_string(),
                })
        })
        .collect()
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
