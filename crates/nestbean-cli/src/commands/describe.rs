//! Describe command
//!
//! Usage: nestbean describe --catalog <FILE> --class <NAME>

use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// TOML class catalog
    #[arg(long)]
    pub catalog: PathBuf,

    /// Fully qualified class name
    #[arg(long)]
    pub class: String,
}

/// Execute describe command
pub fn execute(args: DescribeArgs) -> anyhow::Result<()> {
    let catalog = super::load_catalog(&args.catalog)?;
    let class = catalog.get(&args.class)?;

    match class.parent() {
        Some(parent) => println!("{} extends {}", class.name(), parent.name()),
        None => println!("{}", class.name()),
    }
    for field in class.fields() {
        let access = if field.is_writable() { "" } else { " (read-only)" };
        println!("  {}: {}{}", field.name(), field.field_type().name(), access);
    }

    Ok(())
}
