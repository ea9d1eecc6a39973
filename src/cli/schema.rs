//! `agile-docs schema` command

use crate::validator::BUNDLED_SCHEMA;
use anyhow::Result;

/// Print the bundled draft-07 schema
pub fn run() -> Result<()> {
    println!("{}", BUNDLED_SCHEMA.trim_end());
    Ok(())
}
