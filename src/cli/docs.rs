//! `agile-docs docs` command

use crate::services::{DocumentationQuery, DocumentationService};
use anyhow::{Context, Result};
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct DocsArgs {
    /// Topic: all, principles, methodologies, workflows, tools, best_practices, decision_trees
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Detail level: full or summary
    #[arg(short, long)]
    pub detail: Option<String>,

    /// Output format: json or yaml
    #[arg(short, long)]
    pub format: Option<String>,
}

pub fn run(args: &DocsArgs) -> Result<()> {
    let query = DocumentationQuery::parse(
        args.topic.as_deref(),
        args.detail.as_deref(),
        args.format.as_deref(),
    )?;

    let service = DocumentationService::bundled().context("Bundled documentation is unusable")?;
    let output = service.query(&query)?;
    println!("{}", output.trim_end());
    Ok(())
}
