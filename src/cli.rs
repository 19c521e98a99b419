//! Command-line interface

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use crate::config::{ScoreConfig, default_config_path};
use crate::evaluate::{EvaluateOptions, PackageEvaluator};
use crate::project::Project;
use crate::report::{ModuleLookup, Report, aggregate};
use crate::version::registries::NpmRegistry;

#[derive(Debug, Parser)]
#[command(name = "dep-score")]
#[command(version, about = "Score how far dependencies lag behind their latest releases")]
pub struct Cli {
    /// Report the age in days between the installed and latest release
    #[arg(long)]
    pub age: bool,

    /// Include devDependencies
    #[arg(long)]
    pub dev: bool,

    /// Print a per-package table and info-level logs
    #[arg(long)]
    pub verbose: bool,

    /// Write the full report as JSON to this file
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Project directory containing package.json
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub path: PathBuf,

    /// Config file (defaults to the user config directory when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Registry base URL, overriding the config file
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,
}

impl Cli {
    /// Loads the config file and applies command-line overrides
    pub fn resolve_config(&self) -> anyhow::Result<ScoreConfig> {
        let path = match &self.config {
            Some(path) => Some(path.clone()),
            None => default_config_path().filter(|path| path.is_file()),
        };

        let mut config = match path {
            Some(path) => {
                debug!("Reading config from {}", path.display());
                ScoreConfig::load(&path)?
            }
            None => ScoreConfig::default(),
        };

        config.include_age |= self.age;
        config.include_dev_dependencies |= self.dev;
        if let Some(registry) = &self.registry {
            config.registry = registry.clone();
        }
        config.validate()?;

        Ok(config)
    }
}

/// Evaluate the project and print the report
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = cli.resolve_config()?;

    let evaluator = PackageEvaluator::new(
        Project::new(&cli.path),
        Arc::new(NpmRegistry::new(&config.registry)),
        EvaluateOptions::from_config(&config),
    );
    let modules = evaluator
        .evaluate()
        .await
        .with_context(|| format!("Failed to evaluate project at {}", cli.path.display()))?;
    let report = aggregate(modules);

    if cli.verbose {
        print!("{}", format_table(&report.modules, config.include_age));
    }
    print!("{}", format_summary(&report));
    println!("Time taken: {}ms", start.elapsed().as_millis());

    if let Some(path) = &cli.json {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Wrote report to {}", path.display());
    }

    Ok(())
}

/// Total score, module count and per-tag scores
pub fn format_summary(report: &Report) -> String {
    let mut out = format!(
        "Your score: {}\nModules: {}\n",
        report.score,
        report.modules.len()
    );
    for (tag, score) in &report.tag_scores {
        out.push_str(&format!("  {}: {}\n", tag, score));
    }
    out
}

/// Per-package table with name, current, latest, score and optionally days
pub fn format_table(modules: &ModuleLookup, include_age: bool) -> String {
    let mut headers = vec!["name", "current", "latest", "score"];
    if include_age {
        headers.push("days");
    }

    let rows: Vec<Vec<String>> = modules
        .iter()
        .map(|(name, metadata)| {
            let mut row = vec![
                name.clone(),
                metadata.versions.current.to_string(),
                metadata.versions.latest.to_string(),
                metadata.versions.score.to_string(),
            ];
            if include_age {
                row.push(metadata.age.map(|a| a.to_string()).unwrap_or_default());
            }
            row
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    for row in std::iter::once(&header_cells).chain(rows.iter()) {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
