mod error;
mod ingest;
mod logging;
mod parser;
mod pipeline;
mod scaffold;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

use crate::error::ConfigError;
use crate::ingest::ReaderRegistry;
use crate::pipeline::{Completion, Pipeline, RunOutcome};
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "aasf", about = "Automated Agent Scaffolding Framework")]
struct Cli {
    /// Path to the rulebook file (.txt or .pdf)
    rulebook_file: PathBuf,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the extracted agents instead of generating files
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let t0 = Instant::now();
    let cli = Cli::parse();

    let settings = match Settings::load(&cli.config) {
        Ok(s) => s,
        Err(ConfigError::NotFound(path)) => {
            println!("Error: Configuration file not found at '{}'", path.display());
            return Ok(ExitCode::from(2));
        }
        Err(e) => {
            println!("Error parsing YAML configuration: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    logging::init(&settings.log_level);

    let pipeline = match Pipeline::new(&settings) {
        Ok(p) => p,
        Err(e) => {
            println!("Error: invalid configuration: {}", e);
            return Ok(ExitCode::from(2));
        }
    };

    if cli.dry_run {
        let text = ReaderRegistry::default()
            .read(&cli.rulebook_file)
            .with_context(|| format!("reading {}", cli.rulebook_file.display()))?;
        let records = pipeline.extract_text(&text);
        println!("{} agent definitions found", records.len());
        for r in &records {
            println!("  {:<16} {:<32} {}", r.agent_id(), r.agent_name(), r.class_name());
            let details = [
                ("function", r.primary_function()),
                ("type", r.agent_type()),
                ("priority", r.priority()),
                ("resources", r.resource_requirements()),
            ];
            for (label, value) in details {
                if let Some(v) = value {
                    println!("      {:<10} {}", label, v);
                }
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = pipeline.run(&cli.rulebook_file);
    match &outcome {
        RunOutcome::Done(Completion::NothingExtracted) => {
            println!("No valid agent definitions were extracted.");
        }
        RunOutcome::Done(Completion::Generated(report)) => {
            println!(
                "Wrote {} files to {} ({} failed).",
                report.written.len(),
                pipeline.output_dir().display(),
                report.failures.len()
            );
            for f in &report.failures {
                println!("  failed: {} / {}: {}", f.agent_id, f.template, f.reason);
            }
        }
        RunOutcome::Failed(e) => {
            println!("Pipeline failed ({}): {}", e.category(), e);
        }
    }
    let code = if outcome.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    };

    println!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(code)
}
