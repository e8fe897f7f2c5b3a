use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

mod chat;
mod error;
mod features;
mod model;
mod models;
mod report;

use crate::features::GroupPolicy;
use crate::model::EvalConfig;
use crate::models::Dataset;

#[derive(Parser)]
#[command(name = "dementia-speech-baseline")]
#[command(
    about = "Baseline dementia screening signals from speech transcripts",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the per-transcript feature table and write it as CSV
    BuildDataset {
        #[arg(long)]
        control_dir: PathBuf,
        #[arg(long)]
        dementia_dir: PathBuf,
        #[arg(long, default_value = "dataset.csv")]
        out: PathBuf,
        #[arg(long, default_value = "Control")]
        control_label: String,
        /// Treat an empty group field as a dementia case instead of a control
        #[arg(long, default_value_t = false)]
        empty_group_as_case: bool,
    },
    /// Fit the baseline classifiers and print their scores
    Evaluate {
        #[arg(long)]
        control_dir: PathBuf,
        #[arg(long)]
        dementia_dir: PathBuf,
        #[arg(long, default_value = "Control")]
        control_label: String,
        #[arg(long, default_value_t = false)]
        empty_group_as_case: bool,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 0.3)]
        test_fraction: f64,
        #[arg(long, default_value_t = 4)]
        score_bins: usize,
        /// Print the evaluation as JSON instead of plain text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        control_dir: PathBuf,
        #[arg(long)]
        dementia_dir: PathBuf,
        #[arg(long, default_value = "Control")]
        control_label: String,
        #[arg(long, default_value_t = false)]
        empty_group_as_case: bool,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 0.3)]
        test_fraction: f64,
        #[arg(long, default_value_t = 4)]
        score_bins: usize,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::BuildDataset {
            control_dir,
            dementia_dir,
            out,
            control_label,
            empty_group_as_case,
        } => {
            let policy = GroupPolicy {
                control_label,
                empty_is_control: !empty_group_as_case,
            };
            let dataset = features::build_dataset(&control_dir, &dementia_dir, &policy)?;
            write_dataset_csv(&dataset, &out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            let summary = report::summarize(&dataset);
            println!(
                "Wrote {} rows to {} ({} control / {} dementia, {} with a screening score).",
                dataset.len(),
                out.display(),
                summary.controls,
                summary.cases,
                summary.scored
            );
        }
        Commands::Evaluate {
            control_dir,
            dementia_dir,
            control_label,
            empty_group_as_case,
            seed,
            test_fraction,
            score_bins,
            json,
        } => {
            let policy = GroupPolicy {
                control_label,
                empty_is_control: !empty_group_as_case,
            };
            let dataset = features::build_dataset(&control_dir, &dementia_dir, &policy)?;
            let config = EvalConfig {
                seed,
                test_fraction,
                score_bins,
            };
            let evaluation = model::evaluate(&dataset, &config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&evaluation)?);
            } else {
                println!(
                    "Evaluated {} transcripts (seed {}, {:.0}% held out):",
                    evaluation.transcripts,
                    evaluation.seed,
                    evaluation.test_fraction * 100.0
                );
                for task in &evaluation.tasks {
                    println!(
                        "{} ({} train / {} test):",
                        task.target, task.train_size, task.test_size
                    );
                    for metrics in &task.models {
                        println!(
                            "- {}: accuracy {:.3}, F1 {:.3}",
                            metrics.model, metrics.accuracy, metrics.f1
                        );
                    }
                }
            }
        }
        Commands::Report {
            control_dir,
            dementia_dir,
            control_label,
            empty_group_as_case,
            seed,
            test_fraction,
            score_bins,
            out,
        } => {
            let policy = GroupPolicy {
                control_label,
                empty_is_control: !empty_group_as_case,
            };
            let dataset = features::build_dataset(&control_dir, &dementia_dir, &policy)?;
            let config = EvalConfig {
                seed,
                test_fraction,
                score_bins,
            };
            let evaluation = model::evaluate(&dataset, &config)?;
            let report = report::build_report(&dataset, &evaluation);
            fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn write_dataset_csv(dataset: &Dataset, out: &Path) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct CsvRow<'a> {
        id: &'a str,
        group: i32,
        score: Option<i32>,
        interviewer_interjections: usize,
        repetitions: usize,
    }

    let mut writer = csv::Writer::from_path(out)?;
    for (id, row) in &dataset.rows {
        writer.serialize(CsvRow {
            id,
            group: row.group,
            score: row.score,
            interviewer_interjections: row.interviewer_interjections,
            repetitions: row.repetitions,
        })?;
    }
    writer.flush()?;
    Ok(())
}
