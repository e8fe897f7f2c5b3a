use std::fmt::Write;

use crate::models::{Dataset, DatasetSummary, Evaluation};

pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    let mut controls = 0usize;
    let mut cases = 0usize;
    let mut scored = 0usize;
    let mut interjections = (0usize, 0usize);
    let mut repetitions = (0usize, 0usize);

    for row in dataset.rows.values() {
        if row.group == 0 {
            controls += 1;
            interjections.0 += row.interviewer_interjections;
            repetitions.0 += row.repetitions;
        } else {
            cases += 1;
            interjections.1 += row.interviewer_interjections;
            repetitions.1 += row.repetitions;
        }
        if row.score.is_some() {
            scored += 1;
        }
    }

    let mean = |total: usize, count: usize| {
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    };

    DatasetSummary {
        rows: dataset.len(),
        controls,
        cases,
        scored,
        control_interjections_mean: mean(interjections.0, controls),
        case_interjections_mean: mean(interjections.1, cases),
        control_repetitions_mean: mean(repetitions.0, controls),
        case_repetitions_mean: mean(repetitions.1, cases),
    }
}

pub fn build_report(dataset: &Dataset, evaluation: &Evaluation) -> String {
    let summary = summarize(dataset);
    let mut output = String::new();

    let _ = writeln!(output, "# Speech Baseline Report");
    let _ = writeln!(
        output,
        "Assembled {} transcripts ({} control / {} dementia)",
        summary.rows, summary.controls, summary.cases
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Dataset");

    if summary.rows == 0 {
        let _ = writeln!(output, "No transcripts found.");
    } else {
        let _ = writeln!(
            output,
            "- screening score recorded for {} of {} transcripts",
            summary.scored, summary.rows
        );
        let _ = writeln!(
            output,
            "- mean interviewer interjections: control {:.1}, dementia {:.1}",
            summary.control_interjections_mean, summary.case_interjections_mean
        );
        let _ = writeln!(
            output,
            "- mean repetition markers: control {:.1}, dementia {:.1}",
            summary.control_repetitions_mean, summary.case_repetitions_mean
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Model Performance (seed {}, {:.0}% held out)",
        evaluation.seed,
        evaluation.test_fraction * 100.0
    );

    if evaluation.tasks.is_empty() {
        let _ = writeln!(output, "No task had enough data to evaluate.");
    } else {
        for task in &evaluation.tasks {
            let _ = writeln!(output);
            let _ = writeln!(
                output,
                "### {} ({} train / {} test)",
                task.target, task.train_size, task.test_size
            );
            for metrics in &task.models {
                let _ = writeln!(
                    output,
                    "- {}: accuracy {:.3}, F1 {:.3}",
                    metrics.model, metrics.accuracy, metrics.f1
                );
            }
        }
    }

    output
}
