use std::path::Path;

use crate::chat;
use crate::error::PipelineError;
use crate::models::{Dataset, DatasetRow, Transcript};

pub const PARTICIPANT: &str = "PAR";
pub const INVESTIGATOR: &str = "INV";

const SINGLE_RETRACE: &str = "[/]";
const DOUBLE_RETRACE: &str = "[//]";

#[derive(Debug, Clone)]
pub struct GroupPolicy {
    pub control_label: String,
    pub empty_is_control: bool,
}

impl Default for GroupPolicy {
    fn default() -> Self {
        Self {
            control_label: "Control".to_string(),
            empty_is_control: true,
        }
    }
}

impl GroupPolicy {
    // Empty group fields are treated as mis-labelled controls, not as
    // missing data.
    pub fn classify(&self, raw_group: &str) -> i32 {
        if raw_group == self.control_label || (raw_group.is_empty() && self.empty_is_control) {
            0
        } else {
            1
        }
    }
}

pub fn build_dataset(
    control_dir: &Path,
    dementia_dir: &Path,
    policy: &GroupPolicy,
) -> Result<Dataset, PipelineError> {
    let mut transcripts = chat::read_corpus_dir(control_dir)?;
    transcripts.extend(chat::read_corpus_dir(dementia_dir)?);

    let mut dataset = Dataset::default();
    for transcript in &transcripts {
        let id = media_id(transcript);
        let row = derive_row(transcript, &id, policy)?;
        if dataset.rows.insert(id.clone(), row).is_some() {
            return Err(PipelineError::IndexCollision { id });
        }
    }
    log::info!(
        "assembled {} rows from {} transcripts",
        dataset.len(),
        transcripts.len()
    );
    Ok(dataset)
}

pub fn media_id(transcript: &Transcript) -> String {
    transcript
        .media()
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

// All four fields come out of one pass over a single transcript.
fn derive_row(
    transcript: &Transcript,
    id: &str,
    policy: &GroupPolicy,
) -> Result<DatasetRow, PipelineError> {
    let header = transcript.speaker_header(PARTICIPANT);
    let group = policy.classify(header.map(|h| h.group.as_str()).unwrap_or(""));

    let raw_score = header.map(|h| h.custom.as_str()).unwrap_or("");
    let score = if raw_score.is_empty() {
        None
    } else {
        Some(
            raw_score
                .parse::<i32>()
                .map_err(|_| PipelineError::ScoreParse {
                    id: id.to_string(),
                    value: raw_score.to_string(),
                })?,
        )
    };

    let interviewer_interjections = transcript
        .utterances
        .iter()
        .filter(|utterance| utterance.speaker == INVESTIGATOR)
        .count();

    // Participant tiers are concatenated without a separator before
    // counting, so a marker straddling two tiers still counts.
    let mut participant_text = String::new();
    for utterance in &transcript.utterances {
        if utterance.speaker == PARTICIPANT {
            participant_text.push_str(&utterance.text);
        }
    }
    let repetitions = count_retraces(&participant_text);

    Ok(DatasetRow {
        group,
        score,
        interviewer_interjections,
        repetitions,
    })
}

pub fn count_retraces(text: &str) -> usize {
    text.matches(SINGLE_RETRACE).count() + text.matches(DOUBLE_RETRACE).count()
}
