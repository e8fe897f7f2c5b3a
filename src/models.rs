use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Transcript {
    pub path: PathBuf,
    pub headers: BTreeMap<String, String>,
    pub speakers: BTreeMap<String, SpeakerHeader>,
    pub utterances: Vec<Utterance>,
}

impl Transcript {
    pub fn media(&self) -> &str {
        self.headers.get("Media").map(String::as_str).unwrap_or("")
    }

    pub fn speaker_header(&self, code: &str) -> Option<&SpeakerHeader> {
        self.speakers.get(code)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpeakerHeader {
    pub language: String,
    pub corpus: String,
    pub code: String,
    pub age: String,
    pub sex: String,
    pub group: String,
    pub ses: String,
    pub role: String,
    pub education: String,
    pub custom: String,
}

impl SpeakerHeader {
    // @ID: language|corpus|code|age|sex|group|ses|role|education|custom|
    // Short lines pad the remaining fields with the empty string.
    pub fn from_id_line(value: &str) -> Self {
        let mut fields = value.split('|').map(str::trim);
        let mut take = || fields.next().unwrap_or("").to_string();
        Self {
            language: take(),
            corpus: take(),
            code: take(),
            age: take(),
            sex: take(),
            group: take(),
            ses: take(),
            role: take(),
            education: take(),
            custom: take(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Utterance {
    pub speaker: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetRow {
    pub group: i32,
    pub score: Option<i32>,
    pub interviewer_interjections: usize,
    pub repetitions: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: BTreeMap<String, DatasetRow>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub controls: usize,
    pub cases: usize,
    pub scored: usize,
    pub control_interjections_mean: f64,
    pub case_interjections_mean: f64,
    pub control_repetitions_mean: f64,
    pub case_repetitions_mean: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelMetrics {
    pub model: String,
    pub accuracy: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskEvaluation {
    pub target: String,
    pub train_size: usize,
    pub test_size: usize,
    pub models: Vec<ModelMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub transcripts: usize,
    pub seed: u64,
    pub test_fraction: f64,
    pub tasks: Vec<TaskEvaluation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_line_splits_into_named_fields() {
        let header =
            SpeakerHeader::from_id_line("eng|pitt|PAR|66;|female|ProbableAD||Participant||23|");
        assert_eq!(header.language, "eng");
        assert_eq!(header.corpus, "pitt");
        assert_eq!(header.code, "PAR");
        assert_eq!(header.age, "66;");
        assert_eq!(header.sex, "female");
        assert_eq!(header.group, "ProbableAD");
        assert_eq!(header.ses, "");
        assert_eq!(header.role, "Participant");
        assert_eq!(header.education, "");
        assert_eq!(header.custom, "23");
    }

    #[test]
    fn short_id_line_pads_with_empty_fields() {
        let header = SpeakerHeader::from_id_line("eng|pitt|INV");
        assert_eq!(header.code, "INV");
        assert_eq!(header.group, "");
        assert_eq!(header.custom, "");
    }
}
