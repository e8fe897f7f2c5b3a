//! Reader for CHAT (.cha) transcripts: the header block plus the main
//! speaker tiers. Dependent tiers (%mor, %gra, ...) are skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::PipelineError;
use crate::models::{SpeakerHeader, Transcript, Utterance};

pub const TRANSCRIPT_EXTENSION: &str = "cha";

pub fn read_corpus_dir(dir: &Path) -> Result<Vec<Transcript>, PipelineError> {
    let entries = fs::read_dir(dir).map_err(|source| PipelineError::Load {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PipelineError::Load {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(TRANSCRIPT_EXTENSION) {
            paths.push(path);
        }
    }
    // Directory iteration order is platform-dependent; sort for stable output.
    paths.sort();

    let mut transcripts = Vec::new();
    for path in paths {
        transcripts.push(parse_file(&path)?);
    }
    log::debug!(
        "loaded {} transcripts from {}",
        transcripts.len(),
        dir.display()
    );
    Ok(transcripts)
}

pub fn parse_file(path: &Path) -> Result<Transcript, PipelineError> {
    let content = fs::read_to_string(path).map_err(|source| PipelineError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(path, &content)
}

enum OpenTier {
    None,
    Header(String),
    Utterance,
    Dependent,
}

pub fn parse_str(path: &Path, content: &str) -> Result<Transcript, PipelineError> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    let mut speakers: BTreeMap<String, SpeakerHeader> = BTreeMap::new();
    let mut utterances: Vec<Utterance> = Vec::new();
    let mut open = OpenTier::None;

    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        if let Some(rest) = raw.strip_prefix('@') {
            // Marker headers like @Begin and @End have no value part.
            let (key, value) = match rest.split_once(':') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (rest.trim(), ""),
            };
            if key == "ID" {
                let speaker = SpeakerHeader::from_id_line(value);
                speakers.insert(speaker.code.clone(), speaker);
                open = OpenTier::None;
            } else {
                headers.insert(key.to_string(), value.to_string());
                open = OpenTier::Header(key.to_string());
            }
        } else if let Some(rest) = raw.strip_prefix('*') {
            let (code, text) = rest.split_once(':').ok_or_else(|| PipelineError::Parse {
                path: path.to_path_buf(),
                line,
                reason: "speaker tier is missing the `:` delimiter".to_string(),
            })?;
            utterances.push(Utterance {
                speaker: code.trim().to_string(),
                text: text.trim().to_string(),
            });
            open = OpenTier::Utterance;
        } else if raw.starts_with('%') {
            open = OpenTier::Dependent;
        } else if raw.starts_with('\t') || raw.starts_with(' ') {
            // Indented lines continue whichever tier is open.
            match &open {
                OpenTier::Utterance => {
                    if let Some(last) = utterances.last_mut() {
                        last.text.push(' ');
                        last.text.push_str(raw.trim());
                    }
                }
                OpenTier::Header(key) => {
                    if let Some(value) = headers.get_mut(key) {
                        value.push(' ');
                        value.push_str(raw.trim());
                    }
                }
                OpenTier::Dependent => {}
                OpenTier::None => {
                    return Err(PipelineError::Parse {
                        path: path.to_path_buf(),
                        line,
                        reason: "continuation line with no open tier".to_string(),
                    });
                }
            }
        } else {
            return Err(PipelineError::Parse {
                path: path.to_path_buf(),
                line,
                reason: format!(
                    "unrecognized line start `{}`",
                    raw.chars().next().unwrap_or(' ')
                ),
            });
        }
    }

    Ok(Transcript {
        path: path.to_path_buf(),
        headers,
        speakers,
        utterances,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;
    use std::path::PathBuf;

    use super::*;

    fn sample_transcript() -> String {
        [
            "@UTF8",
            "@Begin",
            "@Languages:\teng",
            "@Participants:\tPAR Participant, INV Investigator",
            "@ID:\teng|pitt|PAR|66;|female|Control||Participant||29|",
            "@ID:\teng|pitt|INV|||||Investigator|||",
            "@Media:\tctl-001, audio",
            "*INV:\ttell me what you see .",
            "*PAR:\ta mother washing dishes",
            "\tand the water is running .",
            "%mor:\tdet|a n|mother part|wash-PROG n|dish-PL .",
            "*PAR:\tthe boy [/] the boy is on a stool .",
            "@End",
        ]
        .join("\n")
    }

    #[test]
    fn parses_headers_speakers_and_utterances() {
        let transcript = parse_str(&PathBuf::from("ctl-001.cha"), &sample_transcript()).unwrap();

        assert_eq!(transcript.media(), "ctl-001, audio");
        assert_eq!(transcript.headers.get("Languages").unwrap(), "eng");
        assert!(transcript.headers.contains_key("Begin"));

        let par = transcript.speaker_header("PAR").unwrap();
        assert_eq!(par.group, "Control");
        assert_eq!(par.custom, "29");
        assert_eq!(transcript.speaker_header("INV").unwrap().role, "Investigator");

        assert_eq!(transcript.utterances.len(), 3);
        assert_eq!(transcript.utterances[0].speaker, "INV");
        assert_eq!(
            transcript.utterances[1].text,
            "a mother washing dishes and the water is running ."
        );
    }

    #[test]
    fn dependent_tiers_are_skipped() {
        let transcript = parse_str(&PathBuf::from("ctl-001.cha"), &sample_transcript()).unwrap();
        for utterance in &transcript.utterances {
            assert!(!utterance.text.contains("det|a"));
        }
    }

    #[test]
    fn continuation_of_dependent_tier_is_ignored() {
        let content = "*PAR:\thello .\n%mor:\tco|hello .\n\tmore annotation .\n";
        let transcript = parse_str(&PathBuf::from("x.cha"), content).unwrap();
        assert_eq!(transcript.utterances[0].text, "hello .");
    }

    #[test]
    fn unrecognized_line_is_a_parse_error() {
        let result = parse_str(&PathBuf::from("bad.cha"), "not a chat line\n");
        match result {
            Err(PipelineError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn speaker_tier_without_delimiter_is_a_parse_error() {
        let result = parse_str(&PathBuf::from("bad.cha"), "*PAR no colon here\n");
        assert!(matches!(result, Err(PipelineError::Parse { .. })));
    }

    #[test]
    fn missing_directory_is_a_load_error() {
        let result = read_corpus_dir(&PathBuf::from("/nonexistent/corpus"));
        assert!(matches!(result, Err(PipelineError::Load { .. })));
    }

    #[test]
    fn corpus_dir_reads_only_cha_files_in_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.cha", "a.cha", "notes.txt"] {
            let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
            writeln!(file, "@Begin").unwrap();
            writeln!(file, "@Media:\t{name}, audio").unwrap();
            writeln!(file, "*PAR:\thello .").unwrap();
            writeln!(file, "@End").unwrap();
        }

        let transcripts = read_corpus_dir(dir.path()).unwrap();
        assert_eq!(transcripts.len(), 2);
        assert_eq!(transcripts[0].media(), "a.cha, audio");
        assert_eq!(transcripts[1].media(), "b.cha, audio");
    }
}
