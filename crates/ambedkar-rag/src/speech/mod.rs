//! Best-effort speech synthesis
//!
//! Spoken answers come from the Google Translate TTS endpoint, which needs
//! no audio drivers and returns MP3 bytes directly. The endpoint only
//! accepts short inputs, so answers are split into bounded segments and the
//! resulting MP3 streams are concatenated.
//!
//! Synthesis runs as a detached task off the request path: the text answer
//! is returned immediately and a synthesis failure is logged and dropped.

use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SpeechConfig;
use crate::error::{Error, Result};

/// Longest text the TTS endpoint accepts per request.
const MAX_SEGMENT_CHARS: usize = 100;

const TTS_BASE_URL: &str = "https://translate.google.com/translate_tts";

/// Split `text` into whitespace-aligned segments of at most `max_chars`
/// characters. A single word longer than `max_chars` is hard-split.
pub fn segment(text: &str, max_chars: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        // Hard-split oversized words so every segment stays bounded.
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(max_chars)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            segments.push(word[..split_at].to_string());
            word = &word[split_at..];
        }
        if word.is_empty() {
            continue;
        }

        let needed = word.chars().count() + if current.is_empty() { 0 } else { 1 };
        if current.chars().count() + needed > max_chars && !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// MP3 synthesizer backed by the Translate TTS endpoint.
pub struct Synthesizer {
    client: Client,
    lang: String,
    audio_dir: PathBuf,
}

impl Synthesizer {
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.audio_dir)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            lang: config.lang.clone(),
            audio_dir: config.audio_dir.clone(),
        })
    }

    pub fn audio_dir(&self) -> &PathBuf {
        &self.audio_dir
    }

    /// Synthesize `text` into `filename` under the audio directory.
    pub async fn synthesize(&self, text: &str, filename: &str) -> Result<()> {
        let segments = segment(text, MAX_SEGMENT_CHARS);
        if segments.is_empty() {
            return Err(Error::speech("nothing to synthesize"));
        }

        let total = segments.len();
        let mut mp3 = Vec::new();
        for (idx, part) in segments.iter().enumerate() {
            let response = self
                .client
                .get(TTS_BASE_URL)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", self.lang.as_str()),
                    ("q", part.as_str()),
                    ("idx", &idx.to_string()),
                    ("total", &total.to_string()),
                    ("textlen", &part.chars().count().to_string()),
                ])
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::speech(format!("TTS endpoint returned HTTP {}", status)));
            }
            // MP3 frame streams concatenate cleanly.
            mp3.extend_from_slice(&response.bytes().await?);
        }

        let path = self.audio_dir.join(filename);
        tokio::fs::write(&path, mp3).await?;
        tracing::debug!(path = %path.display(), segments = total, "Audio written");
        Ok(())
    }
}

/// Fire-and-forget synthesis: spawn a detached task with no channel back
/// into the request path. Failure policy is log-and-drop.
pub fn spawn_detached(synthesizer: Arc<Synthesizer>, text: String, filename: String) {
    tokio::spawn(async move {
        if let Err(e) = synthesizer.synthesize(&text, &filename).await {
            tracing::warn!(error = %e, filename, "Speech synthesis failed, answer unaffected");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_segment() {
        assert_eq!(segment("I drafted it.", 100), vec!["I drafted it."]);
    }

    #[test]
    fn long_text_splits_at_whitespace_within_bound() {
        let text = "the annihilation of caste requires the annihilation of the \
                    religious notions on which caste is founded";
        let segments = segment(text, 40);
        assert!(segments.len() > 1);
        for part in &segments {
            assert!(part.chars().count() <= 40, "segment too long: {:?}", part);
        }
        // No words lost.
        assert_eq!(
            segments.join(" ").split_whitespace().count(),
            text.split_whitespace().count()
        );
    }

    #[test]
    fn oversized_word_is_hard_split() {
        let segments = segment(&"x".repeat(250), 100);
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| s.chars().count() <= 100));
    }

    #[test]
    fn empty_text_yields_no_segments() {
        assert!(segment("", 100).is_empty());
        assert!(segment("   ", 100).is_empty());
    }
}
