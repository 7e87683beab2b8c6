use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde_json::Value;

// @module: Narration audio inspection via ffprobe

/// Probes audio metadata and infers media types for the package manifest
pub struct AudioProbe;

impl AudioProbe {
    /// Total duration of an audio file, rounded to whole seconds.
    ///
    /// Shells out to ffprobe with JSON output; the duration feeds the
    /// package metadata, not the synchronization engine itself.
    pub fn duration_seconds<P: AsRef<Path>>(audio_path: P) -> Result<u64> {
        let audio_path = audio_path.as_ref();

        if !audio_path.exists() {
            return Err(anyhow!("Audio file not found: {:?}", audio_path));
        }

        let output = Command::new("ffprobe")
            .args([
                "-v", "error",
                "-print_format", "json",
                "-show_entries", "format=duration",
                audio_path.to_str().unwrap_or(""),
            ])
            .output()
            .context("Failed to execute ffprobe command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("ffprobe failed for {:?}: {}", audio_path, stderr.trim()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let json: Value = serde_json::from_str(&stdout)
            .context("Failed to parse ffprobe JSON output")?;

        let duration: f64 = json
            .get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|d| d.as_str())
            .and_then(|d| d.parse().ok())
            .ok_or_else(|| anyhow!("ffprobe reported no duration for {:?}", audio_path))?;

        let seconds = duration.round() as u64;
        debug!("Probed audio duration: {}s ({:?})", seconds, audio_path);
        Ok(seconds)
    }

    /// Media type for an audio filename, by extension
    pub fn media_type(filename: &str) -> Option<&'static str> {
        let extension = Path::new(filename).extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "mp3" => Some("audio/mpeg"),
            "m4a" | "m4b" | "mp4" => Some("audio/mp4"),
            "ogg" | "oga" | "opus" => Some("audio/ogg"),
            "wav" => Some("audio/wav"),
            "flac" => Some("audio/flac"),
            "aac" => Some("audio/aac"),
            _ => None,
        }
    }

    /// Duration formatted as unpadded `H:M:S` clock time for the
    /// `media:duration` package metadata
    pub fn format_clock(total_seconds: u64) -> String {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        format!("{}:{}:{}", hours, minutes, seconds)
    }
}
