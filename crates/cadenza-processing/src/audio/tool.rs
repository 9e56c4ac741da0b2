//! External media tool: ffprobe for duration, ffmpeg for transcoding.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::presets::TranscodePreset;
use crate::error::{ProcessingError, ProcessingResult};

/// The external programs the orchestrator drives.
///
/// Each call blocks the calling task until the subprocess has exited.
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Duration of the media file in seconds.
    async fn probe_duration(&self, input: &Path) -> ProcessingResult<f64>;

    /// Convert `input` into `output` according to `preset`.
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        preset: &TranscodePreset,
    ) -> ProcessingResult<()>;
}

#[derive(Debug, Deserialize)]
struct FFprobeOutput {
    format: Option<FFprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FFprobeFormat {
    duration: Option<String>,
}

/// Extract `format.duration` from ffprobe's JSON output.
pub(crate) fn parse_ffprobe_duration(stdout: &[u8]) -> ProcessingResult<f64> {
    let output: FFprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ProcessingError::Probe(format!("Failed to parse ffprobe output: {}", e)))?;

    let duration = output
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| ProcessingError::Probe("ffprobe reported no duration".to_string()))?;

    match duration.trim().parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds),
        _ => Err(ProcessingError::Probe(format!(
            "ffprobe reported an invalid duration: {}",
            duration
        ))),
    }
}

/// Reject binary paths that could smuggle shell syntax into a config value.
fn validate_binary_path(path: &str) -> anyhow::Result<()> {
    if path.is_empty() {
        return Err(anyhow::anyhow!("binary path is empty"));
    }
    if !path
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
    {
        return Err(anyhow::anyhow!(
            "binary path contains unsafe characters: {}",
            path
        ));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct FfmpegTool {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegTool {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> anyhow::Result<Self> {
        validate_binary_path(&ffmpeg_path)?;
        validate_binary_path(&ffprobe_path)?;
        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
        })
    }
}

#[async_trait]
impl MediaTool for FfmpegTool {
    #[tracing::instrument(skip(self, input), fields(input = %input.display()))]
    async fn probe_duration(&self, input: &Path) -> ProcessingResult<f64> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-show_format", "-of", "json"])
            .arg(input)
            .stdin(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ProcessingError::Probe(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(status = %output.status, "ffprobe failed: {}", stderr);
            return Err(ProcessingError::Probe(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        parse_ffprobe_duration(&output.stdout)
    }

    #[tracing::instrument(
        skip(self, input, output),
        fields(preset = %preset.output_filename(), bitrate_kbps = preset.bitrate_kbps)
    )]
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        preset: &TranscodePreset,
    ) -> ProcessingResult<()> {
        let start = std::time::Instant::now();

        let result = Command::new(&self.ffmpeg_path)
            .args(["-hide_banner", "-nostdin", "-y", "-i"])
            .arg(input)
            .args(["-vn", "-map_metadata", "-1", "-c:a", preset.codec, "-b:a"])
            .arg(format!("{}k", preset.bitrate_kbps))
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ProcessingError::Transcode(format!("Failed to run ffmpeg: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ProcessingError::Transcode(format!(
                "ffmpeg exited with {} for {}: {}",
                result.status,
                preset.output_filename(),
                stderr.trim()
            )));
        }

        tracing::debug!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Transcode finished"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::DEFAULT_PRESETS;

    #[test]
    fn test_parse_duration() {
        let json = br#"{"format":{"filename":"original","duration":"183.466000"}}"#;
        assert!((parse_ffprobe_duration(json).unwrap() - 183.466).abs() < 1e-9);
    }

    #[test]
    fn test_parse_duration_missing_or_invalid() {
        let cases: [&[u8]; 5] = [
            br#"{"format":{}}"#,
            br#"{}"#,
            br#"{"format":{"duration":"N/A"}}"#,
            br#"{"format":{"duration":"-3"}}"#,
            b"not json",
        ];
        for json in cases {
            assert!(matches!(
                parse_ffprobe_duration(json),
                Err(ProcessingError::Probe(_))
            ));
        }
    }

    #[test]
    fn test_rejects_unsafe_binary_paths() {
        assert!(FfmpegTool::new("ffmpeg".into(), "/usr/bin/ffprobe".into()).is_ok());
        assert!(FfmpegTool::new("ffmpeg; rm -rf /".into(), "ffprobe".into()).is_err());
        assert!(FfmpegTool::new("ffmpeg".into(), "$(ffprobe)".into()).is_err());
        assert!(FfmpegTool::new(String::new(), "ffprobe".into()).is_err());
    }

    #[tokio::test]
    async fn test_missing_binaries_surface_as_typed_errors() {
        let tool = FfmpegTool::new(
            "/nonexistent/bin/ffmpeg".into(),
            "/nonexistent/bin/ffprobe".into(),
        )
        .unwrap();
        let input = Path::new("/nonexistent/original");

        assert!(matches!(
            tool.probe_duration(input).await,
            Err(ProcessingError::Probe(_))
        ));
        assert!(matches!(
            tool.transcode(input, Path::new("/nonexistent/low.mp3"), &DEFAULT_PRESETS[0])
                .await,
            Err(ProcessingError::Transcode(_))
        ));
    }
}
