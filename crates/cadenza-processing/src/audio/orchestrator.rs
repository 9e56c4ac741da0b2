use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;

use super::presets::{TranscodePreset, DEFAULT_PRESETS};
use super::tool::MediaTool;
use crate::error::{ProcessingError, ProcessingResult};

/// Runs the full preset set against one stored original.
///
/// All jobs are spawned together and every one of them is awaited, so no
/// subprocess outlives the call. A single failed job fails the whole set; the
/// caller owns cleanup of the destination directory.
#[derive(Clone)]
pub struct TranscodeOrchestrator {
    tool: Arc<dyn MediaTool>,
    presets: Arc<[TranscodePreset]>,
    permits: Arc<Semaphore>,
}

impl TranscodeOrchestrator {
    /// `max_concurrent_jobs` bounds running jobs across every caller sharing
    /// this orchestrator.
    pub fn new(
        tool: Arc<dyn MediaTool>,
        presets: Vec<TranscodePreset>,
        max_concurrent_jobs: usize,
    ) -> Self {
        Self {
            tool,
            presets: presets.into(),
            permits: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
        }
    }

    pub fn with_default_presets(tool: Arc<dyn MediaTool>, max_concurrent_jobs: usize) -> Self {
        Self::new(tool, DEFAULT_PRESETS.to_vec(), max_concurrent_jobs)
    }

    pub fn presets(&self) -> &[TranscodePreset] {
        &self.presets
    }

    /// Probe `original`, then write every preset into `destination`.
    ///
    /// Returns the probed duration rounded to the nearest second.
    #[tracing::instrument(skip(self, original, destination), fields(original = %original.display(), jobs = self.presets.len()))]
    pub async fn transcode(&self, original: &Path, destination: &Path) -> ProcessingResult<f64> {
        let start = Instant::now();

        let duration = self.tool.probe_duration(original).await?;
        tracing::debug!(duration_seconds = duration, "Probed original");

        let mut tasks = Vec::with_capacity(self.presets.len());
        for preset in self.presets.iter().copied() {
            let tool = Arc::clone(&self.tool);
            let permits = Arc::clone(&self.permits);
            let input = original.to_path_buf();
            let output = destination.join(preset.output_filename());

            let task = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.map_err(|_| {
                    ProcessingError::Transcode("transcode pool is closed".to_string())
                })?;
                tool.transcode(&input, &output, &preset).await
            });

            tasks.push((preset, task));
        }

        let mut first_failure = None;
        for (preset, task) in tasks {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(ProcessingError::Transcode(format!(
                    "{} job did not complete: {}",
                    preset.output_filename(),
                    e
                ))),
            };

            if let Err(e) = result {
                tracing::warn!(
                    preset = %preset.output_filename(),
                    error = %e,
                    "Transcode job failed"
                );
                first_failure.get_or_insert(e);
            }
        }

        if let Some(e) = first_failure {
            return Err(e);
        }

        tracing::info!(
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "All transcode jobs finished"
        );

        Ok(duration.round())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Writes a small file per preset instead of running ffmpeg.
    #[derive(Default)]
    pub struct FakeMediaTool {
        pub duration: Option<f64>,
        /// Output filename whose job should fail.
        pub fail_output: Option<String>,
        pub job_delay: Option<Duration>,
        pub transcoded: Mutex<Vec<PathBuf>>,
        running: AtomicUsize,
        pub max_running: AtomicUsize,
    }

    impl FakeMediaTool {
        pub fn succeeding(duration: f64) -> Self {
            Self {
                duration: Some(duration),
                ..Default::default()
            }
        }

        pub fn failing_on(duration: f64, output: &str) -> Self {
            Self {
                duration: Some(duration),
                fail_output: Some(output.to_string()),
                ..Default::default()
            }
        }

        /// Every job sleeps for `delay`, so overlapping jobs are observable.
        pub fn slow(duration: f64, delay: Duration) -> Self {
            Self {
                duration: Some(duration),
                job_delay: Some(delay),
                ..Default::default()
            }
        }

        pub fn transcode_calls(&self) -> usize {
            self.transcoded.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl MediaTool for FakeMediaTool {
        async fn probe_duration(&self, _input: &Path) -> ProcessingResult<f64> {
            self.duration
                .ok_or_else(|| ProcessingError::Probe("no duration".to_string()))
        }

        async fn transcode(
            &self,
            _input: &Path,
            output: &Path,
            preset: &TranscodePreset,
        ) -> ProcessingResult<()> {
            let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_running.fetch_max(running, Ordering::SeqCst);
            if let Some(delay) = self.job_delay {
                tokio::time::sleep(delay).await;
            }
            self.transcoded.lock().unwrap().push(output.to_path_buf());

            let result = if self.fail_output.as_deref() == Some(preset.output_filename().as_str())
            {
                Err(ProcessingError::Transcode(format!(
                    "exit status 1 for {}",
                    preset.output_filename()
                )))
            } else {
                tokio::fs::write(output, b"encoded")
                    .await
                    .map_err(|e| ProcessingError::Transcode(e.to_string()))
            };

            self.running.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }
}
