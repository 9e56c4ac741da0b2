//! Audio module: duration probing and multi-bitrate transcoding

pub mod orchestrator;
pub mod presets;
pub mod tool;

pub use orchestrator::TranscodeOrchestrator;
pub use presets::{TranscodePreset, DEFAULT_PRESETS};
pub use tool::{FfmpegTool, MediaTool};
