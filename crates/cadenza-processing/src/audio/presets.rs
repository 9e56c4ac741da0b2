/// One transcoding target produced from an uploaded original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodePreset {
    /// Quality tier, used as the output file stem (`low`, `mid`).
    pub tier: &'static str,
    pub bitrate_kbps: u32,
    /// Container, used as the output file extension.
    pub container: &'static str,
    /// ffmpeg audio encoder.
    pub codec: &'static str,
}

impl TranscodePreset {
    /// `<tier>.<container>`, written next to the original.
    pub fn output_filename(&self) -> String {
        format!("{}.{}", self.tier, self.container)
    }
}

pub const DEFAULT_PRESETS: [TranscodePreset; 4] = [
    TranscodePreset {
        tier: "low",
        bitrate_kbps: 96,
        container: "mp3",
        codec: "libmp3lame",
    },
    TranscodePreset {
        tier: "mid",
        bitrate_kbps: 192,
        container: "mp3",
        codec: "libmp3lame",
    },
    TranscodePreset {
        tier: "low",
        bitrate_kbps: 96,
        container: "ogg",
        codec: "libopus",
    },
    TranscodePreset {
        tier: "mid",
        bitrate_kbps: 192,
        container: "ogg",
        codec: "libopus",
    },
];
