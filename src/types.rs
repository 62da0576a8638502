use std::path::{Path, PathBuf};

/// Subdirectory of the input folder that receives the AVIF files.
pub const OUTPUT_SUBDIR: &str = "converted";

/// Input extensions handed to the encoder, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "gif"];

#[derive(Clone, Debug)]
pub struct ConversionSettings {
    pub quality: u8,
    pub overwrite: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            quality: 50,
            overwrite: true,
        }
    }
}

/// A single user-initiated conversion, fixed for the duration of the batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub quality: u8,
    pub overwrite: bool,
}

impl ConversionRequest {
    pub fn for_folder(input_dir: &Path, settings: &ConversionSettings) -> Self {
        Self {
            input_dir: input_dir.to_path_buf(),
            output_dir: input_dir.join(OUTPUT_SUBDIR),
            quality: settings.quality,
            overwrite: settings.overwrite,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversionOutcome {
    Converted { output: PathBuf },
    SkippedExisting { output: PathBuf },
    SkippedUnsupported,
    Failed { reason: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub skipped_existing: usize,
    pub failed: usize,
    pub output_dir: PathBuf,
}

impl BatchSummary {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted { .. } => self.converted += 1,
            ConversionOutcome::SkippedExisting { .. } => self.skipped_existing += 1,
            ConversionOutcome::Failed { .. } => self.failed += 1,
            ConversionOutcome::SkippedUnsupported => {}
        }
    }
}

#[derive(Clone, Debug)]
pub enum ProgressMessage {
    Started { total: usize },
    Progress { current: usize, total: usize, file: String },
    Success { file: String },
    Error { file: String, error: String },
    Skipped { file: String, reason: String },
    Completed(BatchSummary),
    /// The batch could not start or could not list its input.
    Aborted { error: String },
}

#[derive(Clone, Debug)]
pub enum LogEntry {
    Info(String),
    Success(String),
    Error(String),
    Warning(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_writes_into_converted_subfolder() {
        let settings = ConversionSettings::default();
        let request = ConversionRequest::for_folder(Path::new("/photos"), &settings);
        assert_eq!(request.output_dir, Path::new("/photos").join("converted"));
        assert_eq!(request.quality, 50);
        assert!(request.overwrite);
    }

    #[test]
    fn summary_ignores_unsupported() {
        let mut summary = BatchSummary::new(PathBuf::from("out"));
        summary.record(&ConversionOutcome::Converted { output: "a.avif".into() });
        summary.record(&ConversionOutcome::SkippedUnsupported);
        summary.record(&ConversionOutcome::SkippedExisting { output: "b.avif".into() });
        summary.record(&ConversionOutcome::Failed { reason: "boom".into() });
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.skipped_existing, 1);
        assert_eq!(summary.failed, 1);
    }
}
