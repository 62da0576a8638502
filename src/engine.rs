use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::encoder::{EncodeParams, Encoder};
use crate::error::ConvertError;
use crate::types::{
    BatchSummary, ConversionOutcome, ConversionRequest, ProgressMessage, SUPPORTED_EXTENSIONS,
};

pub struct ConversionEngine<E> {
    encoder: E,
}

impl<E: Encoder> ConversionEngine<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    /// Converts every supported image directly inside `request.input_dir`, one at a time.
    ///
    /// Per-file encoder failures are reported on `progress_tx` and do not stop the
    /// batch. Only an unreadable input folder or an uncreatable output folder
    /// returns `Err`.
    pub fn convert_batch(
        &self,
        request: &ConversionRequest,
        progress_tx: &Sender<ProgressMessage>,
    ) -> Result<BatchSummary, ConvertError> {
        let files = list_files(&request.input_dir)?;

        std::fs::create_dir_all(&request.output_dir).map_err(|source| ConvertError::OutputDir {
            path: request.output_dir.clone(),
            source,
        })?;

        let image_files: Vec<PathBuf> = files
            .into_iter()
            .filter(|p| {
                let supported = is_supported_image(p);
                if !supported {
                    debug!("Ignoring unsupported file {}", p.display());
                }
                supported
            })
            .collect();

        let total = image_files.len();
        let _ = progress_tx.send(ProgressMessage::Started { total });

        let mut summary = BatchSummary::new(request.output_dir.clone());

        for (idx, input_file) in image_files.iter().enumerate() {
            let file = display_name(input_file);
            let _ = progress_tx.send(ProgressMessage::Progress {
                current: idx + 1,
                total,
                file: file.clone(),
            });

            let outcome = self.convert_file(request, input_file);
            summary.record(&outcome);

            let message = match outcome {
                ConversionOutcome::Converted { output } => ProgressMessage::Success {
                    file: format!("{} -> {}", file, output.display()),
                },
                ConversionOutcome::SkippedExisting { output } => ProgressMessage::Skipped {
                    file,
                    reason: format!("{} already exists", output.display()),
                },
                ConversionOutcome::Failed { reason } => ProgressMessage::Error { file, error: reason },
                ConversionOutcome::SkippedUnsupported => continue,
            };
            let _ = progress_tx.send(message);
        }

        info!(
            "Converted {} of {} image(s) into {} ({} skipped, {} failed)",
            summary.converted,
            total,
            summary.output_dir.display(),
            summary.skipped_existing,
            summary.failed
        );
        let _ = progress_tx.send(ProgressMessage::Completed(summary.clone()));

        Ok(summary)
    }

    /// Runs the encoder for a single input file, honouring the overwrite flag.
    pub fn convert_file(&self, request: &ConversionRequest, input_file: &Path) -> ConversionOutcome {
        if !is_supported_image(input_file) {
            return ConversionOutcome::SkippedUnsupported;
        }

        let Some(output) = output_path(&request.output_dir, input_file) else {
            return ConversionOutcome::SkippedUnsupported;
        };

        if output.exists() && !request.overwrite {
            info!("Skipping {} (already exists).", input_file.display());
            return ConversionOutcome::SkippedExisting { output };
        }

        let params = EncodeParams::from_quality(request.quality);
        info!("Converting {} with CRF {}...", input_file.display(), params.crf);

        match self.encoder.encode(input_file, &output, &params) {
            Ok(()) => {
                info!("Converted: {} -> {}", input_file.display(), output.display());
                ConversionOutcome::Converted { output }
            }
            Err(e) => {
                warn!("Failed to convert {}: {}", input_file.display(), e);
                ConversionOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConvertError::ReadInput {
            path: dir.to_path_buf(),
            source,
        })?;
        // Follows symlinks, so links to images count and broken links don't.
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

pub fn is_supported_image(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
        }
        None => false,
    }
}

/// `<output_dir>/<stem>.avif`; only the last extension of the input is replaced.
pub fn output_path(output_dir: &Path, input_file: &Path) -> Option<PathBuf> {
    let mut name: OsString = input_file.file_stem()?.to_os_string();
    name.push(".avif");
    Some(output_dir.join(name))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
