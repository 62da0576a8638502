use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors raised while converting a folder to AVIF.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Please select a folder first!")]
    NoFolderSelected,

    #[error("ffmpeg executable not found. Place it in the 'tools' folder, set AVIF_CONVERTER_FFMPEG or ensure it's in PATH.")]
    EncoderNotFound,

    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("ffmpeg exited with {status}: {stderr}")]
    EncoderFailed { status: ExitStatus, stderr: String },

    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read input directory {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}
