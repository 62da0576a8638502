use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::ConvertError;
use crate::quality::quality_to_crf;

/// Overrides the ffmpeg lookup with an explicit executable path.
pub const FFMPEG_ENV: &str = "AVIF_CONVERTER_FFMPEG";

pub const AV1_CODEC: &str = "libaom-av1";

/// Encoder parameters for one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeParams {
    pub crf: u8,
}

impl EncodeParams {
    pub fn from_quality(quality: u8) -> Self {
        Self {
            crf: quality_to_crf(quality),
        }
    }
}

/// Something that turns one image into one AVIF file.
pub trait Encoder: Send + Sync {
    fn encode(&self, input: &Path, output: &Path, params: &EncodeParams) -> Result<(), ConvertError>;
}

pub struct FfmpegEncoder {
    program: PathBuf,
}

impl FfmpegEncoder {
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Finds ffmpeg via the env override, a `tools` folder next to the
    /// executable, then `PATH`.
    pub fn locate() -> Result<Self, ConvertError> {
        Self::find_ffmpeg()
            .map(Self::with_program)
            .ok_or(ConvertError::EncoderNotFound)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn find_ffmpeg() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(FFMPEG_ENV) {
            let path = PathBuf::from(path);
            debug!("Checking {}: {}", FFMPEG_ENV, path.display());
            if path.is_file() {
                return Some(path);
            }
        }

        let exe_name = if cfg!(windows) { "ffmpeg.exe" } else { "ffmpeg" };

        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let tool_path = exe_dir.join("tools").join(exe_name);
                debug!("Checking bundled tool: {}", tool_path.display());
                if tool_path.is_file() {
                    return Some(tool_path);
                }
            }
        }

        let output = Command::new(if cfg!(windows) { "where" } else { "which" })
            .arg(exe_name)
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8(output.stdout).ok()?;
        // `where` may list several matches, one per line.
        let path = PathBuf::from(stdout.lines().next()?.trim());
        path.exists().then_some(path)
    }
}

/// `ffmpeg -y -i <input> -c:v libaom-av1 -crf <crf> -b:v 0 <output>`, minus the program.
pub fn ffmpeg_args(input: &Path, output: &Path, params: &EncodeParams) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        input.as_os_str().to_owned(),
        "-c:v".into(),
        AV1_CODEC.into(),
        "-crf".into(),
        params.crf.to_string().into(),
        "-b:v".into(),
        "0".into(),
        output.as_os_str().to_owned(),
    ]
}

impl Encoder for FfmpegEncoder {
    fn encode(&self, input: &Path, output: &Path, params: &EncodeParams) -> Result<(), ConvertError> {
        let result = Command::new(&self.program)
            .args(ffmpeg_args(input, output, params))
            .output()
            .map_err(|source| ConvertError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if result.status.success() {
            Ok(())
        } else {
            Err(ConvertError::EncoderFailed {
                status: result.status,
                stderr: stderr_tail(&result.stderr),
            })
        }
    }
}

const STDERR_TAIL_LINES: usize = 5;

// ffmpeg prints its banner first; the cause is at the end.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
