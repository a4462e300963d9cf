use std::process::Command;

use crate::error::{MediaSyncError, Result};

/// Captured output of a flush command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Flushes filesystem buffers once all files are copied.
pub trait FilesystemFlush {
    /// `false` when flushing is skipped entirely.
    fn is_enabled(&self) -> bool {
        true
    }

    fn flush(&self) -> Result<FlushOutput>;
}

/// Runs an external command, `sudo sync` by default.
#[derive(Debug, Clone)]
pub struct CommandFlush {
    argv: Vec<String>,
}

impl CommandFlush {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl FilesystemFlush for CommandFlush {
    fn flush(&self) -> Result<FlushOutput> {
        let command = self.argv.join(" ");
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| MediaSyncError::InvalidConfig("empty sync command".to_string()))?;

        tracing::debug!("Running sync command: {command}");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| MediaSyncError::io("run sync command", program, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(MediaSyncError::SyncCommand {
                command,
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(FlushOutput { stdout, stderr })
    }
}

/// Does nothing; used on Windows and when the user opts out.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFlush;

impl FilesystemFlush for NoFlush {
    fn is_enabled(&self) -> bool {
        false
    }

    fn flush(&self) -> Result<FlushOutput> {
        Ok(FlushOutput::default())
    }
}

/// Flush strategy for this platform.
pub fn platform_flush(command: Vec<String>, skip: bool) -> Box<dyn FilesystemFlush> {
    if cfg!(windows) || skip {
        Box::new(NoFlush)
    } else {
        Box::new(CommandFlush::new(command))
    }
}
