use std::path::Path;
use tracing::{debug, error, info};

use crate::config::TranscriberConfig;
use crate::error::{Result, ServiceError};
use crate::subtitle::{find_subtitle_file, read_subtitle};
use super::SubtitleTool;
use super::command::ToolCommandBuilder;

/// Runs the `auto_subtitle` command line tool
pub struct AutoSubtitleTool {
    config: TranscriberConfig,
    command_builder: ToolCommandBuilder,
}

impl AutoSubtitleTool {
    pub fn new(config: TranscriberConfig) -> Self {
        let command_builder =
            ToolCommandBuilder::new(&config.binary_path, config.binary_args.clone());

        Self {
            config,
            command_builder,
        }
    }
}

impl SubtitleTool for AutoSubtitleTool {
    fn transcribe(&self, video_path: &Path) -> Result<String> {
        info!("Start transcription processing: {}", video_path.display());

        // Removed with its contents when this function returns
        let work_dir = tempfile::Builder::new()
            .prefix("subtitle-work-")
            .tempdir_in(self.config.ensure_scratch_root()?)?;

        let command = self.command_builder.generate_subtitles(
            video_path,
            work_dir.path(),
            &self.config.model,
        );

        let output = command.execute().inspect_err(|e| {
            if let ServiceError::ToolExecution { stderr, .. } = e {
                error!("Subtitle tool error: {}", stderr);
            }
        })?;
        debug!("Tool stdout: {}", String::from_utf8_lossy(&output.stdout).trim());
        debug!("Tool stderr: {}", String::from_utf8_lossy(&output.stderr).trim());

        let srt_path = find_subtitle_file(work_dir.path())?;
        let content = read_subtitle(&srt_path)?;

        info!("Transcription finished: {} bytes of subtitles", content.len());
        Ok(content)
    }

    fn check_availability(&self) -> Result<()> {
        self.command_builder.availability_check().execute()?;
        info!("Subtitle tool is available: {}", self.config.binary_path);
        Ok(())
    }
}
