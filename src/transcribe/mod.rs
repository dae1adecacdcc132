// Transcription invoker
//
// The HTTP layer only sees the SubtitleTool trait:
// - AutoSubtitle: runs the auto_subtitle command line tool
// - Command: builder for the tool's command line

pub mod auto_subtitle;
pub mod command;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use auto_subtitle::AutoSubtitleTool;
pub use command::{ToolCommand, ToolCommandBuilder};

use crate::config::TranscriberConfig;
use crate::error::Result;

/// Blocking subtitle generation for a single video.
///
/// Implementations own every temporary artifact they create and remove it
/// before returning, on success and on failure.
pub trait SubtitleTool: Send + Sync {
    /// Generate subtitles for the video and return their text
    fn transcribe(&self, video_path: &Path) -> Result<String>;

    /// Check that the underlying tool can be launched
    fn check_availability(&self) -> Result<()>;
}

/// Factory for the configured subtitle tool
pub struct SubtitleToolFactory;

impl SubtitleToolFactory {
    pub fn create_tool(config: TranscriberConfig) -> Arc<dyn SubtitleTool> {
        Arc::new(AutoSubtitleTool::new(config))
    }
}

/// Run `tool` on the blocking pool so the async caller is never stalled.
///
/// There is no cancellation: if the awaiting future is dropped, the tool
/// still runs to completion and its result is discarded.
pub async fn transcribe_in_worker(tool: Arc<dyn SubtitleTool>, video_path: PathBuf) -> Result<String> {
    tokio::task::spawn_blocking(move || tool.transcribe(&video_path)).await?
}

/// Run the tool's availability check on the blocking pool.
pub async fn check_in_worker(tool: Arc<dyn SubtitleTool>) -> Result<()> {
    tokio::task::spawn_blocking(move || tool.check_availability()).await?
}
