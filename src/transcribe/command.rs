use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

use crate::error::{Result, ServiceError};

/// A single invocation of the subtitle tool
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub binary_path: String,
    pub args: Vec<OsString>,
    pub description: String,
}

impl ToolCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(args.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Positional video to transcribe
    pub fn video<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref())
    }

    pub fn output_dir<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("--output_dir").arg(path.as_ref())
    }

    /// Only write subtitle files, skip burning them into a video
    pub fn srt_only(self) -> Self {
        self.arg("--srt_only").arg("true")
    }

    pub fn model<S: AsRef<OsStr>>(self, model: S) -> Self {
        self.arg("--model").arg(model)
    }

    /// Transcribe in the spoken language, no translation
    pub fn transcribe_task(self) -> Self {
        self.arg("--task").arg("transcribe")
    }

    pub fn verbose(self) -> Self {
        self.arg("--verbose").arg("true")
    }

    /// Run to completion, blocking the calling thread.
    ///
    /// Returns the captured output when the tool exits zero.
    pub fn execute(&self) -> Result<Output> {
        debug!("Executing {}: {} {:?}", self.description, self.binary_path, self.args);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .map_err(|source| ServiceError::ToolLaunch {
                binary: self.binary_path.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ServiceError::ToolExecution {
                status: output.status,
                stderr,
            });
        }

        Ok(output)
    }
}

/// Builds commands for a configured tool location
#[derive(Debug, Clone)]
pub struct ToolCommandBuilder {
    binary_path: String,
    leading_args: Vec<String>,
}

impl ToolCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S, leading_args: Vec<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            leading_args,
        }
    }

    fn base<S: Into<String>>(&self, description: S) -> ToolCommand {
        ToolCommand::new(&self.binary_path, description).args(&self.leading_args)
    }

    /// Build the subtitle generation command
    pub fn generate_subtitles<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        video_path: P,
        output_dir: Q,
        model: &str,
    ) -> ToolCommand {
        self.base("Subtitle generation")
            .video(video_path)
            .output_dir(output_dir)
            .srt_only()
            .model(model)
            .transcribe_task()
            .verbose()
    }

    /// Build the availability check command
    pub fn availability_check(&self) -> ToolCommand {
        self.base("Availability check").arg("--help")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cmd: &ToolCommand) -> Vec<String> {
        cmd.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn generation_uses_fixed_argument_set() {
        let builder = ToolCommandBuilder::new("auto_subtitle", Vec::new());
        let cmd = builder.generate_subtitles("/tmp/in.mp4", "/tmp/out", "base");

        assert_eq!(cmd.binary_path, "auto_subtitle");
        assert_eq!(
            strings(&cmd),
            vec![
                "/tmp/in.mp4", "--output_dir", "/tmp/out", "--srt_only", "true", "--model",
                "base", "--task", "transcribe", "--verbose", "true",
            ]
        );
    }

    #[test]
    fn leading_args_precede_video() {
        let builder = ToolCommandBuilder::new(
            "python3",
            vec!["-m".to_string(), "auto_subtitle".to_string()],
        );
        let cmd = builder.generate_subtitles("in.mp4", "out", "tiny");

        assert_eq!(&strings(&cmd)[..3], ["-m", "auto_subtitle", "in.mp4"]);
    }

    #[test]
    fn missing_binary_is_launch_error() {
        let cmd = ToolCommand::new("/nonexistent/subtitle-tool", "Availability check");
        let err = cmd.execute().unwrap_err();
        assert!(matches!(err, ServiceError::ToolLaunch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_carries_stderr() {
        let cmd = ToolCommand::new("sh", "Failing tool")
            .arg("-c")
            .arg("echo 'model not found' >&2; exit 3");

        match cmd.execute().unwrap_err() {
            ServiceError::ToolExecution { status, stderr } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "model not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
