#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mockall::mock;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use subtitle_service::config::TranscriberConfig;
use subtitle_service::error::Result;
use subtitle_service::server::{build_router, AppState};
use subtitle_service::transcribe::{AutoSubtitleTool, SubtitleTool};

pub const SUBTITLE: &str = "1\n00:00:00,000 --> 00:00:01,000\nHello\n";

mock! {
    pub Tool {}

    impl SubtitleTool for Tool {
        fn transcribe(&self, video_path: &Path) -> Result<String>;
        fn check_availability(&self) -> Result<()>;
    }
}

pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_server(tool: Arc<dyn SubtitleTool>, transcriber: TranscriberConfig) -> TestServer {
    let router = build_router(AppState::new(tool, transcriber), 16 * 1024 * 1024);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server run");
    });

    TestServer {
        base_url: format!("http://{}", addr),
        client: Client::new(),
        handle,
    }
}

/// Scratch layout for one test: `bin/` holds the fake tool, `scratch/` is the
/// service's scratch root and must be empty once a request finishes.
pub struct Workspace {
    pub root: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(root.path().join("bin")).expect("bin dir");
        std::fs::create_dir_all(root.path().join("scratch")).expect("scratch dir");
        Self { root }
    }

    pub fn scratch(&self) -> PathBuf {
        self.root.path().join("scratch")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    pub fn scratch_entries(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.scratch())
            .expect("read scratch")
            .map(|entry| entry.expect("entry").path())
            .collect()
    }

    pub fn config(&self) -> TranscriberConfig {
        TranscriberConfig {
            scratch_dir: Some(self.scratch()),
            ..TranscriberConfig::default()
        }
    }

    /// A real `AutoSubtitleTool` whose binary is `sh <script>`. The script sees
    /// the video as `$1` and the output directory as `$3`.
    pub fn script_tool(&self, script: &str) -> (Arc<dyn SubtitleTool>, TranscriberConfig) {
        let script_path = self.root.path().join("bin").join("auto_subtitle.sh");
        std::fs::write(&script_path, script).expect("write script");

        let config = TranscriberConfig {
            binary_path: "sh".to_string(),
            binary_args: vec![script_path.to_string_lossy().into_owned()],
            ..self.config()
        };
        (Arc::new(AutoSubtitleTool::new(config.clone())), config)
    }
}

pub fn video_form(bytes: &[u8], content_type: &str) -> Form {
    let part = Part::bytes(bytes.to_vec())
        .file_name("clip.mp4")
        .mime_str(content_type)
        .expect("mime");
    Form::new().part("video", part)
}

/// Shell snippet that writes `content` into the output directory as an SRT.
pub fn write_srt_script(content: &str) -> String {
    format!(
        "test -f \"$1\" || exit 9\nprintf '{}' > \"$3/clip.srt\"\n",
        content.replace('\n', "\\n")
    )
}
