//! Subtitle Service - HTTP transcription of uploaded videos
//!
//! Accepts a video over HTTP, runs the `auto_subtitle` command line tool on it
//! and returns the generated SRT subtitles as plain text.

pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod subtitle;
pub mod transcribe;
