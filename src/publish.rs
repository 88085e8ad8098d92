//! Publishing saved images to a version-control repository.
//!
//! The pipeline only knows the [`Publisher`] trait. Two implementations exist:
//!
//! | Publisher | Behavior |
//! |-----------|----------|
//! | [`GitPublisher`] | `git add <paths>`, `git commit -m <message>`, `git push` |
//! | [`NoopPublisher`] | Does nothing; used when publishing is disabled |
//!
//! A publish failure never affects the saved files or the exit code; the
//! caller logs it and moves on.
//!
//! # Usage
//!
//! ```ignore
//! let publisher = GitPublisher::new(Some(repo_dir));
//! publisher.publish(&[PathBuf::from("images")], &commit_message(3)).await?;
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, instrument};

use crate::utils::truncate_for_log;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("could not run `{program} {step}`: {source}")]
    Spawn {
        program: String,
        step: &'static str,
        source: std::io::Error,
    },

    #[error("`{program} {step}` exited with {code}: {stderr}")]
    CommandFailed {
        program: String,
        step: &'static str,
        code: String,
        stderr: String,
    },
}

/// Commit message used for a run that saved `count` images.
pub fn commit_message(count: usize) -> String {
    format!("Add {count} images")
}

/// Something that can make saved files visible outside this machine.
pub trait Publisher {
    /// Publish `paths` with `message`.
    async fn publish(&self, paths: &[PathBuf], message: &str) -> Result<(), PublishError>;

    /// False for publishers that never do anything; the run then reports
    /// publishing as not attempted.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Publisher used when publishing is turned off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl Publisher for NoopPublisher {
    async fn publish(&self, _paths: &[PathBuf], _message: &str) -> Result<(), PublishError> {
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Stages, commits and pushes through the `git` command-line tool.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    program: String,
    repo_dir: Option<PathBuf>,
}

impl GitPublisher {
    /// Run `git` in `repo_dir`, or in the current directory when `None`.
    pub fn new(repo_dir: Option<PathBuf>) -> Self {
        Self::with_program("git", repo_dir)
    }

    /// Use a different executable in place of `git`.
    pub fn with_program(program: impl Into<String>, repo_dir: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            repo_dir,
        }
    }

    async fn run_step(&self, step: &'static str, args: Vec<OsString>) -> Result<(), PublishError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg(step).args(&args);
        if let Some(dir) = &self.repo_dir {
            cmd.current_dir(dir);
        }

        debug!(program = %self.program, step, ?args, "Running VCS step");
        let output = cmd.output().await.map_err(|source| PublishError::Spawn {
            program: self.program.clone(),
            step,
            source,
        })?;

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PublishError::CommandFailed {
                program: self.program.clone(),
                step,
                code,
                stderr: truncate_for_log(stderr.trim(), 500),
            });
        }
        Ok(())
    }
}

impl Publisher for GitPublisher {
    #[instrument(level = "info", skip_all, fields(count = paths.len(), %message))]
    async fn publish(&self, paths: &[PathBuf], message: &str) -> Result<(), PublishError> {
        let add_args = paths.iter().map(|p| p.as_os_str().to_os_string()).collect();
        self.run_step("add", add_args).await?;
        self.run_step("commit", vec!["-m".into(), message.into()]).await?;
        self.run_step("push", Vec::new()).await?;
        info!("Committed and pushed");
        Ok(())
    }
}

/// Paths to stage for a run: the whole image directory, so removals of
/// replaced files are staged along with new ones.
///
/// The path is made absolute because git may run in a different directory.
pub fn publish_paths(output_dir: &Path) -> Vec<PathBuf> {
    let dir = std::path::absolute(output_dir).unwrap_or_else(|_| output_dir.to_path_buf());
    vec![dir]
}
