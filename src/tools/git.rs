use std::path::{Path, PathBuf};

use tracing::info;

use super::cli::CliExecutor;

/// The git operations the commit workflow needs
pub trait Repository {
    /// Text of `git diff --cached`; empty when nothing is staged
    async fn staged_diff(&self) -> anyhow::Result<String>;

    /// Run `git commit` in editor mode starting from `message_file`.
    /// Returns git's exit code.
    async fn commit_with_editor(&self, message_file: &Path) -> anyhow::Result<i32>;
}

impl<R: Repository> Repository for &R {
    async fn staged_diff(&self) -> anyhow::Result<String> {
        (**self).staged_diff().await
    }

    async fn commit_with_editor(&self, message_file: &Path) -> anyhow::Result<i32> {
        (**self).commit_with_editor(message_file).await
    }
}

/// The `git` binary found in `PATH`
pub struct Git {
    executor: CliExecutor,
    /// Passed as `git -C <dir>`; the current directory when `None`
    work_dir: Option<PathBuf>,
}

impl Git {
    pub fn new(work_dir: Option<PathBuf>) -> Self {
        Self {
            executor: CliExecutor::new(),
            work_dir,
        }
    }

    fn args<'a>(&'a self, args: &[&'a str]) -> Vec<std::borrow::Cow<'a, str>> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if let Some(dir) = &self.work_dir {
            full.push("-C".into());
            full.push(dir.to_string_lossy());
        }
        full.extend(args.iter().map(|arg| std::borrow::Cow::Borrowed(*arg)));
        full
    }
}

impl Repository for Git {
    async fn staged_diff(&self) -> anyhow::Result<String> {
        let args = self.args(&["diff", "--cached"]);
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let diff = self.executor.output("git", &args).await?;
        info!(chars = diff.chars().count(), "Staged diff collected");
        Ok(diff)
    }

    async fn commit_with_editor(&self, message_file: &Path) -> anyhow::Result<i32> {
        let message_file = message_file.to_string_lossy();
        info!(%message_file, "Opening commit editor");
        let args = self.args(&["commit", "-e", "-F", &message_file]);
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        self.executor.interactive("git", &args).await
    }
}
