use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::{
    chat::{Chat, TRUNCATED_DIFF_CHARS, prepare_diff},
    client::provider::Provider,
    config::Config,
    tools::{files::write_commit_message, git::Repository},
};

/// How a run of the commit workflow ended
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Nothing is staged
    NoChanges,
    /// The user rejected the suggestion
    Declined,
    /// `git commit` ran and exited with this code
    Committed { exit_code: i32 },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::NoChanges | Outcome::Declined => 0,
            Outcome::Committed { exit_code } => *exit_code,
        }
    }
}

/// Runs the whole workflow: staged diff, suggestion, message file and editor commit
pub struct CommitHandler<'a, P: Provider, R: Repository> {
    config: &'a Config,
    chat: Chat<P>,
    repository: R,
    confirm: bool,
}

impl<'a, P: Provider, R: Repository> CommitHandler<'a, P, R> {
    pub fn new(config: &'a Config, chat: Chat<P>, repository: R, confirm: bool) -> Self {
        Self {
            config,
            chat,
            repository,
            confirm,
        }
    }

    /// User-facing lines go to `writer`; the confirmation answer, if asked, is read from
    /// `input`.
    pub async fn run(
        &self,
        writer: &mut impl Write,
        input: &mut impl BufRead,
    ) -> anyhow::Result<Outcome> {
        let diff = self.repository.staged_diff().await?;
        if diff.is_empty() {
            info!("Nothing staged");
            writeln!(writer, "No changes to commit.")?;
            return Ok(Outcome::NoChanges);
        }

        let prepared = prepare_diff(&diff);
        if prepared.truncated {
            warn!(chars = diff.chars().count(), "Diff truncated");
            writeln!(
                writer,
                "Diff too large to process. Cutting it down to {} chars.",
                TRUNCATED_DIFF_CHARS
            )?;
        }

        let message = self.chat.generate_commit_message(prepared.text).await?;
        writeln!(writer, "Commit message suggestion:")?;
        writeln!(writer, "{}", message)?;

        if self.confirm && !ask_confirmation(writer, input)? {
            writeln!(writer, "Commit message not used.")?;
            return Ok(Outcome::Declined);
        }
        writer.flush()?;

        let message_file = &self.config.message_file;
        write_commit_message(message_file, &message).await?;

        let exit_code = self.repository.commit_with_editor(message_file).await?;
        if exit_code != 0 {
            warn!(exit_code, "git commit did not succeed");
        }

        Ok(Outcome::Committed { exit_code })
    }
}

fn ask_confirmation(writer: &mut impl Write, input: &mut impl BufRead) -> anyhow::Result<bool> {
    write!(writer, "Do you want to use this commit message? (Yes/No): ")?;
    writer.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    debug!(%answer, "Confirmation answer");

    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, path::PathBuf};

    use super::*;
    use crate::{
        client::provider::tests::TestProvider,
        config::DEFAULT_BASE_URL,
        tools::git::tests::TestRepository,
    };

    /// Longest diff sent without truncation
    const MAX_DIFF_CHARS: usize = 16_000;

    struct Fixture {
        _dir: tempfile::TempDir,
        config: Config,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().expect("temp dir");
            let config = Config {
                api_key: "sk-test".to_string(),
                model: "gpt-4o-mini".to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
                message_file: dir.path().join("commitmsg.txt"),
                timeout: None,
                };
            Self { _dir: dir, config }
        }

        fn message_file(&self) -> PathBuf {
            self.config.message_file.clone()
        }
    }

    /// The diff embedded in the user turn of the only request
    fn submitted_diff(provider: &TestProvider) -> String {
        let requests = provider.requests.borrow();
        assert_eq!(requests.len(), 1);
        let user = &requests[0].1[1].content;
        let (_, diff) = user.split_once("\n\n").expect("instruction and diff");
        diff.to_string()
    }

    async fn run(
        handler: &CommitHandler<'_, &TestProvider<'_>, &TestRepository>,
        input: &str,
    ) -> (Outcome, String) {
        let mut output = Vec::new();
        let outcome = handler
            .run(&mut output, &mut Cursor::new(input.as_bytes()))
            .await
            .expect("run handler");
        (outcome, String::from_utf8(output).expect("utf8 output"))
    }

    #[tokio::test]
    async fn test_small_diff_end_to_end() {
        let fixture = Fixture::new();
        let diff = "+print('hello')\n-print('hi')\n";
        assert_eq!(diff.chars().count(), 29);

        let provider = TestProvider::new("fix: greet with hello");
        let chat = Chat::new(&provider, "gpt-4o-mini");
        let repository = TestRepository::new(diff);
        let handler = CommitHandler::new(&fixture.config, chat, &repository, false);

        let (outcome, output) = run(&handler, "").await;

        assert_eq!(outcome, Outcome::Committed { exit_code: 0 });
        assert_eq!(submitted_diff(&provider), diff);
        assert!(output.contains("Commit message suggestion:\nfix: greet with hello\n"));
        assert!(!output.contains("Diff too large"));

        let content = std::fs::read_to_string(fixture.message_file()).expect("message file");
        assert_eq!(content, "fix: greet with hello");

        let commits = repository.commits.borrow();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].0, fixture.message_file());
        assert_eq!(commits[0].1, "fix: greet with hello");
    }

    #[tokio::test]
    async fn test_empty_diff_skips_everything() {
        let fixture = Fixture::new();
        let provider = TestProvider::new("unused");
        let chat = Chat::new(&provider, "gpt-4o-mini");
        let repository = TestRepository::new("");
        let handler = CommitHandler::new(&fixture.config, chat, &repository, false);

        let (outcome, output) = run(&handler, "").await;

        assert_eq!(outcome, Outcome::NoChanges);
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(output, "No changes to commit.\n");
        assert!(provider.requests.borrow().is_empty());
        assert!(repository.commits.borrow().is_empty());
        assert!(!fixture.message_file().exists());
    }

    #[tokio::test]
    async fn test_large_diff_is_truncated_with_warning() {
        let fixture = Fixture::new();
        let diff = "+x\n".repeat(MAX_DIFF_CHARS / 3 + 1);
        assert!(diff.chars().count() > MAX_DIFF_CHARS);

        let provider = TestProvider::new("chore: many x");
        let chat = Chat::new(&provider, "gpt-4o-mini");
        let repository = TestRepository::new(&diff);
        let handler = CommitHandler::new(&fixture.config, chat, &repository, false);

        let (outcome, output) = run(&handler, "").await;

        assert_eq!(outcome, Outcome::Committed { exit_code: 0 });
        assert!(output.starts_with("Diff too large to process. Cutting it down to 12000 chars.\n"));
        assert_eq!(submitted_diff(&provider), &diff[..TRUNCATED_DIFF_CHARS]);
    }

    #[tokio::test]
    async fn test_diff_at_limit_is_not_truncated() {
        let fixture = Fixture::new();
        let diff = "a".repeat(MAX_DIFF_CHARS);

        let provider = TestProvider::new("chore: a");
        let chat = Chat::new(&provider, "gpt-4o-mini");
        let repository = TestRepository::new(&diff);
        let handler = CommitHandler::new(&fixture.config, chat, &repository, false);

        let (_, output) = run(&handler, "").await;

        assert!(!output.contains("Diff too large"));
        assert_eq!(submitted_diff(&provider), diff);
    }

    #[tokio::test]
    async fn test_generation_failure_writes_nothing() {
        let fixture = Fixture::new();
        let provider = TestProvider::failing();
        let chat = Chat::new(&provider, "gpt-4o-mini");
        let repository = TestRepository::new("+x\n");
        let handler = CommitHandler::new(&fixture.config, chat, &repository, false);

        let result = handler
            .run(&mut Vec::<u8>::new(), &mut Cursor::new(Vec::<u8>::new()))
            .await;

        assert!(result.is_err());
        assert!(!fixture.message_file().exists());
        assert!(repository.commits.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_yes_commits() {
        let fixture = Fixture::new();
        let provider = TestProvider::new("feat: x");
        let chat = Chat::new(&provider, "gpt-4o-mini");
        let repository = TestRepository::new("+x\n");
        let handler = CommitHandler::new(&fixture.config, chat, &repository, true);

        let (outcome, output) = run(&handler, "Yes\n").await;

        assert_eq!(outcome, Outcome::Committed { exit_code: 0 });
        assert!(output.contains("Do you want to use this commit message? (Yes/No): "));
        assert_eq!(repository.commits.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_confirm_no_declines() {
        let fixture = Fixture::new();
        let provider = TestProvider::new("feat: x");
        let chat = Chat::new(&provider, "gpt-4o-mini");
        let repository = TestRepository::new("+x\n");
        let handler = CommitHandler::new(&fixture.config, chat, &repository, true);

        let (outcome, output) = run(&handler, "no\n").await;

        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(outcome.exit_code(), 0);
        assert!(output.ends_with("Commit message not used.\n"));
        assert!(!fixture.message_file().exists());
        assert!(repository.commits.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_commit_exit_code_is_surfaced() {
        let fixture = Fixture::new();
        let provider = TestProvider::new("feat: x");
        let chat = Chat::new(&provider, "gpt-4o-mini");
        let repository = TestRepository::new("+x\n").with_exit_code(1);
        let handler = CommitHandler::new(&fixture.config, chat, &repository, false);

        let (outcome, _) = run(&handler, "").await;

        assert_eq!(outcome, Outcome::Committed { exit_code: 1 });
        assert_eq!(outcome.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_message_file_is_overwritten() {
        let fixture = Fixture::new();
        std::fs::write(fixture.message_file(), "an old and much longer message").expect("seed");

        let provider = TestProvider::new("fix: y");
        let chat = Chat::new(&provider, "gpt-4o-mini");
        let repository = TestRepository::new("+y\n");
        let handler = CommitHandler::new(&fixture.config, chat, &repository, false);
        run(&handler, "").await;

        let content = std::fs::read_to_string(fixture.message_file()).expect("message file");
        assert_eq!(content, "fix: y");
    }

    #[tokio::test]
    async fn test_diff_is_collected_once() {
        let fixture = Fixture::new();
        let provider = TestProvider::new("fix: y");
        let chat = Chat::new(&provider, "gpt-4o-mini");
        let repository = TestRepository::new("+y\n");
        let handler = CommitHandler::new(&fixture.config, chat, &repository, false);
        run(&handler, "").await;

        assert_eq!(*repository.diff_requests.borrow(), 1);
    }
}
