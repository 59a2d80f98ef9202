//! This module contains all the prompt-related data.

/// Persona for the commit message generation.
pub static COMMIT_SYSTEM: &str = "You are an expert at reading git diffs and know how to create \
conventional commit messages. You only talk about the added or deleted lines, not about \
surrounding context.";

/// Instruction placed before the diff in the user turn.
pub static COMMIT_INSTRUCTION: &str =
    "Write a (zsh compatible) commit message for the following changes, return text without triple backticks:";

/// Build the user turn that carries the diff
pub fn commit_user_prompt(diff: &str) -> String {
    format!("{}\n\n{}", COMMIT_INSTRUCTION, diff)
}
