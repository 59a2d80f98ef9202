pub mod cli;
pub mod files;
pub mod git;
