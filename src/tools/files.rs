use std::path::Path;

use tracing::debug;

/// Write the commit message to `path`, replacing any previous content
pub async fn write_commit_message(path: &Path, message: &str) -> std::io::Result<()> {
    debug!(?path, "Writing commit message");
    tokio::fs::write(path, message).await
}
