//! Résumé loading. Plain text is used as is; PDF résumés are converted to text.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Reads the résumé at `path`. Its contents go into the prompt verbatim.
pub async fn load_resume(path: &Path) -> Result<String> {
    let text = if is_pdf(path) {
        let owned = path.to_path_buf();
        // pdf-extract is synchronous and CPU-heavy.
        tokio::task::spawn_blocking(move || pdf_extract::extract_text(&owned))
            .await
            .context("résumé extraction task panicked")?
            .map_err(|e| anyhow::anyhow!("failed to extract text from {}: {e:?}", path.display()))?
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read résumé {}", path.display()))?
    };

    if text.trim().is_empty() {
        warn!("Résumé {} is empty; letters will lack grounding", path.display());
    }
    debug!("Loaded résumé {} ({} bytes)", path.display(), text.len());
    Ok(text)
}
