use ictcf_common::Result;
use ictcf_drivers::ictcf_browser::BrowserSession;
use std::path::{Path, PathBuf};
use tracing::info;

/// Save a screenshot of the current page as `<dir>/<page title>.png`.
pub async fn capture<S: BrowserSession>(session: &mut S, dir: &Path) -> Result<PathBuf> {
    let title = session.title().await?;
    let png = session.screenshot_png().await?;
    let path = dir.join(format!("{}.png", file_stem(&title)));
    tokio::fs::write(&path, png).await?;
    info!(target: "ictcf.run", path = %path.display(), "screenshot saved");
    Ok(path)
}

fn file_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "page".to_string()
    } else {
        stem
    }
}
