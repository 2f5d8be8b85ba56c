//! `cleanurls clean <url>` – print the clean form of a URL.

use anyhow::Result;
use cleanurls_core::Engine;

pub fn run_clean(engine: &Engine, url: &str) -> Result<()> {
    let parsed = engine.parse(url)?;
    let clean = engine.clean_url(&parsed);
    if !clean.is_rewritten() {
        tracing::debug!("no rule rewrote {url}");
    }
    println!("{clean}");
    Ok(())
}
