//! `cleanurls unclean <url>` – route a clean URL back to its script.

use anyhow::Result;
use cleanurls_core::{Engine, UncleanResult};

pub fn run_unclean(engine: &Engine, url: &str, json: bool) -> Result<()> {
    let result = engine.unclean(url)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&to_json(&result))?);
    } else {
        if let Some(diagnostic) = &result.diagnostic {
            eprintln!("warning: {diagnostic}");
        }
        println!("{}", result.url);
    }
    Ok(())
}

pub(crate) fn to_json(result: &UncleanResult) -> serde_json::Value {
    serde_json::json!({
        "url": result.url.to_string(),
        "fully_resolved": result.fully_resolved,
        "diagnostic": result.diagnostic,
    })
}
