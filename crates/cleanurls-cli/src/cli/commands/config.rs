//! `cleanurls config` – show the effective configuration.

use anyhow::Result;
use cleanurls_core::config::CleanUrlsConfig;

pub fn run_config(cfg: &CleanUrlsConfig) -> Result<()> {
    let gate = cfg.gate_settings();
    if gate.is_inconsistent() {
        eprintln!("warning: cleaningon is set but enableurlrewrite is off; nothing will be rewritten");
    }
    let out = serde_json::json!({
        "config": cfg,
        "mode": gate.mode(),
        "reserved": cfg.collision_set().iter().collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
