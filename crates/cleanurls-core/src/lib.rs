pub mod config;
pub mod logging;

// Engine parts, leaf first.
pub mod collision;
pub mod error;
pub mod gate;
pub mod resolver;
pub mod site;
pub mod url_model;

pub mod cleaner;
pub mod engine;
pub mod rules;
pub mod uncleaner;

pub use engine::Engine;
pub use error::UrlError;
pub use gate::{GateSettings, RewriteGate, RewriteMode};
pub use uncleaner::UncleanResult;
