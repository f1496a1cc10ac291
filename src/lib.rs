// Allow dead code for public API functions that may not be used internally
// but are part of the library's exposed interface
#![allow(dead_code)]

pub mod cli;
pub mod config;
pub mod export;
pub mod extract;
pub mod input;
pub mod logger;
pub mod record;
pub mod scrape;
pub mod session;

pub use record::{EntityKind, UrnRecord};
pub use scrape::{Pipeline, ScrapeFailure, ScrapeReport};
pub use session::SessionConfig;
