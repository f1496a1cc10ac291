//! Pre-flight input resolution: the target list and the credential.
//!
//! Everything here fails before any network activity happens. Errors carry
//! enough context to act on without re-running under a debugger.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Read a newline-delimited URL list. Blank lines and lines starting with
/// `#` are skipped. An unreadable file or an empty resolved list is fatal.
pub fn read_targets(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read target list: {}", path.display()))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect();

    if urls.is_empty() {
        bail!("Target list contains no URLs: {}", path.display());
    }

    Ok(urls)
}

/// Resolve the authentication cookie from exactly one of a literal value or
/// a file reference. File contents are whitespace-trimmed.
pub fn resolve_cookie(literal: Option<&str>, file: Option<&Path>) -> Result<String> {
    let cookie = match (literal, file) {
        (Some(_), Some(_)) => {
            bail!("Supply either a cookie value or a cookie file, not both")
        }
        (Some(value), None) => value.trim().to_string(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read cookie file: {}", path.display()))?
            .trim()
            .to_string(),
        (None, None) => {
            bail!("An authentication cookie is required (--cookie or --cookie-file)")
        }
    };

    if cookie.is_empty() {
        bail!("Authentication cookie is empty");
    }

    Ok(cookie)
}
