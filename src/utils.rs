//! Utility functions for text extraction and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Flattening HTML elements into clean text for headlines and bodies
//! - File system validation for the output directory

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Replace every run of whitespace with a single space.
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned()
}

/// Elements whose text is code or fallback markup, never article prose.
const NON_PROSE_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// Text nodes under `element`, in document order, minus script/style/noscript bodies.
fn visible_text<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    element.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element())
            .is_some_and(|e| NON_PROSE_ELEMENTS.contains(&e.name()));
        (!hidden).then_some(&**text)
    })
}

/// All visible text under `element`, concatenated as-is and trimmed at the ends.
///
/// Used for headlines, where markup splits words only cosmetically.
pub fn trimmed_text(element: ElementRef<'_>) -> String {
    visible_text(element).collect::<String>().trim().to_string()
}

/// All non-blank visible text nodes under `element`, each trimmed, joined by single spaces.
///
/// Used for article bodies, where text nodes are separated by block
/// structure (paragraphs, breaks, nested divs). Inline `<script>`, `<style>`
/// and `<noscript>` contents (ad slots, embeds) are left out.
///
/// # Examples
///
/// ```ignore
/// // <div><p>First   paragraph.</p>\n  <p>Second.</p></div>
/// assert_eq!(joined_text(div), "First paragraph. Second.");
/// ```
pub fn joined_text(element: ElementRef<'_>) -> String {
    let joined = visible_text(element)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    collapse_whitespace(&joined)
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
