//! Rewrite a local HTML document without touching the network.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::rewrite::Rewriter;

pub fn run(path: &str) -> Result<()> {
    let html = read_input(path)?;
    let out = Rewriter::default().rewrite_html(&html);
    tracing::info!(replaced = out.replaced, "rewrote {path}");
    println!("{}", out.html);
    Ok(())
}

/// Read `path`, or stdin when `path` is "-".
pub fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(Path::new(path)).with_context(|| format!("failed to read {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<p>Yale</p>").unwrap();
        let html = read_input(path.to_str().unwrap()).unwrap();
        assert_eq!(html, "<p>Yale</p>");
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.html");
        let err = read_input(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
