//! Static content served from a directory on disk.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use crate::handler::RequestHandler;
use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::Response;

const INDEX_FILE: &str = "index.html";

/// Serves files below a content root.
#[derive(Debug, Clone)]
pub struct StaticFileHandler {
    root: PathBuf,
}

impl StaticFileHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Finds the file a target refers to.
    ///
    /// A directory holding `index.html` wins over a plain file. Targets that
    /// try to climb out of the root never resolve.
    pub fn resolve(&self, target: &str) -> Option<PathBuf> {
        let path = target.split(['?', '#']).next().unwrap_or_default();
        let relative = Path::new(path.trim_start_matches('/'));

        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            tracing::debug!(uri = target, "Rejecting target outside content root");
            return None;
        }

        let full_path = self.root.join(relative);

        let index_path = full_path.join(INDEX_FILE);
        if full_path.is_dir() && index_path.is_file() {
            return Some(index_path);
        }

        if full_path.is_file() {
            return Some(full_path);
        }

        None
    }
}

impl RequestHandler for StaticFileHandler {
    fn generate_response(&self, request: &Request) -> Result<Response> {
        let Some(path) = self.resolve(request.target()) else {
            return Ok(Response::not_found(request.target()));
        };

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        let Some(content_type) = mime::content_type_for(extension) else {
            let shown = if extension.is_empty() {
                String::new()
            } else {
                format!(".{}", extension)
            };
            return Ok(Response::not_implemented(format!(
                "Unknown content-type: {}",
                shown
            )));
        };

        let content = std::fs::read(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            bytes = content.len(),
            content_type,
            "Serving file"
        );

        Ok(Response::ok(content, content_type))
    }
}
