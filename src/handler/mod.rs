//! Request handlers and dispatch.
//!
//! A [`RequestHandler`] turns a parsed request into a response. Handlers may
//! fail; the [`Dispatcher`] is the total boundary that converts any failure
//! into a 500 so that every request gets exactly one response.
//!
//! Routing happens in two steps:
//!
//! 1. Prefix mounts, checked in registration order (e.g. `/smarthome/`).
//! 2. The method table: GET goes to static files, every other method is
//!    answered with 501 Not Implemented.

pub mod smarthome;
pub mod static_files;

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::http::request::{Method, Request};
use crate::http::response::Response;

pub use smarthome::SmartHomeHandler;
pub use static_files::StaticFileHandler;

/// Produces a response for a request within some URI or method domain.
pub trait RequestHandler: Send + Sync {
    fn generate_response(&self, request: &Request) -> Result<Response>;
}

struct Mount {
    prefix: String,
    handler: Arc<dyn RequestHandler>,
}

/// Maps each request to the handler responsible for it.
pub struct Dispatcher {
    static_files: StaticFileHandler,
    mounts: Vec<Mount>,
}

impl Dispatcher {
    pub fn new(static_files: StaticFileHandler) -> Self {
        Self {
            static_files,
            mounts: Vec::new(),
        }
    }

    /// Builds the dispatcher described by the configuration.
    pub fn from_config(cfg: &Config) -> Self {
        let mut dispatcher = Self::new(StaticFileHandler::new(&cfg.content.root));

        if let Some(smarthome) = &cfg.smarthome {
            dispatcher.mount(
                smarthome.prefix.clone(),
                Arc::new(SmartHomeHandler::new(&smarthome.prefix, &smarthome.directory)),
            );
        }

        dispatcher
    }

    /// Routes every target starting with `prefix` to `handler`.
    pub fn mount(&mut self, prefix: impl Into<String>, handler: Arc<dyn RequestHandler>) -> &mut Self {
        self.mounts.push(Mount {
            prefix: prefix.into(),
            handler,
        });
        self
    }

    /// Produces the response for `request`. Never fails.
    pub fn dispatch(&self, request: &Request) -> Response {
        let result = match self.mount_for(request.target()) {
            Some(mount) => {
                tracing::debug!(prefix = %mount.prefix, "Routing to mounted handler");
                mount.handler.generate_response(request)
            }
            None => self.by_method(request),
        };

        result.unwrap_or_else(|e| {
            tracing::error!(
                error = %e,
                method = %request.method(),
                uri = %request.target(),
                "Handler failed"
            );
            Response::internal_error(format!("Internal server error: {}", e))
        })
    }

    fn mount_for(&self, target: &str) -> Option<&Mount> {
        self.mounts
            .iter()
            .find(|mount| target.starts_with(mount.prefix.as_str()))
    }

    fn by_method(&self, request: &Request) -> Result<Response> {
        match request.method() {
            Method::GET => self.static_files.generate_response(request),
            Method::HEAD
            | Method::POST
            | Method::PUT
            | Method::DELETE
            | Method::CONNECT
            | Method::OPTIONS
            | Method::TRACE
            | Method::PATCH => Ok(Response::not_implemented("Not implemented.")),
        }
    }
}
