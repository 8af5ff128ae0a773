//! Smart-home device directives.
//!
//! Devices live in a JSON directory file that other processes maintain:
//!
//! ```json
//! { "devices": { "lamp": { "name": "Desk lamp", "directives": ["on", "off"] } } }
//! ```
//!
//! The file is re-read on every request, under one lock shared by all
//! connection workers so that no worker reads it while another is mid-load.
//! This handler never writes it.
//!
//! | Request                      | Result                                   |
//! |------------------------------|------------------------------------------|
//! | `GET <prefix>`               | 200, every device                        |
//! | `GET <prefix><id>`           | 200 device, 404 unknown                  |
//! | `POST <prefix><id>`          | 200 ack, 400 bad payload, 404, 501       |
//! | anything else                | 405                                      |

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::handler::RequestHandler;
use crate::http::request::{Method, Request};
use crate::http::response::Response;

const JSON: &str = "application/json";
const ALLOWED_METHODS: &str = "GET, POST";

/// A device and the directives it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub directives: Vec<String>,
}

/// Contents of the device directory file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDirectory {
    #[serde(default)]
    pub devices: BTreeMap<String, Device>,
}

#[derive(Debug, Deserialize)]
struct DirectivePayload {
    directive: String,
}

#[derive(Debug, Serialize)]
struct DirectiveAck<'a> {
    device: &'a str,
    directive: &'a str,
    status: &'static str,
}

pub struct SmartHomeHandler {
    prefix: String,
    directory_path: PathBuf,
    lock: Mutex<()>,
}

impl SmartHomeHandler {
    pub fn new(prefix: impl Into<String>, directory_path: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            directory_path: directory_path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Loads the device directory under the shared lock.
    pub fn load_directory(&self) -> Result<DeviceDirectory> {
        // The guarded value is (), so a poisoned lock carries no broken state.
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let raw = std::fs::read_to_string(&self.directory_path).with_context(|| {
            format!(
                "Failed to read device directory {}",
                self.directory_path.display()
            )
        })?;

        serde_json::from_str(&raw).with_context(|| {
            format!(
                "Invalid device directory {}",
                self.directory_path.display()
            )
        })
    }

    fn device_id<'a>(&self, target: &'a str) -> &'a str {
        let command = target.strip_prefix(self.prefix.as_str()).unwrap_or(target);
        command
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/')
    }

    fn list_devices(&self) -> Result<Response> {
        let directory = self.load_directory()?;
        let body = serde_json::to_vec(&directory)?;
        Ok(Response::ok(body, JSON))
    }

    fn show_device(&self, id: &str, target: &str) -> Result<Response> {
        let directory = self.load_directory()?;

        match directory.devices.get(id) {
            Some(device) => Ok(Response::ok(serde_json::to_vec(device)?, JSON)),
            None => Ok(Response::not_found(target)),
        }
    }

    fn apply_directive(&self, id: &str, request: &Request) -> Result<Response> {
        let payload: DirectivePayload = match serde_json::from_str(request.body()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(device = id, error = %e, "Rejecting directive payload");
                return Ok(Response::bad_request(format!("Invalid directive payload: {}", e)));
            }
        };

        let directory = self.load_directory()?;

        let Some(device) = directory.devices.get(id) else {
            return Ok(Response::not_found(request.target()));
        };

        if !device.directives.iter().any(|d| *d == payload.directive) {
            return Ok(Response::not_implemented(format!(
                "Device {} does not support directive {}",
                id, payload.directive
            )));
        }

        tracing::info!(device = id, directive = %payload.directive, "Directive accepted");

        let ack = DirectiveAck {
            device: id,
            directive: &payload.directive,
            status: "accepted",
        };
        Ok(Response::ok(serde_json::to_vec(&ack)?, JSON))
    }
}

impl RequestHandler for SmartHomeHandler {
    fn generate_response(&self, request: &Request) -> Result<Response> {
        let id = self.device_id(request.target());

        match (request.method(), id.is_empty()) {
            (Method::GET, true) => self.list_devices(),
            (Method::GET, false) => self.show_device(id, request.target()),
            (Method::POST, false) => self.apply_directive(id, request),
            _ => Ok(Response::method_not_allowed(ALLOWED_METHODS)),
        }
    }
}
