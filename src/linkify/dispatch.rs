//! Request dispatch against any `DocumentHost`

use super::bulk::BulkScanner;
use super::messages::{Request, Response};
use super::selection::decode_selection;
use crate::config::ScanConfig;
use crate::console;
use crate::dom::DocumentHost;

/// Routes boundary requests to the selection replacer or the bulk scanner
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: ScanConfig,
}

impl Dispatcher {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Handle one request. Every failure becomes an `{error}` response.
    pub fn handle<H: DocumentHost>(&self, host: &mut H, request: &Request) -> Response {
        match request {
            Request::Decode { .. } => match decode_selection(host, request.text()) {
                Ok(outcome) => Response::decoded(outcome),
                Err(e) => {
                    console::warn(&format!("[Dispatcher] decode failed: {}", e));
                    Response::failed(&e)
                }
            },
            Request::ScanAll { .. } => {
                let config = self.config.for_request(request.prefix());
                match BulkScanner::new(&config).and_then(|scanner| scanner.scan(host)) {
                    Ok(stats) => Response::scanned(stats),
                    Err(e) => {
                        console::error(&format!("[Dispatcher] scan failed: {}", e));
                        Response::failed(&e)
                    }
                }
            }
        }
    }

    /// Handle a raw JSON message; `None` for messages that are not ours
    pub fn handle_json<H: DocumentHost>(&self, host: &mut H, message: &serde_json::Value) -> Option<Response> {
        match Request::parse(message) {
            Ok(request) => request.map(|r| self.handle(host, &r)),
            Err(e) => {
                console::warn(&format!("[Dispatcher] malformed request {}: {}", message, e));
                Some(Response::failed(&e))
            }
        }
    }
}
