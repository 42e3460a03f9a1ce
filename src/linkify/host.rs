//! Host collaborators
//!
//! The engine never stores settings, registers menus or shows UI. These
//! traits are the narrow seams the extension glue implements; the functions
//! here hold the little policy that sits on top of them.

use super::messages::{decode_notice, Delivery};

pub const MENU_ID: &str = "b64-decode";
pub const MENU_TITLE: &str = "Decode Base64 (replace selection / linkify)";
pub const NOTICE_TITLE: &str = "Base64 Decode - Linkify";

/// Failures reported by a context-menu registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    AlreadyExists,
    NotFound,
    Other(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::AlreadyExists => write!(f, "Menu item already exists"),
            RegistryError::NotFound => write!(f, "Menu item not found"),
            RegistryError::Other(msg) => write!(f, "Menu registry error: {}", msg),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Read side of the persisted "selection menu enabled" flag
pub trait SettingsStore {
    fn selection_menu_enabled(&self) -> bool;
}

/// Context-menu registration
pub trait MenuRegistry {
    fn create(&mut self, id: &str, title: &str) -> Result<(), RegistryError>;
    fn remove(&mut self, id: &str) -> Result<(), RegistryError>;
}

/// User-visible, non-blocking notification
pub trait Notifier {
    fn notify(&mut self, title: &str, message: &str);
}

/// Make the selection menu entry exist exactly when `enabled`.
///
/// Idempotent: "already exists" and "not found" both count as done.
pub fn ensure_menu<R: MenuRegistry>(registry: &mut R, enabled: bool) -> Result<(), RegistryError> {
    let result = if enabled {
        registry.create(MENU_ID, MENU_TITLE)
    } else {
        registry.remove(MENU_ID)
    };
    match result {
        Ok(()) | Err(RegistryError::AlreadyExists) | Err(RegistryError::NotFound) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Apply the stored flag to the registry
pub fn sync_menu<S: SettingsStore, R: MenuRegistry>(settings: &S, registry: &mut R) -> Result<(), RegistryError> {
    ensure_menu(registry, settings.selection_menu_enabled())
}

/// Surface the result of a selection decode. Notifies at most once and
/// returns whether it did.
pub fn report_decode<N: Notifier>(notifier: &mut N, delivery: &Delivery) -> bool {
    match decode_notice(delivery) {
        Some(message) => {
            notifier.notify(NOTICE_TITLE, &message);
            true
        }
        None => false,
    }
}
