//! Single-slot store for the authenticated user's profile.
//!
//! Written by login, read by the dashboard, cleared by logout; last writer
//! wins. The handle is explicit and injectable rather than an ambient global.
//! An optional backing file keeps the serialized profile across process runs;
//! file faults are logged and swallowed so a broken disk never breaks a page.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::api::Profile;
use crate::tprintln;

#[derive(Clone, Default)]
pub struct SessionStore {
    slot: Arc<RwLock<Option<Profile>>>,
    path: Option<Arc<PathBuf>>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Store backed by `path`; an existing file hydrates the slot on first read.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self { slot: Arc::new(RwLock::new(None)), path: Some(Arc::new(path.into())) }
    }

    pub fn set(&self, profile: Profile) {
        if let Some(path) = &self.path {
            match serde_json::to_vec(&profile) {
                Ok(bytes) => {
                    if let Err(e) = std::fs::write(path.as_ref(), bytes) {
                        warn!(target: "portal", "failed to persist session to {}: {e}", path.display());
                    }
                }
                Err(e) => warn!(target: "portal", "failed to serialize session: {e}"),
            }
        }
        tprintln!("session.set user={}", profile.health_care_number);
        *self.slot.write() = Some(profile);
    }

    pub fn get(&self) -> Option<Profile> {
        if let Some(p) = self.slot.read().clone() {
            return Some(p);
        }
        // Fall back to the backing file (fresh process, earlier login).
        let path = self.path.as_ref()?;
        let bytes = std::fs::read(path.as_ref()).ok()?;
        match serde_json::from_slice::<Profile>(&bytes) {
            Ok(profile) => {
                *self.slot.write() = Some(profile.clone());
                Some(profile)
            }
            Err(e) => {
                warn!(target: "portal", "unreadable session file {}: {e}", path.display());
                None
            }
        }
    }

    pub fn clear(&self) {
        tprintln!("session.clear");
        *self.slot.write() = None;
        if let Some(path) = &self.path {
            if let Err(e) = std::fs::remove_file(path.as_ref()) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(target: "portal", "failed to remove session file {}: {e}", path.display());
                }
            }
        }
    }
}
