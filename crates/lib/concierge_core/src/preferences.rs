//! Site preferences: language, form draft and UI flags.
//!
//! Preferences are a plain value owned by the caller. Nothing is written
//! implicitly: callers persist through a [`PreferenceStore`] at the points
//! they choose. Concurrent writers race and the last save wins.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::i18n::Language;

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Partially filled inquiry form kept between visits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InquiryDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub service_interest: Option<String>,
    pub travel_date: Option<String>,
    pub budget: Option<String>,
    pub message: Option<String>,
    pub preferred_contact: Option<String>,
}

impl InquiryDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiFlags {
    pub mobile_menu_open: bool,
    pub cookie_banner_dismissed: bool,
    pub reduced_motion: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SitePreferences {
    pub language: Language,
    pub inquiry_draft: Option<InquiryDraft>,
    pub ui: UiFlags,
}

impl SitePreferences {
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Replace the draft; an empty draft clears it.
    pub fn set_draft(&mut self, draft: InquiryDraft) {
        self.inquiry_draft = if draft.is_empty() { None } else { Some(draft) };
    }

    pub fn clear_draft(&mut self) {
        self.inquiry_draft = None;
    }
}

/// Persistence adapter for [`SitePreferences`].
pub trait PreferenceStore: Send + Sync {
    /// Stored preferences, or defaults when nothing usable is stored.
    fn load(&self) -> SitePreferences;

    fn save(&self, prefs: &SitePreferences) -> Result<(), PreferenceError>;
}

/// Volatile store, for tests and server-side rendering.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    stored: Mutex<Option<SitePreferences>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> SitePreferences {
        self.stored
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .unwrap_or_default()
    }

    fn save(&self, prefs: &SitePreferences) -> Result<(), PreferenceError> {
        *self.stored.lock().unwrap_or_else(|e| e.into_inner()) = Some(prefs.clone());
        Ok(())
    }
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the user data directory.
    pub fn in_data_dir() -> Self {
        Self::new(
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("concierge")
                .join("preferences.json"),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> SitePreferences {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return SitePreferences::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read preferences");
                return SitePreferences::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring corrupt preferences");
            SitePreferences::default()
        })
    }

    fn save(&self, prefs: &SitePreferences) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(prefs)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
