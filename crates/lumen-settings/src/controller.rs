//! Save-mode controller
//!
//! Owns the settings store and the engine. In immediate mode every change
//! is applied to the page and written to storage at once. In manual mode
//! changes only touch the store and raise the unsaved flag until
//! [`SettingsController::save`] applies and persists everything in one
//! pass. Loading always applies what it found, whatever the mode.

use lumen_a11y::{AccessibilityEngine, HighlightColors, Priority, ScreenReaderConfig};
use lumen_dom::Window;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::keys::SettingKey;
use crate::settings::{SettingChange, Settings};
use crate::storage::StorageAdapter;
use crate::{SettingsError, StorageError};

pub const SAVED_MESSAGE: &str = "Accessibility settings saved";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save accessibility settings";
pub const RESET_MESSAGE: &str = "Accessibility settings reset to defaults";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveMode {
    #[default]
    Immediate,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControllerOptions {
    pub save_mode: SaveMode,
    pub title_colors: HighlightColors,
    pub link_colors: HighlightColors,
    pub screen_reader: ScreenReaderConfig,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            save_mode: SaveMode::Immediate,
            title_colors: HighlightColors::titles(),
            link_colors: HighlightColors::links(),
            screen_reader: ScreenReaderConfig::default(),
        }
    }
}

impl ControllerOptions {
    pub fn manual() -> Self {
        Self {
            save_mode: SaveMode::Manual,
            ..Self::default()
        }
    }
}

/// Outcome of [`SettingsController::load`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<SettingKey>,
    /// Stored values outside their domain; defaults were kept
    pub rejected: Vec<SettingKey>,
}

pub struct SettingsController<S> {
    engine: AccessibilityEngine,
    storage: S,
    options: ControllerOptions,
    settings: Settings,
    /// What the page currently shows
    applied: Settings,
    unsaved: bool,
}

impl<S> std::fmt::Debug for SettingsController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsController")
            .field("save_mode", &self.options.save_mode)
            .field("settings", &self.settings)
            .field("unsaved", &self.unsaved)
            .finish_non_exhaustive()
    }
}

impl<S: StorageAdapter> SettingsController<S> {
    pub fn new(engine: AccessibilityEngine, storage: S, options: ControllerOptions) -> Self {
        Self {
            engine,
            storage,
            options,
            settings: Settings::default(),
            applied: Settings::default(),
            unsaved: false,
        }
    }

    pub fn for_window(window: Window, storage: S, options: ControllerOptions) -> Self {
        Self::new(AccessibilityEngine::new(window), storage, options)
    }

    pub fn engine(&self) -> &AccessibilityEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AccessibilityEngine {
        &mut self.engine
    }

    pub fn into_engine(self) -> AccessibilityEngine {
        self.engine
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Values currently reflected on the page
    pub fn applied(&self) -> &Settings {
        &self.applied
    }

    pub fn save_mode(&self) -> SaveMode {
        self.options.save_mode
    }

    /// Pending changes stay pending; call `save` to flush them
    pub fn set_save_mode(&mut self, mode: SaveMode) {
        self.options.save_mode = mode;
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Read every stored value and apply the result once
    ///
    /// Values outside their domain are skipped with a warning. A read
    /// failure stops loading; whatever was read so far is still applied.
    pub async fn load(&mut self) -> Result<LoadReport, SettingsError> {
        let mut report = LoadReport::default();
        let mut failure = None;

        for key in SettingKey::ALL {
            match self.storage.get_item(key.storage_key()).await {
                Ok(None) => {}
                Ok(Some(raw)) => match key.parse_value(&raw) {
                    Ok(value) => {
                        self.settings.apply(value);
                        report.loaded.push(key);
                    }
                    Err(err) => {
                        warn!(%err, "ignoring stored setting");
                        report.rejected.push(key);
                    }
                },
                Err(err) => {
                    error!(%err, "failed to load settings");
                    failure = Some(err);
                    break;
                }
            }
        }

        self.apply_all();
        self.unsaved = false;
        debug!(loaded = report.loaded.len(), rejected = report.rejected.len(), "settings loaded");

        match failure {
            Some(err) => Err(err.into()),
            None => Ok(report),
        }
    }

    /// Record a change; apply and persist it now unless in manual mode
    pub async fn change(&mut self, change: SettingChange) -> Result<(), SettingsError> {
        if !self.settings.apply(change) {
            return Ok(());
        }
        debug!(key = %change.key(), value = %change.stored_value(), "setting changed");

        if self.options.save_mode == SaveMode::Manual {
            self.unsaved = self.settings != self.applied;
            return Ok(());
        }

        self.apply_one(change);
        let key = change.key();
        if let Err(err) = self.storage.set_item(key.storage_key(), &change.stored_value()).await {
            self.unsaved = true;
            return Err(self.report_failure(err));
        }
        Ok(())
    }

    /// Parse a raw value for `key` and pass it to [`Self::change`]
    pub async fn change_raw(&mut self, key: SettingKey, raw: &str) -> Result<(), SettingsError> {
        let change = key.parse_value(raw)?;
        self.change(change).await
    }

    /// Apply every setting, then write every value
    ///
    /// Writes are independent; one failing does not stop the others. Effects
    /// stay applied when persistence fails.
    pub async fn save(&mut self) -> Result<(), SettingsError> {
        self.apply_all();

        let values: Vec<SettingChange> = self.settings.values().collect();
        let mut failure = None;
        for value in values {
            let key = value.key();
            let stored = value.stored_value();
            if let Err(err) = self.storage.set_item(key.storage_key(), &stored).await {
                error!(%key, %err, "failed to persist setting");
                failure.get_or_insert(err);
            }
        }

        if let Some(err) = failure {
            self.unsaved = true;
            return Err(self.report_failure(err));
        }
        self.unsaved = false;
        info!("settings saved");
        self.engine.announce(SAVED_MESSAGE, Priority::Polite);
        Ok(())
    }

    /// Drop pending manual-mode changes
    pub fn discard_changes(&mut self) {
        if self.settings != self.applied {
            debug!(keys = ?self.settings.diff(&self.applied), "discarding changes");
        }
        self.settings = self.applied.clone();
        self.unsaved = false;
    }

    /// Restore defaults on the page and clear them from storage
    pub async fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = Settings::default();
        self.apply_all();

        let mut failure = None;
        for key in SettingKey::ALL {
            if let Err(err) = self.storage.remove_item(key.storage_key()).await {
                error!(%key, %err, "failed to remove setting");
                failure.get_or_insert(err);
            }
        }

        if let Some(err) = failure {
            self.unsaved = true;
            return Err(self.report_failure(err));
        }
        self.unsaved = false;
        info!("settings reset");
        self.engine.announce(RESET_MESSAGE, Priority::Polite);
        Ok(())
    }

    fn report_failure(&mut self, err: StorageError) -> SettingsError {
        error!(%err, "settings were not saved");
        self.engine.announce(SAVE_FAILED_MESSAGE, Priority::Assertive);
        err.into()
    }

    fn apply_all(&mut self) {
        let values: Vec<SettingChange> = self.settings.values().collect();
        for value in values {
            self.apply_one(value);
        }
    }

    fn apply_one(&mut self, change: SettingChange) {
        self.applied.apply(change);
        let engine = &mut self.engine;
        match change {
            SettingChange::TextSize(size) => engine.apply_text_size(size),
            SettingChange::LineHeight(height) => engine.apply_line_height(height),
            SettingChange::LetterSpacing(spacing) => engine.apply_letter_spacing(spacing),
            SettingChange::WordSpacing(spacing) => engine.apply_word_spacing(spacing),
            SettingChange::Contrast(level) => engine.apply_contrast(level),
            SettingChange::Saturation(_) | SettingChange::Monochrome(_) => {
                engine.apply_filters(self.applied.monochrome, self.applied.saturation)
            }
            SettingChange::FontFamily(family) => engine.apply_font_family(family),
            SettingChange::HideImages(on) => engine.apply_hide_images(on),
            SettingChange::HighlightTitles(on) => {
                engine.apply_highlight_titles(on, &self.options.title_colors)
            }
            SettingChange::HighlightLinks(on) => {
                engine.apply_highlight_links(on, &self.options.link_colors)
            }
            SettingChange::ScreenReader(true) => {
                if !engine.is_screen_reader_mode_enabled() {
                    engine.enable_screen_reader_mode(self.options.screen_reader.clone());
                }
            }
            SettingChange::ScreenReader(false) => engine.disable_screen_reader_mode(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use lumen_a11y::{ContrastLevel, TextSize};
    use lumen_dom::Document;

    fn controller(options: ControllerOptions) -> SettingsController<MemoryStorage> {
        let engine = AccessibilityEngine::new(Window::with_document(Document::default()));
        SettingsController::new(engine, MemoryStorage::new(), options)
    }

    fn text_scale(controller: &SettingsController<MemoryStorage>) -> Option<String> {
        let doc = controller.engine().document()?;
        let root = doc.document_element();
        Some(doc.tree.style_property(root, "--accessibility-text-scale")).filter(|v| !v.is_empty())
    }

    #[test]
    fn test_options_from_json() {
        let json = r#"{"saveMode":"manual","screenReader":{"skipLinks":false}}"#;
        let options: ControllerOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.save_mode, SaveMode::Manual);
        assert!(!options.screen_reader.skip_links);
        assert_eq!(options.link_colors, HighlightColors::links());
    }

    #[test]
    fn test_immediate_change_applies_and_persists() {
        let mut controller = controller(ControllerOptions::default());
        smol::block_on(controller.change(SettingChange::TextSize(TextSize::Large))).unwrap();

        assert_eq!(text_scale(&controller).as_deref(), Some("1.25"));
        assert_eq!(
            controller.storage().peek("accessibility-text-size").as_deref(),
            Some("large")
        );
        assert!(!controller.has_unsaved_changes());
    }

    #[test]
    fn test_unchanged_value_is_not_written() {
        let mut controller = controller(ControllerOptions::default());
        smol::block_on(controller.change(SettingChange::Contrast(ContrastLevel::Default))).unwrap();
        assert_eq!(controller.storage().write_count(), 0);
    }

    #[test]
    fn test_manual_change_reverted_is_clean() {
        let mut controller = controller(ControllerOptions::manual());
        smol::block_on(async {
            controller.change(SettingChange::HideImages(true)).await.unwrap();
            assert!(controller.has_unsaved_changes());
            controller.change(SettingChange::HideImages(false)).await.unwrap();
        });
        assert!(!controller.has_unsaved_changes());
    }

    #[test]
    fn test_discard_changes() {
        let mut controller = controller(ControllerOptions::manual());
        smol::block_on(controller.change_raw(SettingKey::TextSize, "small")).unwrap();
        assert_eq!(controller.settings().text_size, TextSize::Small);

        controller.discard_changes();
        assert_eq!(controller.settings().text_size, TextSize::Default);
        assert!(!controller.has_unsaved_changes());
        assert_eq!(text_scale(&controller), None);
    }

    #[test]
    fn test_change_raw_rejects_garbage() {
        let mut controller = controller(ControllerOptions::default());
        let err = smol::block_on(controller.change_raw(SettingKey::TextSize, "huge")).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert_eq!(controller.settings().text_size, TextSize::Default);
    }

    #[test]
    fn test_headless_controller_still_persists() {
        let mut controller = SettingsController::for_window(
            Window::headless(),
            MemoryStorage::new(),
            ControllerOptions::default(),
        );
        smol::block_on(controller.change(SettingChange::HighlightLinks(true))).unwrap();
        assert_eq!(
            controller.storage().peek("accessibility-highlight-links").as_deref(),
            Some("true")
        );
    }
}
