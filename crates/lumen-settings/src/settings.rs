//! Settings store
//!
//! The in-memory record of every preference. Values are always inside
//! their domain; raw strings are checked by [`SettingKey::parse_value`]
//! before they can reach the store.

use lumen_a11y::{A11yError, ContrastLevel, FontFamily, LineHeight, Saturation, Spacing, TextSize};
use serde::{Deserialize, Serialize};

use crate::keys::SettingKey;
use crate::{ParseValueError, SettingsError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub text_size: TextSize,
    pub line_height: LineHeight,
    pub letter_spacing: Spacing,
    pub word_spacing: Spacing,
    pub contrast: ContrastLevel,
    pub saturation: Saturation,
    pub font_family: FontFamily,
    pub monochrome: bool,
    pub hide_images: bool,
    pub highlight_titles: bool,
    pub highlight_links: bool,
    pub screen_reader: bool,
}

/// One setting with its new value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    TextSize(TextSize),
    LineHeight(LineHeight),
    LetterSpacing(Spacing),
    WordSpacing(Spacing),
    Contrast(ContrastLevel),
    Saturation(Saturation),
    FontFamily(FontFamily),
    Monochrome(bool),
    HideImages(bool),
    HighlightTitles(bool),
    HighlightLinks(bool),
    ScreenReader(bool),
}

impl SettingChange {
    pub fn key(&self) -> SettingKey {
        match self {
            Self::TextSize(_) => SettingKey::TextSize,
            Self::LineHeight(_) => SettingKey::LineHeight,
            Self::LetterSpacing(_) => SettingKey::LetterSpacing,
            Self::WordSpacing(_) => SettingKey::WordSpacing,
            Self::Contrast(_) => SettingKey::Contrast,
            Self::Saturation(_) => SettingKey::Saturation,
            Self::FontFamily(_) => SettingKey::FontFamily,
            Self::Monochrome(_) => SettingKey::Monochrome,
            Self::HideImages(_) => SettingKey::HideImages,
            Self::HighlightTitles(_) => SettingKey::HighlightTitles,
            Self::HighlightLinks(_) => SettingKey::HighlightLinks,
            Self::ScreenReader(_) => SettingKey::ScreenReader,
        }
    }

    /// Plain string written to storage; booleans as `"true"`/`"false"`
    pub fn stored_value(&self) -> String {
        match *self {
            Self::TextSize(v) => v.to_string(),
            Self::LineHeight(v) => v.to_string(),
            Self::LetterSpacing(v) | Self::WordSpacing(v) => v.to_string(),
            Self::Contrast(v) => v.to_string(),
            Self::Saturation(v) => v.to_string(),
            Self::FontFamily(v) => v.to_string(),
            Self::Monochrome(on)
            | Self::HideImages(on)
            | Self::HighlightTitles(on)
            | Self::HighlightLinks(on)
            | Self::ScreenReader(on) => on.to_string(),
        }
    }
}

impl SettingKey {
    /// Check a stored string against this setting's domain
    pub fn parse_value(self, raw: &str) -> Result<SettingChange, ParseValueError> {
        let invalid = || ParseValueError::InvalidValue {
            key: self.name(),
            value: raw.to_string(),
        };
        let preset = |_: A11yError| invalid();
        let toggle = || match raw.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(invalid()),
        };
        Ok(match self {
            Self::TextSize => SettingChange::TextSize(raw.parse().map_err(preset)?),
            Self::LineHeight => SettingChange::LineHeight(raw.parse().map_err(preset)?),
            Self::LetterSpacing => SettingChange::LetterSpacing(raw.parse().map_err(preset)?),
            Self::WordSpacing => SettingChange::WordSpacing(raw.parse().map_err(preset)?),
            Self::Contrast => SettingChange::Contrast(raw.parse().map_err(preset)?),
            Self::Saturation => SettingChange::Saturation(raw.parse().map_err(preset)?),
            Self::FontFamily => SettingChange::FontFamily(raw.parse().map_err(preset)?),
            Self::Monochrome => SettingChange::Monochrome(toggle()?),
            Self::HideImages => SettingChange::HideImages(toggle()?),
            Self::HighlightTitles => SettingChange::HighlightTitles(toggle()?),
            Self::HighlightLinks => SettingChange::HighlightLinks(toggle()?),
            Self::ScreenReader => SettingChange::ScreenReader(toggle()?),
        })
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Store a new value; true when it differs from the current one
    pub fn apply(&mut self, change: SettingChange) -> bool {
        if self.get(change.key()) == change {
            return false;
        }
        match change {
            SettingChange::TextSize(v) => self.text_size = v,
            SettingChange::LineHeight(v) => self.line_height = v,
            SettingChange::LetterSpacing(v) => self.letter_spacing = v,
            SettingChange::WordSpacing(v) => self.word_spacing = v,
            SettingChange::Contrast(v) => self.contrast = v,
            SettingChange::Saturation(v) => self.saturation = v,
            SettingChange::FontFamily(v) => self.font_family = v,
            SettingChange::Monochrome(on) => self.monochrome = on,
            SettingChange::HideImages(on) => self.hide_images = on,
            SettingChange::HighlightTitles(on) => self.highlight_titles = on,
            SettingChange::HighlightLinks(on) => self.highlight_links = on,
            SettingChange::ScreenReader(on) => self.screen_reader = on,
        }
        true
    }

    /// Current value of `key`
    pub fn get(&self, key: SettingKey) -> SettingChange {
        match key {
            SettingKey::TextSize => SettingChange::TextSize(self.text_size),
            SettingKey::LineHeight => SettingChange::LineHeight(self.line_height),
            SettingKey::LetterSpacing => SettingChange::LetterSpacing(self.letter_spacing),
            SettingKey::WordSpacing => SettingChange::WordSpacing(self.word_spacing),
            SettingKey::Contrast => SettingChange::Contrast(self.contrast),
            SettingKey::Saturation => SettingChange::Saturation(self.saturation),
            SettingKey::FontFamily => SettingChange::FontFamily(self.font_family),
            SettingKey::Monochrome => SettingChange::Monochrome(self.monochrome),
            SettingKey::HideImages => SettingChange::HideImages(self.hide_images),
            SettingKey::HighlightTitles => SettingChange::HighlightTitles(self.highlight_titles),
            SettingKey::HighlightLinks => SettingChange::HighlightLinks(self.highlight_links),
            SettingKey::ScreenReader => SettingChange::ScreenReader(self.screen_reader),
        }
    }

    /// Every value, in apply order
    pub fn values(&self) -> impl Iterator<Item = SettingChange> + '_ {
        SettingKey::ALL.into_iter().map(|key| self.get(key))
    }

    /// Keys whose values differ from `other`
    pub fn diff(&self, other: &Settings) -> Vec<SettingKey> {
        SettingKey::ALL
            .into_iter()
            .filter(|&key| self.get(key) != other.get(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.text_size, TextSize::Default);
        assert_eq!(settings.contrast, ContrastLevel::Default);
        assert_eq!(settings.saturation, Saturation::Normal);
        assert!(!settings.hide_images);
        assert_eq!(settings.values().count(), SettingKey::ALL.len());
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(
            SettingKey::TextSize.parse_value("large"),
            Ok(SettingChange::TextSize(TextSize::Large))
        );
        assert_eq!(
            SettingKey::HideImages.parse_value("true"),
            Ok(SettingChange::HideImages(true))
        );
        assert_eq!(
            SettingKey::TextSize.parse_value("huge"),
            Err(ParseValueError::InvalidValue {
                key: "text-size",
                value: "huge".into()
            })
        );
        assert!(SettingKey::Monochrome.parse_value("yes").is_err());
    }

    #[test]
    fn test_stored_values_parse_back() {
        let mut settings = Settings::default();
        settings.apply(SettingChange::WordSpacing(Spacing::ExtraWide));
        settings.apply(SettingChange::ScreenReader(true));
        for value in settings.values() {
            assert_eq!(value.key().parse_value(&value.stored_value()), Ok(value));
        }
    }

    #[test]
    fn test_apply_reports_change() {
        let mut settings = Settings::default();
        assert!(settings.apply(SettingChange::Contrast(ContrastLevel::Dark)));
        assert!(!settings.apply(SettingChange::Contrast(ContrastLevel::Dark)));
        assert_eq!(settings.diff(&Settings::default()), vec![SettingKey::Contrast]);
    }

    #[test]
    fn test_json() {
        let json = r#"{"textSize":"extra-large","hideImages":true}"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.text_size, TextSize::ExtraLarge);
        assert!(settings.hide_images);
        assert_eq!(settings.line_height, LineHeight::Default);
        assert!(Settings::from_json(r#"{"textSize":"huge"}"#).is_err());
    }
}
