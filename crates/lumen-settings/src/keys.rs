//! Storage keys
//!
//! One key per setting, each prefixed with `accessibility-`.

use std::fmt;
use std::str::FromStr;

use crate::ParseValueError;

pub const KEY_PREFIX: &str = "accessibility-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    TextSize,
    LineHeight,
    LetterSpacing,
    WordSpacing,
    Contrast,
    Saturation,
    FontFamily,
    Monochrome,
    HideImages,
    HighlightTitles,
    HighlightLinks,
    ScreenReader,
}

impl SettingKey {
    /// Every key, in the order effects are applied
    pub const ALL: [SettingKey; 12] = [
        SettingKey::TextSize,
        SettingKey::LineHeight,
        SettingKey::LetterSpacing,
        SettingKey::WordSpacing,
        SettingKey::Contrast,
        SettingKey::Saturation,
        SettingKey::FontFamily,
        SettingKey::Monochrome,
        SettingKey::HideImages,
        SettingKey::HighlightTitles,
        SettingKey::HighlightLinks,
        SettingKey::ScreenReader,
    ];

    /// Short name, e.g. `text-size`
    pub fn name(self) -> &'static str {
        match self {
            Self::TextSize => "text-size",
            Self::LineHeight => "line-height",
            Self::LetterSpacing => "letter-spacing",
            Self::WordSpacing => "word-spacing",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::FontFamily => "font-family",
            Self::Monochrome => "monochrome",
            Self::HideImages => "hide-images",
            Self::HighlightTitles => "highlight-titles",
            Self::HighlightLinks => "highlight-links",
            Self::ScreenReader => "screen-reader",
        }
    }

    /// Storage key, e.g. `accessibility-text-size`
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::TextSize => "accessibility-text-size",
            Self::LineHeight => "accessibility-line-height",
            Self::LetterSpacing => "accessibility-letter-spacing",
            Self::WordSpacing => "accessibility-word-spacing",
            Self::Contrast => "accessibility-contrast",
            Self::Saturation => "accessibility-saturation",
            Self::FontFamily => "accessibility-font-family",
            Self::Monochrome => "accessibility-monochrome",
            Self::HideImages => "accessibility-hide-images",
            Self::HighlightTitles => "accessibility-highlight-titles",
            Self::HighlightLinks => "accessibility-highlight-links",
            Self::ScreenReader => "accessibility-screen-reader",
        }
    }

    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            Self::Monochrome
                | Self::HideImages
                | Self::HighlightTitles
                | Self::HighlightLinks
                | Self::ScreenReader
        )
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SettingKey {
    type Err = ParseValueError;

    /// Accepts the short name or the full storage key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix(KEY_PREFIX).unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|key| key.name() == name)
            .ok_or_else(|| ParseValueError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_are_prefixed_names() {
        for key in SettingKey::ALL {
            assert_eq!(key.storage_key(), format!("{KEY_PREFIX}{}", key.name()));
        }
    }

    #[test]
    fn test_parse_key() {
        assert_eq!("hide-images".parse(), Ok(SettingKey::HideImages));
        assert_eq!("accessibility-text-size".parse(), Ok(SettingKey::TextSize));
        assert_eq!(
            "zoom".parse::<SettingKey>(),
            Err(ParseValueError::UnknownKey("zoom".into()))
        );
    }

    #[test]
    fn test_toggles() {
        let toggles = SettingKey::ALL.iter().filter(|k| k.is_toggle()).count();
        assert_eq!(toggles, 5);
        assert!(!SettingKey::Contrast.is_toggle());
    }
}
