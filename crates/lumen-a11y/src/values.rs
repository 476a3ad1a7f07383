//! Setting values
//!
//! Closed enumerations for every non-boolean preference, with their
//! string forms and the scale factors they map to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::A11yError;

macro_rules! setting_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default = $default:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const DEFAULT: $name = $name::$default;

            /// Every legal value, in display order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::DEFAULT
            }
        }

        impl FromStr for $name {
            type Err = A11yError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(A11yError::InvalidValue {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

setting_enum! {
    /// Text size preset
    TextSize, "text size", default = Default {
        Small => "small",
        Default => "default",
        Large => "large",
        ExtraLarge => "extra-large",
    }
}

setting_enum! {
    /// Line height preset
    LineHeight, "line height", default = Default {
        Tight => "tight",
        Default => "default",
        Relaxed => "relaxed",
        Loose => "loose",
    }
}

setting_enum! {
    /// Letter or word spacing preset
    Spacing, "spacing", default = Default {
        Tight => "tight",
        Default => "default",
        Wide => "wide",
        ExtraWide => "extra-wide",
    }
}

setting_enum! {
    /// Contrast palette
    ContrastLevel, "contrast", default = Default {
        Default => "default",
        Low => "low",
        High => "high",
        Dark => "dark",
    }
}

setting_enum! {
    Saturation, "saturation", default = Normal {
        Normal => "normal",
        Low => "low",
        High => "high",
    }
}

setting_enum! {
    FontFamily, "font family", default = Default {
        Default => "default",
        Serif => "serif",
        SansSerif => "sans-serif",
        Monospace => "monospace",
        Dyslexic => "dyslexic",
    }
}

setting_enum! {
    /// Announcement urgency, mapped to the polite/assertive live regions
    Priority, "priority", default = Polite {
        Polite => "polite",
        Assertive => "assertive",
    }
}

impl TextSize {
    pub fn scale(self) -> f64 {
        match self {
            Self::Small => 0.875,
            Self::Default => 1.0,
            Self::Large => 1.25,
            Self::ExtraLarge => 1.5,
        }
    }
}

impl LineHeight {
    pub fn scale(self) -> f64 {
        match self {
            Self::Tight => 0.75,
            Self::Default => 1.0,
            Self::Relaxed => 1.5,
            Self::Loose => 2.0,
        }
    }
}

impl Spacing {
    pub fn scale(self) -> f64 {
        match self {
            Self::Tight => 0.5,
            Self::Default => 1.0,
            Self::Wide => 1.5,
            Self::ExtraWide => 2.0,
        }
    }
}

impl FontFamily {
    /// CSS font stack, `None` for the page's own fonts
    pub fn stack(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::Serif => Some("Georgia, \"Times New Roman\", Times, serif"),
            Self::SansSerif => Some("Arial, Helvetica, sans-serif"),
            Self::Monospace => Some("\"Courier New\", Courier, monospace"),
            Self::Dyslexic => Some("\"OpenDyslexic\", \"Comic Sans MS\", Verdana, sans-serif"),
        }
    }
}

impl Saturation {
    /// `saturate()` argument, `None` for normal
    pub fn factor(self) -> Option<f64> {
        match self {
            Self::Normal => None,
            Self::Low => Some(0.5),
            Self::High => Some(1.5),
        }
    }
}

/// Parse `raw`, falling back to the default value for anything unknown
pub fn parse_or_default<T: FromStr + Copy>(raw: &str, default: T) -> T {
    raw.parse().unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_strings() {
        for size in TextSize::ALL {
            assert_eq!(size.as_str().parse::<TextSize>(), Ok(*size));
        }
        assert_eq!("extra-wide".parse::<Spacing>(), Ok(Spacing::ExtraWide));
        assert_eq!(FontFamily::SansSerif.to_string(), "sans-serif");
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        assert_eq!(
            "huge".parse::<TextSize>(),
            Err(A11yError::InvalidValue {
                kind: "text size",
                value: "huge".into()
            })
        );
        assert_eq!(parse_or_default("huge", TextSize::DEFAULT), TextSize::Default);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Saturation::DEFAULT, Saturation::Normal);
        assert_eq!(ContrastLevel::DEFAULT, ContrastLevel::Default);
        assert_eq!(TextSize::DEFAULT.scale(), 1.0);
    }

    #[test]
    fn test_scales() {
        assert_eq!(TextSize::Small.scale(), 0.875);
        assert_eq!(LineHeight::Loose.scale(), 2.0);
        assert_eq!(Spacing::Tight.scale(), 0.5);
        assert_eq!(Saturation::High.factor(), Some(1.5));
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        let json = serde_json::to_string(&TextSize::ExtraLarge).unwrap();
        assert_eq!(json, "\"extra-large\"");
        let family: FontFamily = serde_json::from_str("\"sans-serif\"").unwrap();
        assert_eq!(family, FontFamily::SansSerif);
    }
}
