//! Environment probing
//!
//! Best-effort guesses from the navigator strings. Nothing here has side
//! effects and nothing can fail; unknown inputs map to `Unknown`/`None`.

use std::fmt;

use lumen_dom::Navigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserKind {
    Edge,
    Opera,
    Chrome,
    Firefox,
    Safari,
    Unknown,
}

impl BrowserKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edge => "Edge",
            Self::Opera => "Opera",
            Self::Chrome => "Chrome",
            Self::Firefox => "Firefox",
            Self::Safari => "Safari",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Browser family and major version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserInfo {
    pub kind: BrowserKind,
    pub version: Option<u32>,
}

impl BrowserInfo {
    pub const UNKNOWN: BrowserInfo = BrowserInfo {
        kind: BrowserKind::Unknown,
        version: None,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenReaderKind {
    Jaws,
    Nvda,
    Narrator,
    VoiceOver,
    TalkBack,
    Orca,
}

impl ScreenReaderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jaws => "JAWS",
            Self::Nvda => "NVDA",
            Self::Narrator => "Narrator",
            Self::VoiceOver => "VoiceOver",
            Self::TalkBack => "TalkBack",
            Self::Orca => "Orca",
        }
    }
}

impl fmt::Display for ScreenReaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leading digits after `token` in the user agent
fn version_after(ua: &str, token: &str) -> Option<u32> {
    let start = ua.find(token)? + token.len();
    let digits: String = ua[start..].chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Chromium derivatives are checked before Chrome, Chrome before Safari
pub fn detect_browser(navigator: &Navigator) -> BrowserInfo {
    let ua = navigator.user_agent.as_str();
    let (kind, token) = if ua.contains("Edg/") {
        (BrowserKind::Edge, "Edg/")
    } else if ua.contains("OPR/") {
        (BrowserKind::Opera, "OPR/")
    } else if ua.contains("Opera") {
        (BrowserKind::Opera, "Version/")
    } else if ua.contains("Chrome/") {
        (BrowserKind::Chrome, "Chrome/")
    } else if ua.contains("Firefox/") {
        (BrowserKind::Firefox, "Firefox/")
    } else if ua.contains("Safari/") && ua.contains("Version/") {
        (BrowserKind::Safari, "Version/")
    } else {
        return BrowserInfo::UNKNOWN;
    };
    BrowserInfo {
        kind,
        version: version_after(ua, token),
    }
}

/// Likely screen reader for this platform; explicit UA hints win
pub fn detect_likely_screen_reader(navigator: &Navigator) -> Option<ScreenReaderKind> {
    let ua = navigator.user_agent.as_str();
    let platform = navigator.platform.as_str();

    for (hint, kind) in [
        ("JAWS", ScreenReaderKind::Jaws),
        ("NVDA", ScreenReaderKind::Nvda),
        ("Orca", ScreenReaderKind::Orca),
    ] {
        if ua.contains(hint) {
            return Some(kind);
        }
    }

    let has = |needle: &str| ua.contains(needle) || platform.contains(needle);
    if has("Android") {
        Some(ScreenReaderKind::TalkBack)
    } else if has("Mac") || has("iPhone") || has("iPad") {
        Some(ScreenReaderKind::VoiceOver)
    } else if has("Win") {
        if detect_browser(navigator).kind == BrowserKind::Edge {
            Some(ScreenReaderKind::Narrator)
        } else {
            Some(ScreenReaderKind::Nvda)
        }
    } else if has("Linux") {
        Some(ScreenReaderKind::Orca)
    } else {
        None
    }
}
