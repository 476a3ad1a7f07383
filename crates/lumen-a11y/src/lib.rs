//! Lumen Accessibility
//!
//! Document-wide accessibility effects for an arbitrary host page.
//!
//! Features:
//! - Typography variables, color filters, contrast palettes and font family
//! - Heading/link highlighting
//! - Image hiding with placeholders, kept current by a mutation watcher
//! - Reversible screen-reader mode (ARIA, skip links, landmarks, focus styles)
//! - Live-region announcer with optional speech synthesis
//! - Focus reading and keyboard shortcuts

pub mod announcer;
pub mod aria;
pub mod contrast;
pub mod engine;
pub mod enhance;
pub mod environment;
pub mod focus_reading;
pub mod highlight;
pub mod images;
pub mod landmarks;
pub mod name;
pub mod scheduler;
pub mod screen_reader;
pub mod skip_links;
pub mod snapshot;
pub mod speech;
pub mod styles;
pub mod values;
pub mod watcher;

pub use announcer::{AnnouncePolicy, AnnouncerOptions};
pub use aria::AriaRole;
pub use engine::AccessibilityEngine;
pub use environment::{BrowserInfo, BrowserKind, ScreenReaderKind};
pub use highlight::HighlightColors;
pub use scheduler::{Scheduler, Task};
pub use screen_reader::ScreenReaderConfig;
pub use speech::{NullSpeech, RecordingSpeech, SpeechEvent, SpeechSynthesis, Utterance, Voice};
pub use values::{ContrastLevel, FontFamily, LineHeight, Priority, Saturation, Spacing, TextSize};

/// Accessibility error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum A11yError {
    #[error("invalid {kind} value: {value:?}")]
    InvalidValue { kind: &'static str, value: String },

    #[error("invalid ARIA role: {0}")]
    InvalidRole(String),
}
