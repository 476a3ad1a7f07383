//! Speech synthesis
//!
//! A narrow capability interface over the host's text-to-speech engine.
//! `Speaker` wraps an optional backend: when none is installed every call
//! logs a warning and does nothing.

use std::cell::RefCell;
use std::rc::Rc;

/// A synthesis voice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 language tag
    pub lang: String,
    /// Runs on-device rather than through a network service
    pub local_service: bool,
    pub default: bool,
}

impl Voice {
    pub fn new(name: &str, lang: &str, local_service: bool) -> Self {
        Self {
            name: name.to_string(),
            lang: lang.to_string(),
            local_service,
            default: false,
        }
    }

    fn is_english(&self) -> bool {
        self.lang.to_ascii_lowercase().starts_with("en")
    }
}

/// Text queued for speaking
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    /// Voice name, `None` for the backend default
    pub voice: Option<String>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            lang: "en-US".to_string(),
            voice: None,
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Text-to-speech backend
pub trait SpeechSynthesis {
    fn speak(&mut self, utterance: Utterance);

    /// Drop the current and all queued utterances
    fn cancel(&mut self);

    fn voices(&self) -> Vec<Voice>;

    fn is_speaking(&self) -> bool;
}

/// Backend that accepts everything and says nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpeech;

impl SpeechSynthesis for NullSpeech {
    fn speak(&mut self, _utterance: Utterance) {}

    fn cancel(&mut self) {}

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn is_speaking(&self) -> bool {
        false
    }
}

/// A call made on a `RecordingSpeech`
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Speak(Utterance),
    Cancel,
}

/// Backend that records every call; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingSpeech {
    events: Rc<RefCell<Vec<SpeechEvent>>>,
    voices: Vec<Voice>,
}

impl RecordingSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            events: Rc::default(),
            voices,
        }
    }

    pub fn events(&self) -> Vec<SpeechEvent> {
        self.events.borrow().clone()
    }

    /// Texts passed to `speak`, in order
    pub fn spoken(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                SpeechEvent::Speak(u) => Some(u.text.clone()),
                SpeechEvent::Cancel => None,
            })
            .collect()
    }

    pub fn last_spoken(&self) -> Option<String> {
        self.spoken().pop()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl SpeechSynthesis for RecordingSpeech {
    fn speak(&mut self, utterance: Utterance) {
        self.events.borrow_mut().push(SpeechEvent::Speak(utterance));
    }

    fn cancel(&mut self) {
        self.events.borrow_mut().push(SpeechEvent::Cancel);
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn is_speaking(&self) -> bool {
        // Utterances are "spoken" instantly
        false
    }
}

/// Pick an English voice, preferring on-device ones
pub fn preferred_voice(voices: &[Voice]) -> Option<&Voice> {
    voices
        .iter()
        .find(|v| v.is_english() && v.local_service)
        .or_else(|| voices.iter().find(|v| v.is_english()))
}

/// Optional backend plus the chosen voice
#[derive(Default)]
pub struct Speaker {
    backend: Option<Box<dyn SpeechSynthesis>>,
    voice: Option<Voice>,
}

impl std::fmt::Debug for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Speaker")
            .field("available", &self.backend.is_some())
            .field("voice", &self.voice)
            .finish()
    }
}

impl Speaker {
    pub fn new(backend: Option<Box<dyn SpeechSynthesis>>) -> Self {
        Self {
            backend,
            voice: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn voice(&self) -> Option<&Voice> {
        self.voice.as_ref()
    }

    /// Load the voice list and remember the preferred voice
    pub fn prewarm(&mut self) {
        let Some(backend) = self.backend.as_ref() else {
            tracing::warn!("speech synthesis not supported");
            return;
        };
        let voices = backend.voices();
        self.voice = preferred_voice(&voices).cloned();
        tracing::debug!(
            count = voices.len(),
            voice = ?self.voice.as_ref().map(|v| &v.name),
            "speech voices loaded"
        );
    }

    /// Speak `text`; `interrupt` cancels whatever is in progress first
    pub fn speak(&mut self, text: &str, interrupt: bool) {
        let Some(backend) = self.backend.as_mut() else {
            tracing::warn!("speech synthesis not supported");
            return;
        };
        if interrupt {
            backend.cancel();
        }
        let mut utterance = Utterance::new(text);
        if let Some(voice) = &self.voice {
            utterance.voice = Some(voice.name.clone());
            utterance.lang = voice.lang.clone();
        }
        backend.speak(utterance);
    }

    pub fn cancel(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.cancel();
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.backend.as_ref().is_some_and(|b| b.is_speaking())
    }
}
