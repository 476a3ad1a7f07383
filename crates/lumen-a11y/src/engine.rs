//! Accessibility engine
//!
//! Owns the window plus every piece of state the effects need: the
//! speech backend, the scheduler, announcer flags, the image map, the
//! mutation watcher, focus reading and the screen-reader session. Every
//! entry point returns early when the window has no document.

use lumen_dom::{Document, UiEvent, Window};

use crate::announcer::{AnnouncePolicy, Announcer, AnnouncerOptions};
use crate::contrast;
use crate::enhance::enhance_aria;
use crate::environment::{self, BrowserInfo, ScreenReaderKind};
use crate::focus_reading::{DEFAULT_SETTLE_DELAY_MS, FocusReader};
use crate::highlight::{self, HighlightColors};
use crate::images::ImageVisibility;
use crate::landmarks::apply_landmarks;
use crate::scheduler::{Scheduler, Task};
use crate::screen_reader::{
    ScreenReaderConfig, ScreenReaderSession, apply_focus_styles, mark_body, remove_focus_styles,
};
use crate::skip_links::{activate_skip_link, create_skip_links};
use crate::speech::{Speaker, SpeechSynthesis};
use crate::styles;
use crate::values::{ContrastLevel, FontFamily, LineHeight, Priority, Saturation, Spacing, TextSize};
use crate::watcher::MutationWatcher;

pub const ENABLED_MESSAGE: &str = "Screen reader mode enabled";
pub const DISABLED_MESSAGE: &str = "Screen reader mode disabled";

/// Document-wide accessibility effects
#[derive(Debug, Default)]
pub struct AccessibilityEngine {
    window: Window,
    speaker: Speaker,
    scheduler: Scheduler,
    announcer: Announcer,
    images: ImageVisibility,
    watcher: MutationWatcher,
    focus_reader: FocusReader,
    session: Option<ScreenReaderSession>,
}

impl AccessibilityEngine {
    /// Engine over `window` without speech synthesis
    pub fn new(window: Window) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    pub fn with_speech(mut self, backend: Box<dyn SpeechSynthesis>) -> Self {
        self.speaker = Speaker::new(Some(backend));
        self
    }

    pub fn with_policy(mut self, policy: AnnouncePolicy) -> Self {
        self.announcer = Announcer::new(policy);
        self
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn document(&self) -> Option<&Document> {
        self.window.document()
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.window.document_mut()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn images(&self) -> &ImageVisibility {
        &self.images
    }

    // ------------------------------------------------------------------
    // Style effects
    // ------------------------------------------------------------------

    pub fn apply_typography_var(&mut self, name: &str, scale: f64) {
        if let Some(doc) = self.window.document_mut() {
            styles::apply_typography_var(doc, name, scale);
        }
    }

    pub fn apply_text_size(&mut self, size: TextSize) {
        if let Some(doc) = self.window.document_mut() {
            styles::apply_text_size(doc, size);
        }
    }

    pub fn apply_line_height(&mut self, height: LineHeight) {
        if let Some(doc) = self.window.document_mut() {
            styles::apply_line_height(doc, height);
        }
    }

    pub fn apply_letter_spacing(&mut self, spacing: Spacing) {
        if let Some(doc) = self.window.document_mut() {
            styles::apply_letter_spacing(doc, spacing);
        }
    }

    pub fn apply_word_spacing(&mut self, spacing: Spacing) {
        if let Some(doc) = self.window.document_mut() {
            styles::apply_word_spacing(doc, spacing);
        }
    }

    pub fn apply_filters(&mut self, monochrome: bool, saturation: Saturation) {
        if let Some(doc) = self.window.document_mut() {
            styles::apply_filters(doc, monochrome, saturation);
        }
    }

    pub fn apply_contrast(&mut self, level: ContrastLevel) {
        if let Some(doc) = self.window.document_mut() {
            contrast::apply_contrast(doc, level);
        }
    }

    pub fn apply_highlight_titles(&mut self, enabled: bool, colors: &HighlightColors) {
        if let Some(doc) = self.window.document_mut() {
            highlight::apply_highlight_titles(doc, enabled, colors);
        }
    }

    pub fn apply_highlight_links(&mut self, enabled: bool, colors: &HighlightColors) {
        if let Some(doc) = self.window.document_mut() {
            highlight::apply_highlight_links(doc, enabled, colors);
        }
    }

    pub fn apply_font_family(&mut self, family: FontFamily) {
        if let Some(doc) = self.window.document_mut() {
            styles::apply_font_family(doc, family);
        }
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    /// Hide or restore images; the mutation watcher follows the setting
    pub fn apply_hide_images(&mut self, enabled: bool) {
        let Some(doc) = self.window.document_mut() else {
            return;
        };
        self.images.apply(doc, enabled);
        if enabled {
            self.watcher.watch(doc);
        } else {
            self.watcher.cancel(doc);
        }
    }

    pub fn is_watching_images(&self) -> bool {
        self.watcher.is_watching()
    }

    /// Handle queued DOM mutations; returns how many images were hidden
    pub fn process_mutations(&mut self) -> usize {
        let Some(doc) = self.window.document_mut() else {
            return 0;
        };
        self.watcher.process(doc, &mut self.images)
    }

    // ------------------------------------------------------------------
    // Screen-reader mode
    // ------------------------------------------------------------------

    pub fn is_screen_reader_mode_enabled(&self) -> bool {
        self.session.is_some()
    }

    /// Enter screen-reader mode; calling again reuses the current session
    pub fn enable_screen_reader_mode(&mut self, config: ScreenReaderConfig) {
        let Some(doc) = self.window.document_mut() else {
            return;
        };
        let session = self
            .session
            .get_or_insert_with(|| ScreenReaderSession::new(config.clone()));
        session.config = config.clone();

        mark_body(doc, true);
        if config.enhanced_aria {
            enhance_aria(doc, session);
        }
        if config.skip_links {
            create_skip_links(doc, session);
        }
        if config.enhanced_focus {
            apply_focus_styles(doc, session);
        }
        if config.landmark_roles {
            apply_landmarks(doc, session);
        }
        if config.live_regions {
            let (container, created) = self.announcer.ensure_regions(doc);
            if created {
                session.created.track(&doc.tree, container);
            }
        }
        if config.read_on_focus && self.announcer.speech_enabled() {
            self.focus_reader
                .enable(doc, config.keyboard_shortcuts, config.announcement_delay_ms);
        }

        tracing::info!(
            recorded = session.snapshot.len(),
            created = session.created.len(),
            "screen reader mode enabled"
        );
        self.announcer.announce(
            doc,
            &mut self.scheduler,
            &mut self.speaker,
            ENABLED_MESSAGE,
            Priority::Polite,
        );
    }

    /// Leave screen-reader mode, restoring the page; no-op when off
    pub fn disable_screen_reader_mode(&mut self) {
        let Some(doc) = self.window.document_mut() else {
            return;
        };
        let Some(mut session) = self.session.take() else {
            return;
        };

        mark_body(doc, false);
        session.snapshot.restore(&mut doc.tree);
        session.created.remove_all(&mut doc.tree);
        remove_focus_styles(doc);
        if let Some(listener) = session.skip_listener.take() {
            doc.remove_event_listener(listener);
        }
        self.focus_reader
            .disable(doc, &mut self.scheduler, &mut self.speaker);

        tracing::info!("screen reader mode disabled");
        self.announcer.announce(
            doc,
            &mut self.scheduler,
            &mut self.speaker,
            DISABLED_MESSAGE,
            Priority::Polite,
        );
    }

    // ------------------------------------------------------------------
    // Announcer and speech
    // ------------------------------------------------------------------

    /// Create the live regions and set announcer flags
    pub fn initialize_announcer(&mut self, options: AnnouncerOptions) {
        let Some(doc) = self.window.document_mut() else {
            return;
        };
        // An initialized announcer outlives screen-reader mode
        let (container, _) = self.announcer.ensure_regions(doc);
        if let Some(session) = self.session.as_mut() {
            session.created.forget(container);
        }
        self.announcer.set_debug(options.debug);
        self.set_speech_synthesis(options.use_speech_synthesis);
    }

    pub fn announce(&mut self, message: &str, priority: Priority) {
        let Some(doc) = self.window.document_mut() else {
            return;
        };
        self.announcer
            .announce(doc, &mut self.scheduler, &mut self.speaker, message, priority);
    }

    pub fn set_debug_mode(&mut self, debug: bool) {
        self.announcer.set_debug(debug);
    }

    pub fn is_speech_enabled(&self) -> bool {
        self.announcer.speech_enabled()
    }

    /// Turning speech off also stops focus reading
    pub fn set_speech_synthesis(&mut self, enabled: bool) {
        self.announcer.set_speech_enabled(enabled);
        if enabled {
            self.speaker.prewarm();
        } else if let Some(doc) = self.window.document_mut() {
            self.focus_reader
                .disable(doc, &mut self.scheduler, &mut self.speaker);
        }
    }

    // ------------------------------------------------------------------
    // Focus reading
    // ------------------------------------------------------------------

    pub fn is_focus_reading_enabled(&self) -> bool {
        self.focus_reader.is_enabled()
    }

    /// Start focus reading; false while speech synthesis is off
    pub fn enable_focus_reading(&mut self) -> bool {
        let Some(doc) = self.window.document_mut() else {
            return false;
        };
        if !self.announcer.speech_enabled() {
            tracing::debug!("focus reading needs speech synthesis");
            return false;
        }
        let (shortcuts, delay) = self
            .session
            .as_ref()
            .map_or((true, DEFAULT_SETTLE_DELAY_MS), |s| {
                (s.config.keyboard_shortcuts, s.config.announcement_delay_ms)
            });
        self.focus_reader.enable(doc, shortcuts, delay);
        true
    }

    pub fn disable_focus_reading(&mut self) {
        if let Some(doc) = self.window.document_mut() {
            self.focus_reader
                .disable(doc, &mut self.scheduler, &mut self.speaker);
        }
    }

    // ------------------------------------------------------------------
    // Events and time
    // ------------------------------------------------------------------

    /// Route a host event to whichever feature listens for it
    pub fn handle_event(&mut self, event: &UiEvent) -> bool {
        let Some(doc) = self.window.document_mut() else {
            return false;
        };
        let skip_listener = self.session.as_ref().and_then(|s| s.skip_listener);
        let mut handled = false;
        for listener in doc.listeners_for(event) {
            if self.focus_reader.owns(listener) {
                handled |= match event {
                    UiEvent::FocusIn { target } => {
                        self.focus_reader.on_focus(doc, &mut self.scheduler, *target)
                    }
                    UiEvent::KeyDown { event, .. } => {
                        self.focus_reader.on_key(doc, &mut self.speaker, event)
                    }
                    UiEvent::Click { .. } => false,
                };
            } else if skip_listener == Some(listener) {
                if let UiEvent::Click { target } = event {
                    handled |= activate_skip_link(doc, *target);
                }
            }
        }
        handled
    }

    /// Deliver events raised by the engine itself, such as focus moves
    pub fn dispatch_pending_events(&mut self) -> usize {
        let Some(doc) = self.window.document_mut() else {
            return 0;
        };
        let events = doc.take_pending_events();
        events.iter().filter(|event| self.handle_event(event)).count()
    }

    /// One animation frame: pending events, mutations, then due tasks
    pub fn run_frame(&mut self) {
        self.dispatch_pending_events();
        self.process_mutations();
        let tasks = self.scheduler.run_frame();
        self.run_tasks(tasks);
    }

    /// Advance the virtual clock and run expired timers
    pub fn advance_time(&mut self, ms: u64) {
        let tasks = self.scheduler.advance_time(ms);
        self.run_tasks(tasks);
    }

    fn run_tasks(&mut self, tasks: Vec<Task>) {
        let Some(doc) = self.window.document_mut() else {
            return;
        };
        for task in tasks {
            match task {
                Task::CommitAnnouncement { priority, message } => {
                    self.announcer
                        .commit(doc, &mut self.scheduler, priority, &message);
                }
                Task::ClearAnnouncement {
                    priority,
                    generation,
                } => self.announcer.clear(doc, priority, generation),
                Task::RemoveToast { generation } => self.announcer.remove_toast(doc, generation),
                Task::ReadFocus { target } => {
                    self.focus_reader.read_focus(doc, &mut self.speaker, target);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Environment
    // ------------------------------------------------------------------

    pub fn detect_browser(&self) -> BrowserInfo {
        if self.window.document().is_none() {
            return BrowserInfo::UNKNOWN;
        }
        environment::detect_browser(self.window.navigator())
    }

    pub fn detect_likely_screen_reader(&self) -> Option<ScreenReaderKind> {
        self.window.document()?;
        environment::detect_likely_screen_reader(self.window.navigator())
    }

    /// Tear down watchers and listeners owned by the engine
    pub fn unmount(&mut self) {
        let Some(doc) = self.window.document_mut() else {
            return;
        };
        self.watcher.cancel(doc);
        self.focus_reader
            .disable(doc, &mut self.scheduler, &mut self.speaker);
        tracing::debug!("engine unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::RecordingSpeech;
    use lumen_dom::Navigator;

    #[test]
    fn test_headless_is_inert() {
        let mut engine = AccessibilityEngine::new(Window::headless());
        engine.apply_text_size(TextSize::Large);
        engine.apply_contrast(ContrastLevel::Dark);
        engine.apply_hide_images(true);
        engine.enable_screen_reader_mode(ScreenReaderConfig::default());
        engine.announce("Hello", Priority::Assertive);
        engine.run_frame();
        engine.advance_time(10_000);

        assert!(!engine.is_screen_reader_mode_enabled());
        assert!(!engine.is_watching_images());
        assert!(!engine.enable_focus_reading());
        assert_eq!(engine.detect_browser(), BrowserInfo::UNKNOWN);
        assert_eq!(engine.detect_likely_screen_reader(), None);
    }

    #[test]
    fn test_disable_without_enable_is_noop() {
        let mut engine = AccessibilityEngine::new(Window::with_document(Document::default()));
        engine.disable_screen_reader_mode();
        engine.disable_screen_reader_mode();
        let doc = engine.document().unwrap();
        assert!(doc.get_element_by_id(crate::announcer::ANNOUNCER_ID).is_none());
    }

    #[test]
    fn test_speech_toggle_gates_focus_reading() {
        let recording = RecordingSpeech::new();
        let mut engine = AccessibilityEngine::new(Window::with_document(Document::default()))
            .with_speech(Box::new(recording.clone()));

        assert!(!engine.enable_focus_reading());
        engine.set_speech_synthesis(true);
        assert!(engine.enable_focus_reading());
        assert!(engine.is_focus_reading_enabled());

        engine.set_speech_synthesis(false);
        assert!(!engine.is_focus_reading_enabled());
        assert!(recording.events().contains(&crate::speech::SpeechEvent::Cancel));
    }

    #[test]
    fn test_environment_uses_navigator() {
        let window = Window::new(
            Document::default(),
            Navigator::new("Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0"),
        );
        let engine = AccessibilityEngine::new(window);
        assert_eq!(engine.detect_browser().kind, crate::environment::BrowserKind::Firefox);
        assert_eq!(engine.detect_likely_screen_reader(), Some(ScreenReaderKind::Orca));
    }
}
