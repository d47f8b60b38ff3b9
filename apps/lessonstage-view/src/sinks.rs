//! # Presentation Surfaces
//!
//! [`StageSink`] implementations for the presenter:
//! - [`TerminalSink`]: streams stage output as text
//! - [`HtmlFileSink`]: keeps a [`PageModel`] and rewrites an HTML file after
//!   every change, so a browser with auto-reload follows the reveal
//! - [`Fanout`]: forwards every call to several sinks

use lessonstage_core::{
    FinalContent, PageModel, StageSink, StageSlot, StageView,
    render::{final_text, stage_text},
};
use std::io::Write;
use std::path::PathBuf;

// =============================================================================
// TERMINAL
// =============================================================================

/// Text rendering of the reveal on any writer.
pub struct TerminalSink<W> {
    out: W,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            tracing::warn!("Cannot write to terminal: {}", e);
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StageSink for TerminalSink<W> {
    fn reset(&mut self) {
        self.emit("Assessment Pipeline\n===================\n");
    }

    fn activate_stage(&mut self, slot: StageSlot) {
        self.emit(&format!("\n▶ {} ...\n", slot));
    }

    fn render_stage(&mut self, slot: StageSlot, view: &StageView<'_>) {
        self.emit(&format!(
            "✔ {} [{}]\n{}",
            slot,
            view.status_label,
            stage_text(view.output)
        ));
    }

    fn reveal_stage_slot(&mut self, slot: StageSlot) {
        self.emit(&format!("\n↓ review failed, continuing to {}\n", slot));
    }

    fn reveal_final(&mut self, content: &FinalContent) {
        self.emit(&format!("\n{}", final_text(content)));
    }

    fn alert(&mut self, message: &str) {
        self.emit(&format!("\n[!] {}\n", message));
    }
}

// =============================================================================
// HTML FILE
// =============================================================================

/// Page model mirrored to an HTML file.
pub struct HtmlFileSink {
    page: PageModel,
    path: PathBuf,
}

impl HtmlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            page: PageModel::new(),
            path: path.into(),
        }
    }

    #[cfg(test)]
    pub fn page(&self) -> &PageModel {
        &self.page
    }

    fn update(&mut self, change: impl FnOnce(&mut PageModel)) {
        change(&mut self.page);
        if let Err(e) = std::fs::write(&self.path, self.page.to_html_document()) {
            tracing::warn!("Cannot write '{}': {}", self.path.display(), e);
        }
    }
}

impl StageSink for HtmlFileSink {
    fn reset(&mut self) {
        self.update(|page| page.reset());
    }

    fn activate_stage(&mut self, slot: StageSlot) {
        self.update(|page| page.activate_stage(slot));
    }

    fn render_stage(&mut self, slot: StageSlot, view: &StageView<'_>) {
        self.update(|page| page.render_stage(slot, view));
    }

    fn reveal_stage_slot(&mut self, slot: StageSlot) {
        self.update(|page| page.reveal_stage_slot(slot));
    }

    fn reveal_final(&mut self, content: &FinalContent) {
        self.update(|page| page.reveal_final(content));
    }

    fn alert(&mut self, message: &str) {
        self.update(|page| page.alert(message));
    }
}

// =============================================================================
// FANOUT
// =============================================================================

/// Several surfaces driven as one.
#[derive(Default)]
pub struct Fanout {
    sinks: Vec<Box<dyn StageSink + Send>>,
}

impl Fanout {
    pub fn push(&mut self, sink: impl StageSink + Send + 'static) {
        self.sinks.push(Box::new(sink));
    }
}

impl StageSink for Fanout {
    fn reset(&mut self) {
        self.sinks.iter_mut().for_each(|s| s.reset());
    }

    fn activate_stage(&mut self, slot: StageSlot) {
        self.sinks.iter_mut().for_each(|s| s.activate_stage(slot));
    }

    fn render_stage(&mut self, slot: StageSlot, view: &StageView<'_>) {
        self.sinks.iter_mut().for_each(|s| s.render_stage(slot, view));
    }

    fn reveal_stage_slot(&mut self, slot: StageSlot) {
        self.sinks.iter_mut().for_each(|s| s.reveal_stage_slot(slot));
    }

    fn reveal_final(&mut self, content: &FinalContent) {
        self.sinks.iter_mut().for_each(|s| s.reveal_final(content));
    }

    fn alert(&mut self, message: &str) {
        self.sinks.iter_mut().for_each(|s| s.alert(message));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use lessonstage_core::{
        AssessmentRequest, Reveal, RevealTiming, render::RAW_VIEW_SUMMARY, run_offline,
    };

    fn reveal_all(sink: &mut impl StageSink) {
        let result = run_offline(AssessmentRequest::new(9, "Angles")).expect("run");
        let mut reveal = Reveal::new(result, RevealTiming::instant()).expect("reveal");
        sink.reset();
        reveal.run_to_end(sink);
    }

    #[test]
    fn test_terminal_sink_streams_every_stage() {
        let mut sink = TerminalSink::new(Vec::new());
        reveal_all(&mut sink);

        let text = String::from_utf8(sink.into_inner()).expect("utf8");
        assert!(text.contains("✔ Stage 1: Content Generation [Completed]"));
        assert!(text.contains("✔ Stage 2: Content Review [FAIL]"));
        assert!(text.contains("↓ review failed"));
        assert!(text.contains("✔ Stage 3: Refined Generation [Completed]"));
        assert!(text.contains("Final Verified Assessment Content"));
        assert_eq!(text.matches(RAW_VIEW_SUMMARY).count(), 3);
    }

    #[test]
    fn test_html_sink_mirrors_page_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("run.html");
        let mut sink = HtmlFileSink::new(&path);
        reveal_all(&mut sink);

        let html = std::fs::read_to_string(&path).expect("read");
        assert_eq!(html, sink.page().to_html_document());
        assert!(sink.page().final_visible);
        assert_eq!(sink.page().rendered_slots().len(), 3);
    }

    #[test]
    fn test_html_sink_survives_unwritable_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = HtmlFileSink::new(dir.path().join("missing").join("run.html"));
        sink.alert("backend down");
        assert_eq!(sink.page().alerts, vec!["backend down".to_string()]);
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("run.html");
        let mut fanout = Fanout::default();
        fanout.push(HtmlFileSink::new(&path));
        fanout.push(TerminalSink::new(std::io::sink()));
        reveal_all(&mut fanout);

        let html = std::fs::read_to_string(&path).expect("read");
        assert!(html.contains("Final Verified Assessment Content"));
    }
}
