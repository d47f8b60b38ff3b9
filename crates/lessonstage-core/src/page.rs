//! # Page Model
//!
//! In-memory model of the pipeline page: three stage slots, the arrow leading
//! to the optional third slot, the final panel and any alerts. It implements
//! [`StageSink`] and can serialize itself to a standalone HTML document.

use crate::primitives::{CLASS_PROCESSING, STATUS_GENERATING, STATUS_WAITING};
use crate::render::{escape_html, final_html, stage_html};
use crate::sink::{StageSink, StageView};
use crate::system::StageSlot;
use crate::types::FinalContent;
use serde::{Deserialize, Serialize};

/// Visible state of one stage slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotState {
    pub visible: bool,
    pub active: bool,
    pub status_text: String,
    pub status_class: String,
    pub content_html: String,
}

impl SlotState {
    fn processing(status_text: &str, visible: bool) -> Self {
        Self {
            visible,
            active: false,
            status_text: status_text.to_string(),
            status_class: CLASS_PROCESSING.to_string(),
            content_html: String::new(),
        }
    }
}

/// The whole presentation surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageModel {
    pub pipeline_visible: bool,
    pub slots: [SlotState; 3],
    /// Connector between stage 2 and stage 3.
    pub refinement_arrow_visible: bool,
    pub final_visible: bool,
    pub final_html: String,
    pub alerts: Vec<String>,
}

impl Default for PageModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PageModel {
    /// A page in its pre-run state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pipeline_visible: true,
            slots: [
                SlotState::processing(STATUS_GENERATING, true),
                SlotState::processing(STATUS_WAITING, true),
                SlotState::processing(STATUS_WAITING, false),
            ],
            refinement_arrow_visible: false,
            final_visible: false,
            final_html: String::new(),
            alerts: Vec::new(),
        }
    }

    #[must_use]
    pub fn slot(&self, slot: StageSlot) -> &SlotState {
        &self.slots[slot.step_index()]
    }

    fn slot_mut(&mut self, slot: StageSlot) -> &mut SlotState {
        &mut self.slots[slot.step_index()]
    }

    /// Slots whose content has been rendered.
    #[must_use]
    pub fn rendered_slots(&self) -> Vec<StageSlot> {
        StageSlot::ALL
            .into_iter()
            .filter(|s| !self.slot(*s).content_html.is_empty())
            .collect()
    }

    /// Standalone HTML document of the current page state.
    #[must_use]
    pub fn to_html_document(&self) -> String {
        let mut body = String::new();
        if self.pipeline_visible {
            body.push_str(r#"<section id="pipeline-visualization">"#);
            for slot in StageSlot::ALL {
                let state = self.slot(slot);
                if slot.is_optional() && self.refinement_arrow_visible {
                    body.push_str(r#"<div class="arrow" id="arrow-2">↓</div>"#);
                }
                if !state.visible {
                    continue;
                }
                let active = if state.active { " active-step" } else { "" };
                body.push_str(&format!(
                    r#"<div class="step{}" id="step-{n}"><h2>{}</h2><span class="status-badge {}" id="step-{n}-status">{}</span><div id="step-{n}-content">{}</div></div>"#,
                    active,
                    escape_html(slot.name()),
                    escape_html(&state.status_class),
                    escape_html(&state.status_text),
                    state.content_html,
                    n = slot.number(),
                ));
            }
            body.push_str("</section>");
        }
        if self.final_visible {
            body.push_str(&format!(
                r#"<section id="final-output"><div id="final-content-display">{}</div></section>"#,
                self.final_html
            ));
        }
        for alert in &self.alerts {
            body.push_str(&format!(
                r#"<div class="alert" role="alert">{}</div>"#,
                escape_html(alert)
            ));
        }
        format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Assessment Pipeline</title></head><body>{}</body></html>\n",
            body
        )
    }
}

impl StageSink for PageModel {
    fn reset(&mut self) {
        let alerts = std::mem::take(&mut self.alerts);
        *self = Self::new();
        self.alerts = alerts;
    }

    fn activate_stage(&mut self, slot: StageSlot) {
        for state in &mut self.slots {
            state.active = false;
        }
        self.slot_mut(slot).active = true;
    }

    fn render_stage(&mut self, slot: StageSlot, view: &StageView<'_>) {
        let state = self.slot_mut(slot);
        state.status_text = view.status_label.clone();
        state.status_class = view.status_class.clone();
        state.content_html = stage_html(view.output);
    }

    fn reveal_stage_slot(&mut self, slot: StageSlot) {
        self.slot_mut(slot).visible = true;
        if slot.is_optional() {
            self.refinement_arrow_visible = true;
        }
    }

    fn reveal_final(&mut self, content: &FinalContent) {
        self.final_visible = true;
        self.final_html = final_html(content);
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

// =============================================================================
// TESTS
// =============================================================================
