//! End-to-end reveal scenarios against the page model.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use lessonstage_core::{
    PageModel, PipelineResult, Reveal, RevealTiming, StageSink, StageSlot,
    primitives::{CLASS_PROCESSING, STATUS_GENERATING, STATUS_WAITING},
    run_offline, AssessmentRequest,
};
use serde_json::json;

fn scenario_result() -> PipelineResult {
    serde_json::from_value(json!({
        "steps": [
            {"explanation": "E1", "mcqs": [{"question": "Q1", "options": ["A", "B"], "answer": "A"}]},
            {"status": "pass", "feedback": []}
        ],
        "refined": false,
        "final_content": {
            "explanation": "Final",
            "mcqs": [{"question": "Q1", "options": ["A", "B"], "answer": "A"}]
        }
    }))
    .unwrap()
}

// =============================================================================
// SCENARIO: UNREFINED RUN
// =============================================================================

#[test]
fn test_unrefined_scenario_renders_two_stages_and_final() {
    let mut page = PageModel::new();
    let mut reveal = Reveal::new(scenario_result(), RevealTiming::default()).unwrap();

    // Stage 1 active, nothing rendered yet.
    reveal.advance(&mut page);
    assert!(page.slot(StageSlot::Generation).active);
    assert!(page.rendered_slots().is_empty());

    // Stage 1 done, stage 2 active.
    reveal.advance(&mut page);
    let stage1 = page.slot(StageSlot::Generation);
    assert_eq!(stage1.status_text, "Completed");
    assert!(stage1.content_html.contains("<p>E1</p>"));
    assert_eq!(stage1.content_html.matches("mcq-item").count(), 1);
    assert!(page.slot(StageSlot::Review).active);
    assert!(!page.final_visible);

    // Stage 2 done, final panel shown right away.
    assert_eq!(reveal.advance(&mut page), None);
    assert_eq!(page.slot(StageSlot::Review).status_text, "PASS");
    assert_eq!(page.slot(StageSlot::Review).status_class, "pass");
    assert!(!page.slot(StageSlot::Refinement).visible);
    assert!(!page.refinement_arrow_visible);
    assert_eq!(page.rendered_slots(), vec![StageSlot::Generation, StageSlot::Review]);

    assert!(page.final_visible);
    assert!(page.final_html.contains("<p>Final</p>"));
    assert!(page.final_html.contains("<strong>Q1:</strong> Q1"));
    assert!(page.final_html.contains("<li>• A</li>"));
    assert!(page.final_html.contains("<li>• B</li>"));
    assert!(page.final_html.contains("<strong>Key:</strong> A"));
}

// =============================================================================
// SCENARIO: REFINED RUN
// =============================================================================

#[test]
fn test_refined_run_reveals_third_slot_only_after_review() {
    let result = run_offline(AssessmentRequest::new(3, "Types of Angles")).unwrap();
    assert!(result.refined);

    let mut page = PageModel::new();
    let mut reveal = Reveal::new(result, RevealTiming::default()).unwrap();

    reveal.advance(&mut page);
    reveal.advance(&mut page);
    assert!(!page.slot(StageSlot::Refinement).visible);

    reveal.advance(&mut page);
    assert_eq!(page.slot(StageSlot::Review).status_text, "FAIL");
    assert!(page.slot(StageSlot::Refinement).visible);
    assert!(page.refinement_arrow_visible);
    assert!(page.slot(StageSlot::Refinement).active);
    assert!(!page.final_visible);

    assert_eq!(reveal.advance(&mut page), None);
    assert_eq!(
        page.rendered_slots(),
        vec![StageSlot::Generation, StageSlot::Review, StageSlot::Refinement]
    );
    assert_eq!(page.slot(StageSlot::Refinement).status_text, "Completed");
    assert!(page.final_visible);
}

// =============================================================================
// RESET & ALERT
// =============================================================================

#[test]
fn test_alert_leaves_reset_state_untouched() {
    let mut page = PageModel::new();
    page.reset();
    let before = page.clone();

    page.alert("backend down");

    assert_eq!(page.alerts.len(), 1);
    assert_eq!(page.slots, before.slots);
    assert_eq!(page.slot(StageSlot::Generation).status_text, STATUS_GENERATING);
    assert_eq!(page.slot(StageSlot::Review).status_text, STATUS_WAITING);
    assert_eq!(page.slot(StageSlot::Review).status_class, CLASS_PROCESSING);
    assert!(!page.final_visible);
}

#[test]
fn test_unknown_stage_output_renders_raw_view_only() {
    let result: PipelineResult = serde_json::from_value(json!({
        "steps": [
            {"kind": "outline", "sections": ["intro"]},
            {"status": "pass", "feedback": ["ok"]}
        ],
        "refined": false,
        "final_content": {"explanation": "F", "mcqs": []}
    }))
    .unwrap();

    let mut page = PageModel::new();
    Reveal::new(result, RevealTiming::instant())
        .unwrap()
        .run_to_end(&mut page);

    let html = &page.slot(StageSlot::Generation).content_html;
    assert!(!html.contains("formatted-view"));
    assert!(html.contains("[VIEW STRUCTURED AGENT OUTPUT]"));
    assert!(html.contains("&quot;outline&quot;"));
}
