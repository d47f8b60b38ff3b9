//! # Templates
//!
//! HTML and plain-text renderings of stage outputs and the final panel.
//!
//! Template choice follows the output shape: reviews get the feedback list,
//! generations get the explanation and MCQs, unknown shapes get nothing but
//! the raw-data view. Every stage rendering ends with the raw-data view.

use crate::types::{FinalContent, GenerationOutput, ReviewOutput, StepOutput};

/// Summary line of the collapsible raw-data view.
pub const RAW_VIEW_SUMMARY: &str = "[VIEW STRUCTURED AGENT OUTPUT]";

/// Heading of the final panel.
pub const FINAL_HEADING: &str = "Final Verified Assessment Content";

// =============================================================================
// ESCAPING
// =============================================================================

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Pretty JSON of a stage output, or a placeholder if it cannot be encoded.
fn raw_json(output: &StepOutput) -> String {
    match output.to_pretty_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Raw view encoding failed: {}", e);
            "null".to_string()
        }
    }
}

// =============================================================================
// HTML: STAGES
// =============================================================================

/// Full HTML body of a completed stage.
#[must_use]
pub fn stage_html(output: &StepOutput) -> String {
    let mut html = match output {
        StepOutput::Review { output: review, .. } => review_html(review),
        StepOutput::Generation { output: generation, .. } => generation_html(generation),
        StepOutput::Unknown(_) => String::new(),
    };
    html.push_str(&raw_view_html(output));
    html
}

fn review_html(review: &ReviewOutput) -> String {
    let items: String = review
        .feedback
        .iter()
        .map(|f| format!(r#"<div class="feedback-item">• {}</div>"#, escape_html(f)))
        .collect();
    format!(
        r#"<div class="formatted-view"><strong>Reviewer Feedback:</strong><br>{}</div>"#,
        items
    )
}

fn generation_html(generation: &GenerationOutput) -> String {
    let mut html = format!(
        r#"<div class="formatted-view"><p>{}</p>"#,
        escape_html(&generation.explanation)
    );
    if !generation.mcqs.is_empty() {
        html.push_str("<strong>Generated MCQs:</strong><br>");
        for mcq in &generation.mcqs {
            html.push_str(&format!(
                r#"<div class="mcq-item">Q: {}<br><small>Correct Answer: {}</small></div>"#,
                escape_html(&mcq.question),
                escape_html(&mcq.answer)
            ));
        }
    }
    html.push_str("</div>");
    html
}

/// Collapsible view of the structured output exactly as received.
#[must_use]
pub fn raw_view_html(output: &StepOutput) -> String {
    format!(
        r#"<div class="json-view"><details><summary>{}</summary><pre>{}</pre></details></div>"#,
        RAW_VIEW_SUMMARY,
        escape_html(&raw_json(output))
    )
}

// =============================================================================
// HTML: FINAL PANEL
// =============================================================================

/// HTML of the final panel: prose explanation plus numbered assessment items.
#[must_use]
pub fn final_html(content: &FinalContent) -> String {
    let mut html = format!(
        r#"<div class="explanation-final"><h3>{}</h3><p>{}</p></div><hr><div class="mcqs-final"><h4>Assessment Items</h4>"#,
        FINAL_HEADING,
        escape_html(&content.explanation)
    );
    for (i, mcq) in content.mcqs.iter().enumerate() {
        let options: String = mcq
            .options
            .iter()
            .map(|o| format!("<li>• {}</li>", escape_html(o)))
            .collect();
        html.push_str(&format!(
            r#"<div class="mcq-item"><strong>Q{}:</strong> {}<ul>{}</ul><div class="answer-key"><strong>Key:</strong> {}</div></div>"#,
            i.saturating_add(1),
            escape_html(&mcq.question),
            options,
            escape_html(&mcq.answer)
        ));
    }
    html.push_str("</div>");
    html
}

// =============================================================================
// PLAIN TEXT
// =============================================================================

/// Terminal rendering of a completed stage.
#[must_use]
pub fn stage_text(output: &StepOutput) -> String {
    let mut text = String::new();
    match output {
        StepOutput::Review { output: review, .. } => {
            text.push_str("Reviewer Feedback:\n");
            for f in &review.feedback {
                text.push_str(&format!("  • {}\n", f));
            }
        }
        StepOutput::Generation { output: generation, .. } => {
            text.push_str(&format!("{}\n", generation.explanation));
            if !generation.mcqs.is_empty() {
                text.push_str("Generated MCQs:\n");
                for mcq in &generation.mcqs {
                    text.push_str(&format!("  Q: {}\n", mcq.question));
                    text.push_str(&format!("     Correct Answer: {}\n", mcq.answer));
                }
            }
        }
        StepOutput::Unknown(_) => {}
    }
    text.push_str(RAW_VIEW_SUMMARY);
    text.push('\n');
    text.push_str(&raw_json(output));
    text.push('\n');
    text
}

/// Terminal rendering of the final panel.
#[must_use]
pub fn final_text(content: &FinalContent) -> String {
    let mut text = format!("{}\n\n{}\n\nAssessment Items\n", FINAL_HEADING, content.explanation);
    for (i, mcq) in content.mcqs.iter().enumerate() {
        text.push_str(&format!("Q{}: {}\n", i.saturating_add(1), mcq.question));
        for option in &mcq.options {
            text.push_str(&format!("   • {}\n", option));
        }
        text.push_str(&format!("   Key: {}\n", mcq.answer));
    }
    text
}

// =============================================================================
// TESTS
// =============================================================================
