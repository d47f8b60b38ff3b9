//! # Core Type Definitions
//!
//! This module contains the data model exchanged between the backend pipeline
//! and the presenter:
//! - Assessment content (`Mcq`, `GenerationOutput`, `ReviewOutput`)
//! - Stage outputs (`StepOutput`, `PipelineStep`)
//! - The full run result (`PipelineResult`)
//! - The run request (`AssessmentRequest`)
//! - Error types (`LessonError`)
//!
//! ## Output Tagging
//!
//! Stage outputs carry an explicit `"kind"` tag on the wire. Payloads without
//! a tag are classified by field presence so older servers keep working.
//! Anything that fits neither shape becomes [`StepOutput::Unknown`]. Every
//! output keeps the JSON it arrived as and serializes back to it unchanged.

use crate::primitives::{MAX_GRADE, MAX_TOPIC_LENGTH, MIN_GRADE, REVIEW_FAIL};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

// =============================================================================
// ASSESSMENT CONTENT
// =============================================================================

/// A multiple choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl Mcq {
    pub fn new(
        question: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            answer: answer.into(),
        }
    }
}

/// Draft or refined learning material produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub explanation: String,
    pub mcqs: Vec<Mcq>,
}

impl GenerationOutput {
    pub fn new(explanation: impl Into<String>, mcqs: Vec<Mcq>) -> Self {
        Self {
            explanation: explanation.into(),
            mcqs,
        }
    }
}

/// The verified content shown in the final panel.
pub type FinalContent = GenerationOutput;

/// Verdict produced by the reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutput {
    pub status: String,
    pub feedback: Vec<String>,
}

impl ReviewOutput {
    pub fn new(
        status: impl Into<String>,
        feedback: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            status: status.into(),
            feedback: feedback.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the reviewer rejected the content and asked for a refinement.
    #[must_use]
    pub fn is_fail(&self) -> bool {
        self.status.eq_ignore_ascii_case(REVIEW_FAIL)
    }

    /// Badge label for the review stage.
    #[must_use]
    pub fn status_label(&self) -> String {
        self.status.to_uppercase()
    }
}

// =============================================================================
// STEP OUTPUT
// =============================================================================

/// Structured output of one pipeline stage.
///
/// Every variant keeps the JSON it was built from in `raw`, so the raw-data
/// view shows exactly what was received, unknown fields included.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutput {
    Generation { output: GenerationOutput, raw: Value },
    Review { output: ReviewOutput, raw: Value },
    /// Output that matches no known shape.
    Unknown(Value),
}

/// Shape selector, either from the wire tag or inferred from fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputKind {
    Generation,
    Review,
}

impl OutputKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "generation" => Some(Self::Generation),
            "review" => Some(Self::Review),
            _ => None,
        }
    }

    fn infer(raw: &Value) -> Option<Self> {
        if raw.get("feedback").is_some() {
            Some(Self::Review)
        } else if raw.get("explanation").is_some() {
            Some(Self::Generation)
        } else {
            None
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TaggedOutput<'a> {
    Generation(&'a GenerationOutput),
    Review(&'a ReviewOutput),
}

impl TaggedOutput<'_> {
    /// Wire form of a locally produced output. Plain string and list fields
    /// always encode, so the `Null` fallback is unreachable.
    fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl StepOutput {
    /// Classify a raw JSON value. Never fails: unparseable shapes become `Unknown`.
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        let kind = match raw.get("kind") {
            Some(tag) => tag.as_str().and_then(OutputKind::from_tag),
            None => OutputKind::infer(&raw),
        };

        match kind {
            Some(OutputKind::Generation) => {
                match GenerationOutput::deserialize(&raw) {
                    Ok(output) => Self::Generation { output, raw },
                    Err(_) => Self::Unknown(raw),
                }
            }
            Some(OutputKind::Review) => match ReviewOutput::deserialize(&raw) {
                Ok(output) => Self::Review { output, raw },
                Err(_) => Self::Unknown(raw),
            },
            None => Self::Unknown(raw),
        }
    }

    /// The JSON this output was built from.
    #[must_use]
    pub fn raw(&self) -> &Value {
        match self {
            Self::Generation { raw, .. } | Self::Review { raw, .. } | Self::Unknown(raw) => raw,
        }
    }

    /// Exact JSON of this output, pretty printed for the raw-data view.
    pub fn to_pretty_json(&self) -> Result<String, LessonError> {
        serde_json::to_string_pretty(self.raw())
            .map_err(|e| LessonError::SerializationError(e.to_string()))
    }

    #[must_use]
    pub fn as_generation(&self) -> Option<&GenerationOutput> {
        match self {
            Self::Generation { output, .. } => Some(output),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_review(&self) -> Option<&ReviewOutput> {
        match self {
            Self::Review { output, .. } => Some(output),
            _ => None,
        }
    }
}

impl Serialize for StepOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StepOutput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl From<GenerationOutput> for StepOutput {
    fn from(output: GenerationOutput) -> Self {
        let raw = TaggedOutput::Generation(&output).to_value();
        Self::Generation { output, raw }
    }
}

impl From<ReviewOutput> for StepOutput {
    fn from(output: ReviewOutput) -> Self {
        let raw = TaggedOutput::Review(&output).to_value();
        Self::Review { output, raw }
    }
}

// =============================================================================
// PIPELINE STEP
// =============================================================================

/// One recorded stage: which agent ran, what it did, and what it produced.
///
/// Bare outputs (without the `agent`/`action` envelope) are accepted on input
/// and get empty agent and action names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineStep {
    pub agent: String,
    pub action: String,
    pub output: StepOutput,
}

impl PipelineStep {
    pub fn new(
        agent: impl Into<String>,
        action: impl Into<String>,
        output: impl Into<StepOutput>,
    ) -> Self {
        Self {
            agent: agent.into(),
            action: action.into(),
            output: output.into(),
        }
    }
}

impl<'de> Deserialize<'de> for PipelineStep {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        match raw {
            Value::Object(mut envelope) if envelope.contains_key("output") => {
                let text = |key: &str| {
                    envelope
                        .get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                let agent = text("agent");
                let action = text("action");
                let output = envelope.remove("output").unwrap_or(Value::Null);
                Ok(Self {
                    agent,
                    action,
                    output: StepOutput::from_value(output),
                })
            }
            bare => Ok(Self {
                agent: String::new(),
                action: String::new(),
                output: StepOutput::from_value(bare),
            }),
        }
    }
}

// =============================================================================
// PIPELINE RESULT
// =============================================================================

/// Everything one pipeline run produced, in stage order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub refined: bool,
    pub final_content: FinalContent,
    pub steps: Vec<PipelineStep>,
}

impl PipelineResult {
    /// Number of stages the reveal walks through.
    #[must_use]
    pub fn expected_steps(&self) -> usize {
        if self.refined { 3 } else { 2 }
    }

    /// Presence check: every stage the reveal will render must exist.
    pub fn check_steps(&self) -> Result<(), LessonError> {
        let expected = self.expected_steps();
        if self.steps.len() < expected {
            return Err(LessonError::MissingStep(self.steps.len()));
        }
        Ok(())
    }
}

// =============================================================================
// ASSESSMENT REQUEST
// =============================================================================

/// Body of `POST /generate-assessment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub grade: u32,
    pub topic: String,
}

impl AssessmentRequest {
    pub fn new(grade: u32, topic: impl Into<String>) -> Self {
        Self {
            grade,
            topic: topic.into(),
        }
    }

    /// Validate grade range and topic length.
    pub fn validate(&self) -> Result<(), LessonError> {
        if !(MIN_GRADE..=MAX_GRADE).contains(&self.grade) {
            return Err(LessonError::InvalidRequest(format!(
                "grade {} is outside {}..={}",
                self.grade, MIN_GRADE, MAX_GRADE
            )));
        }
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(LessonError::InvalidRequest("topic is empty".to_string()));
        }
        let length = topic.chars().count();
        if length > MAX_TOPIC_LENGTH {
            return Err(LessonError::InvalidRequest(format!(
                "topic length {} exceeds maximum {}",
                length, MAX_TOPIC_LENGTH
            )));
        }
        Ok(())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in lessonstage operations.
#[derive(Debug, Error)]
pub enum LessonError {
    /// The assessment request is out of bounds.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A stage the reveal needs is absent from the result.
    #[error("Pipeline result is missing stage {}", .0 + 1)]
    MissingStep(usize),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A configuration file or value could not be used.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_generation_is_classified_by_tag() {
        let raw = json!({"kind": "generation", "explanation": "E", "mcqs": []});
        let output = StepOutput::from_value(raw);
        assert_eq!(output, StepOutput::from(GenerationOutput::new("E", vec![])));
    }

    #[test]
    fn untagged_outputs_are_inferred_from_fields() {
        let review = StepOutput::from_value(json!({"status": "pass", "feedback": []}));
        assert!(matches!(review, StepOutput::Review { .. }));

        let generation = StepOutput::from_value(json!({"explanation": "E", "mcqs": []}));
        assert!(matches!(generation, StepOutput::Generation { .. }));
    }

    #[test]
    fn untagged_output_serializes_as_received() {
        let raw = json!({"explanation": "E1", "mcqs": []});
        let output = StepOutput::from_value(raw.clone());
        assert_eq!(output.as_generation().map(|g| g.explanation.as_str()), Some("E1"));
        assert_eq!(serde_json::to_value(&output).expect("serialize"), raw);
        assert_eq!(
            output.to_pretty_json().expect("encode"),
            serde_json::to_string_pretty(&raw).expect("encode")
        );
    }

    #[test]
    fn extra_fields_survive_in_raw_json() {
        let raw = json!({"status": "pass", "feedback": ["ok"], "score": 9});
        let output = StepOutput::from_value(raw.clone());
        assert_eq!(output.as_review().map(|r| r.status.as_str()), Some("pass"));
        assert_eq!(output.raw(), &raw);
        assert!(output.to_pretty_json().expect("encode").contains(r#""score": 9"#));
    }

    #[test]
    fn tag_wins_over_field_presence() {
        // Explicit tag says review, but the fields are a generation shape.
        let raw = json!({"kind": "review", "explanation": "E", "mcqs": []});
        assert_eq!(StepOutput::from_value(raw.clone()), StepOutput::Unknown(raw));
    }

    #[test]
    fn unknown_tag_is_kept_verbatim() {
        let raw = json!({"kind": "summary", "text": "hi"});
        let output = StepOutput::from_value(raw.clone());
        assert_eq!(output, StepOutput::Unknown(raw.clone()));
        assert_eq!(serde_json::to_value(&output).expect("serialize"), raw);
    }

    #[test]
    fn malformed_review_degrades_to_unknown() {
        let raw = json!({"feedback": "not a list"});
        assert_eq!(StepOutput::from_value(raw.clone()), StepOutput::Unknown(raw));
    }

    #[test]
    fn built_output_carries_kind_tag() {
        let output = StepOutput::from(ReviewOutput::new("fail", ["too short"]));
        let value = serde_json::to_value(&output).expect("serialize");
        assert_eq!(
            value,
            json!({"kind": "review", "status": "fail", "feedback": ["too short"]})
        );
    }

    #[test]
    fn step_accepts_envelope_and_bare_output() {
        let wrapped: PipelineStep = serde_json::from_value(json!({
            "agent": "Reviewer Agent",
            "action": "Content Review",
            "output": {"status": "pass", "feedback": []}
        }))
        .expect("deserialize");
        assert_eq!(wrapped.agent, "Reviewer Agent");
        assert!(wrapped.output.as_review().is_some());

        let bare: PipelineStep =
            serde_json::from_value(json!({"status": "pass", "feedback": []})).expect("deserialize");
        assert!(bare.agent.is_empty());
        assert!(bare.output.as_review().is_some());
    }

    #[test]
    fn review_label_is_uppercased_status() {
        assert_eq!(ReviewOutput::new("pass", Vec::<String>::new()).status_label(), "PASS");
        assert!(ReviewOutput::new("FAIL", Vec::<String>::new()).is_fail());
    }

    #[test]
    fn missing_refinement_step_is_reported() {
        let result = PipelineResult {
            grade: None,
            topic: None,
            refined: true,
            final_content: GenerationOutput::new("F", vec![]),
            steps: vec![
                PipelineStep::new("", "", GenerationOutput::new("E", vec![])),
                PipelineStep::new("", "", ReviewOutput::new("fail", ["x"])),
            ],
        };
        let err = result.check_steps().expect_err("should be missing");
        assert_eq!(err.to_string(), "Pipeline result is missing stage 3");
    }

    #[test]
    fn request_validation_bounds() {
        assert!(AssessmentRequest::new(4, "Angles").validate().is_ok());
        assert!(AssessmentRequest::new(0, "Angles").validate().is_err());
        assert!(AssessmentRequest::new(13, "Angles").validate().is_err());
        assert!(AssessmentRequest::new(4, "   ").validate().is_err());
        assert!(AssessmentRequest::new(4, "x".repeat(201)).validate().is_err());
    }
}
