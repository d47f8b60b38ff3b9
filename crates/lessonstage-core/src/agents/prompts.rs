//! Prompt construction and model reply parsing.

use super::GenerationInput;
use crate::primitives::MCQ_OPTION_COUNT;
use crate::types::{GenerationOutput, LessonError, ReviewOutput};

/// Prompt for a draft or, when feedback is present, a refinement.
#[must_use]
pub fn generator_prompt(input: &GenerationInput) -> String {
    let grade = input.grade;
    let mut prompt = format!(
        r#"You write child-friendly learning material.
Your only job is a draft lesson for Grade {grade} students on the topic: "{topic}".

Classroom rules:
1. Introduce before testing: the explanation must cover every concept the questions ask about.
2. No unexplained concepts: every question is answerable from the explanation alone.
3. Grade-appropriate vocabulary: avoid words a Grade {grade} student would not know, or explain them simply.
4. Short, clear sentences.
5. Keep it brief and engaging.

Reply with one JSON object of this shape and nothing else:
{{
  "explanation": "A simple explanation that introduces every concept used below.",
  "mcqs": [
    {{
      "question": "A question answerable from the explanation.",
      "options": ["string", "string", "string", "string"],
      "answer": "the correct option"
    }}
  ]
}}
"#,
        grade = grade,
        topic = input.topic,
    );

    if input.is_refinement() {
        prompt.push_str("\nReviewer feedback on your previous draft:\n");
        for item in &input.feedback {
            prompt.push_str(&format!("- {}\n", item));
        }
        prompt.push_str(&format!(
            "\nFix every issue above and keep the material right for Grade {}.\n",
            grade
        ));
    }
    prompt
}

/// Prompt asking the reviewer to judge `content`.
pub fn reviewer_prompt(
    content: &GenerationOutput,
    grade: u32,
    topic: &str,
) -> Result<String, LessonError> {
    let content_json = serde_json::to_string_pretty(content)
        .map_err(|e| LessonError::SerializationError(e.to_string()))?;
    Ok(format!(
        r#"You are a strict but friendly teacher reviewing material for Grade {grade} students.
Topic: "{topic}"

Material:
{content_json}

Check:
1. Age appropriateness: is every word suitable for Grade {grade}?
2. Curriculum alignment: is this topic taught at this grade? If it is too advanced, fail it and ask for a simpler related concept.
3. Correctness: is every statement accurate for this level?
4. Clarity: does the explanation introduce every concept the questions use?

Reply with one JSON object and nothing else:
{{
  "status": "pass" or "fail",
  "feedback": ["specific, friendly notes about problems or praise"]
}}
"#
    ))
}

/// Remove a surrounding Markdown code fence (with or without a `json` tag).
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse a generator reply. Every MCQ must offer exactly four options.
pub fn parse_generation(reply: &str) -> Result<GenerationOutput, LessonError> {
    let output: GenerationOutput = serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| LessonError::SerializationError(e.to_string()))?;
    if let Some((i, mcq)) = output
        .mcqs
        .iter()
        .enumerate()
        .find(|(_, mcq)| mcq.options.len() != MCQ_OPTION_COUNT)
    {
        return Err(LessonError::SerializationError(format!(
            "mcqs[{}] has {} options, expected {}",
            i,
            mcq.options.len(),
            MCQ_OPTION_COUNT
        )));
    }
    Ok(output)
}

/// Parse a reviewer reply.
pub fn parse_review(reply: &str) -> Result<ReviewOutput, LessonError> {
    serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| LessonError::SerializationError(e.to_string()))
}
