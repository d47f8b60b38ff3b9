//! Offline curriculum.
//!
//! Deterministic stand-ins for both agents. The content is small but it
//! exercises every pipeline branch: short lessons fail review and get
//! refined, angle lessons differ by grade band, and simplistic wording is
//! rejected for older students.

use super::GenerationInput;
use crate::primitives::{
    ADVANCED_GRADE_THRESHOLD, MIN_EXPLANATION_CHARS, REVIEW_FAIL, REVIEW_PASS,
};
use crate::types::{GenerationOutput, Mcq, ReviewOutput};

/// Wording that is too childish above the advanced grade threshold.
const SIMPLISTIC_PHRASE: &str = "book corner";

/// Deterministic lesson for `input`.
#[must_use]
pub fn mock_generate(input: &GenerationInput) -> GenerationOutput {
    let grade = input.grade;
    if !input.topic.to_lowercase().contains("angle") {
        return GenerationOutput::new(
            format!(
                "Welcome to our Grade {} lesson on {}! We will explore how this works using simple words and examples.",
                grade, input.topic
            ),
            vec![Mcq::new(
                "What is the main topic of our lesson today?",
                ["Math", "Reading", input.topic.as_str(), "History"],
                input.topic.as_str(),
            )],
        );
    }

    match (grade > ADVANCED_GRADE_THRESHOLD, input.is_refinement()) {
        (true, true) => GenerationOutput::new(
            format!(
                "At Grade {} we move from naming shapes to the trigonometry of angles. An angle measures the rotation between two rays, and we often measure it in radians. Supplementary angles add up to 180°, and the sine rule links sides and angles in triangles without a right angle.",
                grade
            ),
            vec![
                Mcq::new(
                    "If two angles are supplementary, what is their sum in degrees?",
                    ["90°", "180°", "270°", "360°"],
                    "180°",
                ),
                Mcq::new(
                    "Which trigonometric ratio relates the opposite side to the hypotenuse?",
                    ["Sine", "Cosine", "Tangent", "Secant"],
                    "Sine",
                ),
                Mcq::new(
                    "How many radians make a full 360° turn?",
                    ["π", "2π", "π/2", "3π"],
                    "2π",
                ),
            ],
        ),
        (true, false) => GenerationOutput::new(
            format!(
                "Welcome to Grade {} Mathematics. Today we explore angle theorems and trigonometry.",
                grade
            ),
            vec![Mcq::new(
                "Which unit does trigonometry use to measure rotation?",
                ["Grams", "Liters", "Radians", "Watts"],
                "Radians",
            )],
        ),
        (false, true) => GenerationOutput::new(
            format!(
                "An angle is the space between two lines that meet at a point called a vertex. In Grade {}, we look at three kinds of angles. A right angle is square, like a book corner. An acute angle is smaller and sharp. An obtuse angle is wider and bigger. Remember: acute is a cute little angle, and obtuse is large!",
                grade
            ),
            vec![
                Mcq::new(
                    "What is the point called where two lines meet to make an angle?",
                    ["Edge", "Vertex", "Corner", "Base"],
                    "Vertex",
                ),
                Mcq::new(
                    "Which angle has the same shape as the corner of a square book?",
                    ["Acute", "Obtuse", "Right", "Straight"],
                    "Right",
                ),
                Mcq::new(
                    "What do we call an angle that is smaller than a right angle?",
                    ["Acute", "Obtuse", "Wide", "Large"],
                    "Acute",
                ),
            ],
        ),
        (false, false) => GenerationOutput::new(
            format!(
                "Hello! Today we are learning about angles for Grade {}. An angle is a way to measure a turn. When two lines meet at a point, they make an angle!",
                grade
            ),
            vec![Mcq::new(
                "What is an angle used to measure?",
                ["Weight", "Length", "A turn", "Speed"],
                "A turn",
            )],
        ),
    }
}

/// Deterministic review of `content`.
#[must_use]
pub fn mock_review(content: &GenerationOutput, grade: u32, topic: &str) -> ReviewOutput {
    if content.explanation.chars().count() < MIN_EXPLANATION_CHARS {
        return ReviewOutput::new(
            REVIEW_FAIL,
            [
                format!("The explanation for Grade {} needs more detail!", grade),
                format!("Please add more examples of {}.", topic),
            ],
        );
    }

    if grade > ADVANCED_GRADE_THRESHOLD
        && content.explanation.to_lowercase().contains(SIMPLISTIC_PHRASE)
    {
        return ReviewOutput::new(
            REVIEW_FAIL,
            [
                format!("This content is too simplistic for a Grade {} student.", grade),
                "Use terms like 'radians' or 'supplementary angles' instead of 'book corners'."
                    .to_string(),
            ],
        );
    }

    ReviewOutput::new(REVIEW_PASS, [format!("Great work! This is perfect for Grade {}", grade)])
}
