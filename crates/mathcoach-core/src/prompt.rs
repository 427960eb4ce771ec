//! Prompt assembly and reply parsing for problem generation.

use serde::Deserialize;

use crate::answer::{parse_numeric, RawAnswer};
use crate::model::{ExplainMode, ProblemRequest};
use crate::traits::extract_json_block;

/// Appended to the generation prompt when the first reply had no usable
/// numeric answer.
pub const NUMERIC_RETRY_SUFFIX: &str =
    "\nIMPORTANT: Ensure final_answer is a pure number (no words or units).";

const JSON_RULE: &str = r#"Return ONLY minified JSON with keys: {"problem_text": string, "final_answer": number}. Do not include any extra keys, commentary, markdown, or units in final_answer."#;

/// Keyword in the outcome -> extra constraint for the model.
const TOPIC_CONSTRAINTS: &[(&[&str], &str)] = &[
    (
        &["fraction"],
        "Use proper/simple fractions; keep denominators small (<=12). Avoid mixed numbers unless needed.",
    ),
    (
        &["percent"],
        "Use whole-number percentages (e.g., 10%, 15%, 25%).",
    ),
    (
        &["area"],
        "If geometry, make dimensions whole numbers; include units (cm, m). Avoid irregular shapes unless described simply.",
    ),
    (
        &["perimeter"],
        "Perimeter questions should have at most two shapes; numbers small.",
    ),
    (&["ratio"], "Use simple ratios like 2:3 or 3:5."),
    (
        &["speed", "time"],
        "Distance-time problems: keep speeds to whole numbers; units in km/h or m/s, be explicit about time.",
    ),
];

fn grade_constraints(level: u8) -> &'static str {
    match level {
        0..=2 => {
            "Use only addition/subtraction with whole numbers up to 100. \
             One-step word problem with clear context (money, time, lengths). \
             No fractions/decimals/percentages."
        }
        3..=4 => {
            "Use addition/subtraction, and include multiplication or division when natural. \
             Whole numbers typically up to 10,000; avoid cumbersome computations. \
             At most 2 steps; decimals optional only for P4 (1 decimal place)."
        }
        _ => {
            "Allow fractions, decimals, and percentages. \
             2-3 steps maximum; keep numbers tidy so the final answer is a clean number. \
             Include units in the problem text when relevant (e.g., kg, m, $, %)."
        }
    }
}

/// Prompt for a fresh problem.
pub fn problem_prompt(request: &ProblemRequest) -> String {
    let outcome = request.outcome_for_prompt();
    let level = request.grade.get();

    let core = format!(
        "Generate ONE Primary P{level} mathematics word problem aligned to this syllabus outcome: \"{outcome}\". \
         Difficulty: {}. Use age-appropriate language, Singapore primary context, and avoid ambiguity. {}",
        request.difficulty,
        grade_constraints(level),
    );

    let keywords = outcome.to_lowercase();
    let extras: Vec<&str> = TOPIC_CONSTRAINTS
        .iter()
        .filter(|(words, _)| words.iter().any(|w| keywords.contains(w)))
        .map(|(_, constraint)| *constraint)
        .collect();
    let extras = if extras.is_empty() {
        String::new()
    } else {
        format!("Additional constraints: {}", extras.join(" "))
    };

    format!("{core}\n{extras}\n{JSON_RULE}")
}

/// Prompt for a variant of an existing problem.
pub fn improve_prompt(request: &ProblemRequest, based_on: &str) -> String {
    format!(
        "Improve and slightly vary this Primary P{} math word problem while keeping it aligned to the outcome: \"{}\". Difficulty: {}.\n\
         Original problem: {based_on}\n\
         Make a fresh variant with clearer wording or a different everyday context and small number changes.\n\
         Return ONLY minified JSON: {{\"problem_text\": string, \"final_answer\": number}}.",
        request.grade.get(),
        request.outcome_for_prompt(),
        request.difficulty,
    )
}

/// Prompt for short feedback on a graded answer.
pub fn feedback_prompt(problem_text: &str, correct_answer: f64, student_answer: f64) -> String {
    format!(
        "Problem: {problem_text}\nCorrect answer: {correct_answer}\nStudent answer: {student_answer}\n\
         Explain briefly why the answer is correct or how to fix it (Primary level, kind tone, 2-4 sentences)."
    )
}

/// Prompt for a hint or a worked solution.
pub fn explain_prompt(problem_text: &str, correct_answer: f64, mode: ExplainMode) -> String {
    let base = format!("Problem: {problem_text}\nCorrect answer: {correct_answer}");
    match mode {
        ExplainMode::Hint => format!(
            "{base}\nGive a gentle hint (2-3 bullet points) to guide a Primary student. Do NOT reveal the final numeric answer."
        ),
        ExplainMode::Solution => format!(
            "{base}\nProvide step-by-step solution (3-6 concise steps) ending with the final numeric answer."
        ),
    }
}

/// A problem as returned by the model, before it is stored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProblemDraft {
    pub problem_text: String,
    pub final_answer: RawAnswer,
}

impl ProblemDraft {
    /// Parse a model reply. `None` if it holds no JSON object of the right
    /// shape.
    pub fn from_reply(reply: &str) -> Option<Self> {
        let json = extract_json_block(reply)?;
        match serde_json::from_str::<ProblemDraft>(json) {
            Ok(draft) if !draft.problem_text.trim().is_empty() => Some(draft),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("reply is not a problem draft: {e}");
                None
            }
        }
    }

    /// The final answer normalized the same way student answers are.
    pub fn numeric_answer(&self) -> Option<f64> {
        parse_numeric(&self.final_answer)
    }
}
