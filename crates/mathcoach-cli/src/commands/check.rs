//! The `mathcoach check` command.

use anyhow::Result;

use mathcoach_core::tutor::check_answer;
use mathcoach_core::RawAnswer;

/// Exit code for a well-formed but incorrect answer.
const EXIT_INCORRECT: i32 = 2;

pub fn execute(expected: &str, answer: &str, json: bool) -> Result<()> {
    let verdict = check_answer(&RawAnswer::from(expected), &RawAnswer::from(answer))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        println!(
            "expected: {} ({})",
            verdict.expected.value, verdict.expected.notation
        );
        println!(
            "answer:   {} ({})",
            verdict.actual.value, verdict.actual.notation
        );
        if verdict.is_correct {
            println!("Correct");
        } else {
            println!("Incorrect");
        }
    }

    if !verdict.is_correct {
        std::process::exit(EXIT_INCORRECT);
    }

    Ok(())
}
