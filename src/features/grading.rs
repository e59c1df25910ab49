// Answer resolution and grading
// Stored correct answers reference their option in several encodings;
// grading first resolves the stored value to the exact option text

use tracing::warn;

use crate::models::question::PracticeQuestion;

/// One reading of a stored answer value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerEncoding {
    /// The option text itself
    Literal(String),
    /// Position counted from zero
    ZeroIndex(usize),
    /// Position counted from one
    OneIndex(usize),
    /// "optionN" token, one-based
    OptionToken(usize),
    /// Letter A-D mapped by alphabet position
    Letter(usize),
}

impl AnswerEncoding {
    /// Map this reading onto the option list. Out-of-range readings
    /// yield None rather than guessing.
    pub fn resolve<'a>(&self, options: &'a [String]) -> Option<&'a str> {
        match self {
            AnswerEncoding::Literal(text) => options
                .iter()
                .find(|option| option.as_str() == text)
                .map(String::as_str),
            AnswerEncoding::ZeroIndex(n) => options.get(*n).map(String::as_str),
            AnswerEncoding::OneIndex(n) | AnswerEncoding::OptionToken(n) => n
                .checked_sub(1)
                .and_then(|idx| options.get(idx))
                .map(String::as_str),
            AnswerEncoding::Letter(idx) => options.get(*idx).map(String::as_str),
        }
    }
}

/// Every plausible reading of a raw answer value, in the order they are
/// tried against the options. Zero-based indices are tried before
/// one-based, so "1" means the second option when both would fit.
pub fn candidate_encodings(raw: &str) -> Vec<AnswerEncoding> {
    let mut candidates = vec![AnswerEncoding::Literal(raw.to_string())];

    if let Ok(n) = raw.trim().parse::<usize>() {
        candidates.push(AnswerEncoding::ZeroIndex(n));
        candidates.push(AnswerEncoding::OneIndex(n));
    }

    if let Some(n) = parse_option_token(raw) {
        candidates.push(AnswerEncoding::OptionToken(n));
    }

    if let Some(idx) = parse_letter(raw) {
        candidates.push(AnswerEncoding::Letter(idx));
    }

    candidates
}

/// "option2", "Option 3" and the like; whitespace around the number is
/// tolerated
fn parse_option_token(raw: &str) -> Option<usize> {
    let head = raw.get(..6)?;
    if !head.eq_ignore_ascii_case("option") {
        return None;
    }
    raw.get(6..)?.trim().parse::<usize>().ok()
}

/// A single letter A-D, either case
fn parse_letter(raw: &str) -> Option<usize> {
    let mut chars = raw.chars();
    let letter = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let upper = letter.to_ascii_uppercase();
    if ('A'..='D').contains(&upper) {
        Some(upper as usize - 'A' as usize)
    } else {
        None
    }
}

/// Resolve a question's stored answer to the exact option text.
///
/// Returns None when no reading maps onto the options, so callers can
/// show "correct answer not available" instead of marking everything
/// wrong.
pub fn resolve_correct_answer(question: &PracticeQuestion) -> Option<String> {
    let raw = question.answer.as_deref()?;
    let candidates = candidate_encodings(raw);
    let resolved = candidates
        .iter()
        .find_map(|encoding| encoding.resolve(&question.options))
        .map(str::to_string);

    if resolved.is_none() {
        warn!(
            "Could not resolve answer {:?} for question {:?} (options: {:?})",
            raw, question.id, question.options
        );
    }
    resolved
}

/// Outcome of grading one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect { correct_answer: String },
    /// The stored answer could not be resolved against the options
    Unavailable,
}

/// Grade a submitted option against the question's resolved answer
pub fn grade(question: &PracticeQuestion, submitted: &str) -> Verdict {
    match resolve_correct_answer(question) {
        Some(correct) if correct == submitted => Verdict::Correct,
        Some(correct) => Verdict::Incorrect {
            correct_answer: correct,
        },
        None => Verdict::Unavailable,
    }
}
