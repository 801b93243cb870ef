/// Lower-case prefixes that mark a message as a question even without a `?`.
const QUESTION_STARTERS: &[&str] = &[
    "what", "why", "how", "when", "where", "who", "is ", "are ", "can ", "does ", "do ", "did ",
    "should ", "could ", "would ",
];

/// Returns true if `text` reads as a question.
pub fn is_question(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    if text.contains('?') {
        return true;
    }
    QUESTION_STARTERS
        .iter()
        .any(|starter| text.starts_with(starter))
}
