/// Text payload scored by the fact-check classifier.
///
/// The three-line shape is what the classifier was trained on and must not
/// change.
pub fn build_classifier_input(answer: &str, question: &str, context: &str) -> String {
    format!(
        "Answer: {}\nQuestion: {}\nContext: {}",
        answer.trim(),
        question.trim(),
        context.trim()
    )
}
