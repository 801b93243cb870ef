use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Answer questions with an LLM and fact-check the answers", long_about = None)]
pub struct Args {
    /// Message to submit as a single turn; starts an interactive session when omitted
    pub query: Option<String>,

    /// Answering provider [possible values: openai, openrouter, deepseek, azure]
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model (or Azure deployment) used to answer questions
    #[arg(short, long)]
    pub model: Option<String>,

    /// Fact-check classifier scoring endpoint
    #[arg(long)]
    pub scoring_url: Option<String>,

    /// Log pipeline activity to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_query() {
        let args = Args::parse_from([
            "factchat",
            "-p",
            "azure",
            "--scoring-url",
            "https://score/api",
            "What is X?",
        ]);
        assert_eq!(args.query.as_deref(), Some("What is X?"));
        assert_eq!(args.provider.as_deref(), Some("azure"));
        assert_eq!(args.scoring_url.as_deref(), Some("https://score/api"));
        assert!(!args.verbose);
    }

    #[test]
    fn query_is_optional() {
        let args = Args::parse_from(["factchat", "-v"]);
        assert!(args.query.is_none());
        assert!(args.verbose);
    }
}
