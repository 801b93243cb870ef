use crate::core::{ChatMessage, ChatRole, Verdict};
use crate::utils::text::{max_line_width, wrap_text};
use console::{Style, style};

const CONTRADICTION_CAPTION: &str =
    "The generated answer may be false or misleading. Please consult additional reliable sources.";
const FACTUAL_CAPTION: &str = "The answer appears consistent with the provided context.";
const INSUFFICIENT_CAPTION: &str = "There is insufficient context to verify this answer.";

fn bubble_width() -> usize {
    let terminal_width = console::Term::stdout().size().1 as usize;
    (terminal_width.saturating_sub(4) * 3 / 4).clamp(30, 100)
}

/// Prints a boxed bubble; user bubbles are pushed to the right edge.
fn display_bubble(text: &str, right_aligned: bool, border: &Style) {
    let terminal_width = console::Term::stdout().size().1 as usize;
    let lines = wrap_text(text, bubble_width().saturating_sub(4));
    let inner = max_line_width(&lines);
    let box_width = inner + 4;
    let indent = if right_aligned {
        " ".repeat(terminal_width.saturating_sub(box_width + 1))
    } else {
        String::new()
    };

    println!(
        "{}{}",
        indent,
        border.apply_to(format!("┌{}┐", "─".repeat(box_width - 2)))
    );
    for line in &lines {
        let padding = inner - console::measure_text_width(line);
        println!(
            "{}{} {}{} {}",
            indent,
            border.apply_to("│"),
            style(line).bold(),
            " ".repeat(padding),
            border.apply_to("│")
        );
    }
    println!(
        "{}{}",
        indent,
        border.apply_to(format!("└{}┘", "─".repeat(box_width - 2)))
    );
}

fn display_verdict(verdict: &Verdict) {
    match verdict {
        Verdict::Contradiction => println!(
            "{} {}",
            style("🛡️  ⚠️").red(),
            style(CONTRADICTION_CAPTION).bold().red()
        ),
        Verdict::Factual => println!(
            "{} {}",
            style("🛡️  ✅").green(),
            style(FACTUAL_CAPTION).bold().green()
        ),
        other => println!(
            "{} {} {}",
            style("🛡️  ℹ️").blue(),
            style(INSUFFICIENT_CAPTION).bold().blue(),
            style(format!("({})", other)).dim()
        ),
    }
}

pub fn display_message(msg: &ChatMessage) {
    match msg.role {
        ChatRole::User => display_bubble(&msg.text, true, &Style::new().yellow()),
        ChatRole::Assistant => {
            println!("{}", style("🤖 ASSISTANT").bold().blue());
            display_bubble(&msg.text, false, &Style::new().blue());
        }
        ChatRole::SystemVerdict if msg.is_failure() => {
            println!("{} {}", style("🛡️  ❌").red(), style(&msg.text).red())
        }
        ChatRole::SystemVerdict => {
            if let Some(verdict) = &msg.label {
                display_verdict(verdict);
            }
        }
    }
}

pub fn display_status(text: &str) {
    println!("{}", style(format!("🔍 {}", text)).dim());
}

pub fn display_context(context: &str) {
    if context.is_empty() {
        println!(
            "{}",
            style("No context: the next question will be answered from the model's own knowledge.")
                .dim()
        );
        return;
    }
    println!("{}", style("Context for the next question:").bold().underlined());
    for line in context.lines() {
        println!("  {}", line);
    }
}

pub fn display_error(text: &str) {
    eprintln!("{} {}", style("Error:").bold().red(), text);
}
