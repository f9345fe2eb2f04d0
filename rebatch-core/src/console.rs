//! Line-oriented console seam. The session talks to a `Console` rather than
//! stdin/stdout directly so the dispatch loop can be driven by tests.

use std::io::{self, BufRead, Write};

pub trait Console {
    /// Print `prompt` without a trailing newline and read one line of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Write one line of output.
    fn write_line(&mut self, line: &str);
}

/// Console backed by the process stdin/stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Classification of an interactive answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Back,
    Other,
}

/// Classify a confirmation answer: y/yes/true confirm, n/no/false deny,
/// b/back/q/quit abort a multi-step prompt. Anything else is `Other` and
/// callers re-ask.
pub fn classify(input: &str) -> Answer {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" => Answer::Yes,
        "n" | "no" | "false" => Answer::No,
        "b" | "back" | "q" | "quit" => Answer::Back,
        _ => Answer::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_covers_the_accepted_word_lists() {
        for word in ["y", "yes", "true", "YES", " Y "] {
            assert_eq!(classify(word), Answer::Yes, "{word}");
        }
        for word in ["n", "no", "false", "No"] {
            assert_eq!(classify(word), Answer::No, "{word}");
        }
        for word in ["b", "back", "q", "quit", "Back"] {
            assert_eq!(classify(word), Answer::Back, "{word}");
        }
        for word in ["", "maybe", "yep"] {
            assert_eq!(classify(word), Answer::Other, "{word}");
        }
    }
}
