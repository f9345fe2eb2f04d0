//! Regex plumbing shared by the transformation handlers: pattern
//! compilation, replacement-text translation, and the derived patterns used
//! by the file-driven and insert commands.

use anyhow::{Context, Result};
use regex::Regex;

/// Compile a user-supplied pattern, naming it in the error so a bad pattern
/// aborts only the current command with a usable diagnostic.
pub fn compile(find: &str) -> Result<Regex> {
    Regex::new(find).with_context(|| format!("invalid pattern '{find}'"))
}

/// Translate `\1`-style backreferences in user replacement text into the
/// `${1}` form the regex crate expands. `$` is literal in user text and
/// `\\` collapses to a single backslash.
pub fn replacement(repl: &str) -> String {
    let mut out = String::with_capacity(repl.len());
    let mut chars = repl.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => match chars.peek() {
                Some(d) if d.is_ascii_digit() => {
                    out.push_str("${");
                    while let Some(&d) = chars.peek() {
                        if !d.is_ascii_digit() {
                            break;
                        }
                        out.push(d);
                        chars.next();
                    }
                    out.push('}');
                },
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                },
                _ => out.push('\\'),
            },
            _ => out.push(c),
        }
    }
    out
}

/// Escape a literal value for use as replacement text.
pub fn literal(value: &str) -> String {
    value.replace('$', "$$")
}

/// Row pattern for file-driven prepend: the staged name must match the row's
/// pattern exactly.
pub fn prepend_row(pattern: &str) -> Result<Regex> {
    compile(&format!("^(?:{pattern})$"))
}

/// Row pattern for file-driven append: the row's pattern must close out the
/// staged name, tolerating trailing separators before the end.
pub fn append_row(pattern: &str) -> Result<Regex> {
    compile(&format!(r"(?:{pattern})[\s._-]*$"))
}

/// Pattern splitting a name into the two capture groups around a 0-based
/// insertion index. A non-negative index counts from the start, a negative
/// one from the end; both clamp to the sample name's length.
pub fn insert_split(index: i64, len: usize) -> Result<Regex> {
    let idx = index.unsigned_abs().min(len as u64);
    if index >= 0 {
        compile(&format!("^(.{{{idx}}})(.*)$"))
    } else {
        compile(&format!("^(.*?)(.{{{idx}}})$"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_translates_backreferences() {
        assert_eq!(replacement(r"\1 and \2"), "${1} and ${2}");
        assert_eq!(replacement(r"\12x"), "${12}x");
        assert_eq!(replacement("cost $5"), "cost $$5");
        assert_eq!(replacement(r"a\\b"), r"a\b");
        assert_eq!(replacement(r"\w"), r"\w");
    }

    #[test]
    fn replacement_expands_groups_like_the_find_side() {
        let re = compile(r"(\w+) - (\w+)").unwrap();
        let out = re.replace_all("Show - 01", replacement(r"\2 \1").as_str());
        assert_eq!(out, "01 Show");
    }

    #[test]
    fn literal_values_never_expand() {
        let re = compile("x").unwrap();
        assert_eq!(re.replace_all("x", literal("$1").as_str()), "$1");
    }

    #[test]
    fn prepend_rows_match_whole_names_only() {
        let row = prepend_row("Foo").unwrap();
        assert!(row.is_match("Foo"));
        assert!(!row.is_match("Foo Bar"));
        assert!(!row.is_match("My Foo"));
    }

    #[test]
    fn append_rows_anchor_at_the_end_with_separator_slack() {
        let row = append_row("0101").unwrap();
        assert!(row.is_match("Show - 0101"));
        assert!(!row.is_match("0101 - Show"));
        let row = append_row("s01e02").unwrap();
        assert!(row.is_match("Show - s01e02 -"));
    }

    #[test]
    fn insert_split_counts_from_either_end_and_clamps() {
        let apply = |index, sample: &str| {
            let re = insert_split(index, sample.chars().count()).unwrap();
            re.replace(sample, "${1}_${2}").into_owned()
        };
        assert_eq!(apply(1, "file"), "f_ile");
        assert_eq!(apply(0, "file"), "_file");
        assert_eq!(apply(99, "file"), "file_");
        assert_eq!(apply(-1, "file"), "fil_e");
        assert_eq!(apply(-99, "file"), "_file");
    }
}
