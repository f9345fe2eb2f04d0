//! Command registry: a static table of command descriptors (name, aliases,
//! argument schema, help text) plus the parser that turns one line of input
//! into a typed `Invocation`. Parsing is pure; execution belongs to the
//! session.

use std::collections::HashMap;
use thiserror::Error;

/// Errors produced while turning a line of input into an invocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("unbalanced quoting")]
    Tokenize,
    #[error("unrecognized arguments for '{0}'")]
    UnrecognizedArguments(&'static str),
    #[error("unknown flag '{flag}' for '{command}'")]
    UnknownFlag { command: &'static str, flag: String },
    #[error("flag '{flag}' for '{command}' requires a value")]
    MissingFlagValue { command: &'static str, flag: String },
    #[error("'{command}' expects an integer, got '{value}'")]
    InvalidInteger { command: &'static str, value: String },
}

impl ParseError {
    /// Command the error belongs to, when one was recognized.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::UnknownCommand(_) | Self::Tokenize => None,
            Self::UnrecognizedArguments(command) => Some(command),
            Self::UnknownFlag { command, .. }
            | Self::MissingFlagValue { command, .. }
            | Self::InvalidInteger { command, .. } => Some(command),
        }
    }
}

/// Arguments shared by `append` and `prepend`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendArgs {
    pub find: Option<String>,
    pub value: Option<String>,
    pub filenames: Vec<String>,
    /// Inserted between the anchor and the value. Defaults to one space.
    pub padding: String,
}

/// A parsed command ready for dispatch. Built fresh per line; nothing here
/// is shared between invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Help { commands: Vec<String>, small: bool },
    Save { confirm: bool },
    Quit { confirm: bool },
    SaveQuit { confirm: bool },
    List,
    History { peek: bool },
    Undo { count: usize },
    Reset { confirm: bool },
    Automate { filenames: Vec<String> },
    Replace { find: Option<String>, replace: Option<String> },
    Append(PendArgs),
    Prepend(PendArgs),
    Insert { value: Option<String>, index: Option<i64>, confirm: bool },
    Case { styles: Vec<String> },
    Extension { ext: Option<String>, pattern: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Help,
    Save,
    Quit,
    Write,
    List,
    History,
    Undo,
    Reset,
    Automate,
    Replace,
    Append,
    Prepend,
    Insert,
    Case,
    Extension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Switch,
    One,
    Many,
}

#[derive(Debug, Clone, Copy)]
struct FlagSpec {
    short: &'static str,
    long: &'static str,
    arity: Arity,
}

const CONFIRM: FlagSpec = FlagSpec {
    short: "-c",
    long: "--confirm",
    arity: Arity::Switch,
};
const FILENAMES: FlagSpec = FlagSpec {
    short: "-f",
    long: "--filenames",
    arity: Arity::Many,
};
const PADDING: FlagSpec = FlagSpec {
    short: "-p",
    long: "--padding",
    arity: Arity::One,
};
const PEEK: FlagSpec = FlagSpec {
    short: "-p",
    long: "--peek",
    arity: Arity::Switch,
};
const SMALL: FlagSpec = FlagSpec {
    short: "-s",
    long: "--small",
    arity: Arity::Switch,
};

/// One command: canonical name, aliases, schema, and help text.
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub summary: &'static str,
    pub arg_help: &'static [&'static str],
    kind: Kind,
    max_positionals: usize,
    flags: &'static [FlagSpec],
}

impl CommandSpec {
    /// Full help block: usage line, summary, argument details.
    fn render(&self) -> String {
        let mut out = format!("{}\n    {}\n", self.usage, self.summary);
        if !self.arg_help.is_empty() {
            out.push('\n');
            for line in self.arg_help {
                out.push_str("    ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

const UNBOUNDED: usize = usize::MAX;

static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        aliases: &["h", "?"],
        usage: "help (h, ?) [-s] [cmd ...]",
        summary: "display help message",
        arg_help: &[
            "-s, --small  display just the usage messages",
            "cmd          name of command to get specific info on",
        ],
        kind: Kind::Help,
        max_positionals: UNBOUNDED,
        flags: &[SMALL],
    },
    CommandSpec {
        name: "save",
        aliases: &["s"],
        usage: "save (s) [-c]",
        summary: "save files with current changes",
        arg_help: &["-c, --confirm  save without confirmation"],
        kind: Kind::Save,
        max_positionals: 0,
        flags: &[CONFIRM],
    },
    CommandSpec {
        name: "quit",
        aliases: &["q", "exit"],
        usage: "quit (q, exit) [-c]",
        summary: "quit program, don't apply unsaved changes",
        arg_help: &["-c, --confirm  quit without confirmation"],
        kind: Kind::Quit,
        max_positionals: 0,
        flags: &[CONFIRM],
    },
    CommandSpec {
        name: "write",
        aliases: &["w"],
        usage: "write (w) [-c]",
        summary: "write changes and quit program, same as save then quit",
        arg_help: &["-c, --confirm  save and quit without confirmation"],
        kind: Kind::Write,
        max_positionals: 0,
        flags: &[CONFIRM],
    },
    CommandSpec {
        name: "list",
        aliases: &["ls", "l"],
        usage: "list (ls, l)",
        summary: "list current files being modified",
        arg_help: &[],
        kind: Kind::List,
        max_positionals: 0,
        flags: &[],
    },
    CommandSpec {
        name: "history",
        aliases: &["hist", "past"],
        usage: "history (hist, past) [-p]",
        summary: "print history of changes for all files",
        arg_help: &["-p, --peek  just show the first file's history"],
        kind: Kind::History,
        max_positionals: 0,
        flags: &[PEEK],
    },
    CommandSpec {
        name: "undo",
        aliases: &["u"],
        usage: "undo (u) [number]",
        summary: "undo last change made",
        arg_help: &["number  number of changes to undo (default 1)"],
        kind: Kind::Undo,
        max_positionals: 1,
        flags: &[],
    },
    CommandSpec {
        name: "reset",
        aliases: &["over", "o"],
        usage: "reset (over, o) [-c]",
        summary: "reset changes to original inputs, no undoing",
        arg_help: &["-c, --confirm  reset without confirmation"],
        kind: Kind::Reset,
        max_positionals: 0,
        flags: &[CONFIRM],
    },
    CommandSpec {
        name: "automate",
        aliases: &["a", "auto"],
        usage: "automate (a, auto) [filename ...]",
        summary: "run commands from a file to speed up repetitive tasks",
        arg_help: &["filename  path to a file of commands, one per line"],
        kind: Kind::Automate,
        max_positionals: UNBOUNDED,
        flags: &[],
    },
    CommandSpec {
        name: "replace",
        aliases: &["r", "re", "reg", "regex"],
        usage: "replace (r, re, reg, regex) [find [replace]]",
        summary: "find and replace based on a regex",
        arg_help: &[
            "find     pattern to search for",
            "replace  value to replace with (can use groups matched in find)",
        ],
        kind: Kind::Replace,
        max_positionals: 2,
        flags: &[],
    },
    CommandSpec {
        name: "append",
        aliases: &["ap"],
        usage: "append (ap) [find [value]] [-f FILE ...] [-p PAD]",
        summary: "append a value to each file that matches a pattern",
        arg_help: &[
            "find           regex pattern to match against",
            "value          value to append to the filename",
            "-f, --filenames  files to load pattern/value rows from",
            "-p, --padding    string inserted before the appended value",
        ],
        kind: Kind::Append,
        max_positionals: 2,
        flags: &[FILENAMES, PADDING],
    },
    CommandSpec {
        name: "prepend",
        aliases: &["p", "pre"],
        usage: "prepend (p, pre) [find [value]] [-f FILE ...] [-p PAD]",
        summary: "prepend a value to each file that matches a pattern",
        arg_help: &[
            "find           regex pattern to match against",
            "value          value to prepend to the filename",
            "-f, --filenames  files to load pattern/value rows from",
            "-p, --padding    string inserted after the prepended value",
        ],
        kind: Kind::Prepend,
        max_positionals: 2,
        flags: &[FILENAMES, PADDING],
    },
    CommandSpec {
        name: "insert",
        aliases: &["i", "in"],
        usage: "insert (i, in) [-c] [value [index]]",
        summary: "insert a string, positive index from the beginning, negative from the end",
        arg_help: &[
            "value          value to insert",
            "index          0-based index to insert at",
            "-c, --confirm  skip the example confirmation",
        ],
        kind: Kind::Insert,
        max_positionals: 2,
        flags: &[CONFIRM],
    },
    CommandSpec {
        name: "case",
        aliases: &["c"],
        usage: "case (c) [style ...]",
        summary: "change the case (title, upper, lower, ...) of files",
        arg_help: &["style  case styles applied in order (lower, upper, title, camel, kebab, ...)"],
        kind: Kind::Case,
        max_positionals: UNBOUNDED,
        flags: &[],
    },
    CommandSpec {
        name: "extension",
        aliases: &["x", "ext"],
        usage: "extension (x, ext) [ext [pattern]]",
        summary: "change the extension on all files or files that match pattern",
        arg_help: &[
            "ext      new extension to change to",
            "pattern  only change files whose name matches this pattern",
        ],
        kind: Kind::Extension,
        max_positionals: 2,
        flags: &[],
    },
];

/// Alias-indexed command table, built once at startup.
pub struct CommandRegistry {
    lookup: HashMap<&'static str, &'static CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut lookup = HashMap::new();
        for spec in COMMANDS {
            lookup.insert(spec.name, spec);
            for alias in spec.aliases {
                lookup.insert(*alias, spec);
            }
        }
        Self { lookup }
    }

    /// Resolve one line of input. Blank lines and `#` comments resolve to
    /// `None`; everything else parses into an invocation or errors.
    pub fn resolve(&self, line: &str) -> Result<Option<Invocation>, ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }
        let tokens = shlex::split(trimmed).ok_or(ParseError::Tokenize)?;
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(None);
        };
        let name = name.to_lowercase();
        let spec = self
            .lookup
            .get(name.as_str())
            .copied()
            .ok_or(ParseError::UnknownCommand(name))?;
        let raw = RawArgs::parse(spec, rest)?;
        build_invocation(spec, raw).map(Some)
    }

    /// Full help for every command.
    pub fn help_all(&self) -> String {
        COMMANDS
            .iter()
            .map(CommandSpec::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One usage line per command.
    pub fn help_small(&self) -> String {
        COMMANDS
            .iter()
            .map(|spec| format!("    {}", spec.usage))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Full help for a single command or alias.
    pub fn help_for(&self, name: &str) -> Option<String> {
        self.lookup.get(name).map(|spec| spec.render())
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A token is a flag when it leads with `-` and is not a bare negative
/// number, so `insert _ -3` keeps its index positional.
fn looks_like_flag(token: &str) -> bool {
    token.len() > 1
        && token.starts_with('-')
        && !token[1..].chars().all(|c| c.is_ascii_digit())
}

#[derive(Debug, Default)]
struct RawArgs {
    positionals: Vec<String>,
    values: HashMap<&'static str, Vec<String>>,
    switches: Vec<&'static str>,
}

impl RawArgs {
    fn parse(spec: &CommandSpec, tokens: &[String]) -> Result<Self, ParseError> {
        let mut raw = Self::default();
        let mut iter = tokens.iter().peekable();
        while let Some(token) = iter.next() {
            if !looks_like_flag(token) {
                raw.positionals.push(token.clone());
                continue;
            }
            let flag = spec
                .flags
                .iter()
                .find(|f| f.short == token || f.long == token)
                .ok_or_else(|| ParseError::UnknownFlag {
                    command: spec.name,
                    flag: token.clone(),
                })?;
            match flag.arity {
                Arity::Switch => raw.switches.push(flag.long),
                Arity::One => {
                    let value = iter.next().ok_or_else(|| ParseError::MissingFlagValue {
                        command: spec.name,
                        flag: token.clone(),
                    })?;
                    raw.values.insert(flag.long, vec![value.clone()]);
                },
                Arity::Many => {
                    let mut values = Vec::new();
                    while let Some(next) = iter.peek() {
                        if looks_like_flag(next) {
                            break;
                        }
                        values.push((*next).clone());
                        iter.next();
                    }
                    if values.is_empty() {
                        return Err(ParseError::MissingFlagValue {
                            command: spec.name,
                            flag: token.clone(),
                        });
                    }
                    raw.values.entry(flag.long).or_default().extend(values);
                },
            }
        }
        if raw.positionals.len() > spec.max_positionals {
            return Err(ParseError::UnrecognizedArguments(spec.name));
        }
        Ok(raw)
    }

    fn switch(&self, long: &str) -> bool {
        self.switches.iter().any(|s| *s == long)
    }
}

fn parse_integer<T: std::str::FromStr>(
    spec: &CommandSpec,
    value: &str,
) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidInteger {
        command: spec.name,
        value: value.to_string(),
    })
}

fn build_invocation(spec: &CommandSpec, mut raw: RawArgs) -> Result<Invocation, ParseError> {
    let confirm = raw.switch("--confirm");
    let invocation = match spec.kind {
        Kind::Help => {
            let small = raw.switch("--small");
            Invocation::Help {
                commands: raw.positionals,
                small,
            }
        },
        Kind::Save => Invocation::Save { confirm },
        Kind::Quit => Invocation::Quit { confirm },
        Kind::Write => Invocation::SaveQuit { confirm },
        Kind::List => Invocation::List,
        Kind::History => Invocation::History {
            peek: raw.switch("--peek"),
        },
        Kind::Undo => {
            let count = match raw.positionals.first() {
                Some(value) => parse_integer(spec, value)?,
                None => 1,
            };
            Invocation::Undo { count }
        },
        Kind::Reset => Invocation::Reset { confirm },
        Kind::Automate => Invocation::Automate {
            filenames: raw.positionals,
        },
        Kind::Replace => {
            let mut positionals = raw.positionals.into_iter();
            Invocation::Replace {
                find: positionals.next(),
                replace: positionals.next(),
            }
        },
        Kind::Append | Kind::Prepend => {
            let filenames = raw.values.remove("--filenames").unwrap_or_default();
            let padding = raw
                .values
                .remove("--padding")
                .and_then(|mut values| values.pop())
                .unwrap_or_else(|| " ".to_string());
            let mut positionals = raw.positionals.into_iter();
            let args = PendArgs {
                find: positionals.next(),
                value: positionals.next(),
                filenames,
                padding,
            };
            if spec.kind == Kind::Append {
                Invocation::Append(args)
            } else {
                Invocation::Prepend(args)
            }
        },
        Kind::Insert => {
            let mut positionals = raw.positionals.into_iter();
            let value = positionals.next();
            let index = match positionals.next() {
                Some(raw_index) => Some(parse_integer(spec, &raw_index)?),
                None => None,
            };
            Invocation::Insert {
                value,
                index,
                confirm,
            }
        },
        Kind::Case => Invocation::Case {
            styles: raw.positionals,
        },
        Kind::Extension => {
            let mut positionals = raw.positionals.into_iter();
            Invocation::Extension {
                ext: positionals.next(),
                pattern: positionals.next(),
            }
        },
    };
    Ok(invocation)
}
