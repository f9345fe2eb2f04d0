//! The rename session: owns the file set, executes commands against it, and
//! runs the interactive and automation dispatch loops.

use crate::case_model::CaseStyle;
use crate::command::{CommandRegistry, Invocation, ParseError, PendArgs};
use crate::console::{classify, Answer, Console};
use crate::pattern;
use crate::record::FileRecord;
use anyhow::{anyhow, bail, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Signal returned by every handler so the loop, not the handler, decides
/// when the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Which end of the name `append`/`prepend` work on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

impl Side {
    fn command_name(self) -> &'static str {
        match self {
            Self::Start => "prepend",
            Self::End => "append",
        }
    }

    fn anchor(self) -> &'static str {
        match self {
            Self::Start => "^",
            Self::End => "$",
        }
    }

    fn value_prompt(self) -> &'static str {
        match self {
            Self::Start => "Prepend: ",
            Self::End => "Append: ",
        }
    }

    /// Padding goes between the existing name and the value on both sides.
    fn pad_value(self, value: &str, padding: &str) -> String {
        match self {
            Self::Start => format!("{value}{padding}"),
            Self::End => format!("{padding}{value}"),
        }
    }

    fn row_pattern(self, pattern: &str) -> Result<Regex> {
        match self {
            Self::Start => pattern::prepend_row(pattern),
            Self::End => pattern::append_row(pattern),
        }
    }
}

/// Owns the file set and executes commands against it. Nothing touches the
/// filesystem until `save` commits the staged names.
pub struct RenameSession {
    files: Vec<FileRecord>,
    registry: CommandRegistry,
    automation_depth: usize,
}

impl RenameSession {
    pub fn new<P: AsRef<Path>>(paths: &[P]) -> Self {
        Self {
            files: paths
                .iter()
                .map(|path| FileRecord::new(path.as_ref()))
                .collect(),
            registry: CommandRegistry::new(),
            automation_depth: 0,
        }
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Interactive dispatch loop: read a line, resolve, execute, repeat
    /// until a terminal command runs or input ends.
    pub fn run(&mut self, console: &mut dyn Console) -> Flow {
        loop {
            let Ok(line) = console.read_line("Action: ") else {
                return Flow::Continue;
            };
            if self.submit(&line, console) == Flow::Quit {
                return Flow::Quit;
            }
        }
    }

    /// Resolve and execute one line of input, reporting parse errors with
    /// contextual help.
    pub fn submit(&mut self, line: &str, console: &mut dyn Console) -> Flow {
        match self.registry.resolve(line) {
            Ok(Some(invocation)) => self.execute(invocation, console),
            Ok(None) => Flow::Continue,
            Err(err) => {
                self.report_parse_error(&err, console);
                Flow::Continue
            },
        }
    }

    fn report_parse_error(&self, err: &ParseError, console: &mut dyn Console) {
        console.write_line(&format!("ERROR: {err}"));
        match err.command().and_then(|name| self.registry.help_for(name)) {
            Some(text) => console.write_line(&text),
            None => {
                if matches!(err, ParseError::UnknownCommand(_)) {
                    console.write_line(&self.registry.help_small());
                }
            },
        }
    }

    /// Execute a parsed invocation. Recoverable errors are reported to the
    /// console and the session carries on; no handler half-applies a change.
    pub fn execute(&mut self, invocation: Invocation, console: &mut dyn Console) -> Flow {
        match self.dispatch(invocation, console) {
            Ok(flow) => flow,
            Err(err) => {
                console.write_line(&format!("ERROR: {err:#}"));
                Flow::Continue
            },
        }
    }

    fn dispatch(&mut self, invocation: Invocation, console: &mut dyn Console) -> Result<Flow> {
        match invocation {
            Invocation::Help { commands, small } => self.help(&commands, small, console),
            Invocation::List => self.print_changes(console),
            Invocation::History { peek } => self.print_history(peek, console),
            Invocation::Quit { confirm } => return self.quit(confirm, console),
            Invocation::Save { confirm } => self.save(confirm, console)?,
            Invocation::SaveQuit { confirm } => return self.save_and_quit(confirm, console),
            Invocation::Undo { count } => self.undo(count, console),
            Invocation::Reset { confirm } => self.reset(confirm, console)?,
            Invocation::Automate { filenames } => return self.automate_command(filenames, console),
            Invocation::Replace { find, replace } => self.find_and_replace(find, replace, console)?,
            Invocation::Append(args) => self.pend(Side::End, args, console)?,
            Invocation::Prepend(args) => self.pend(Side::Start, args, console)?,
            Invocation::Insert {
                value,
                index,
                confirm,
            } => self.insert(value, index, confirm, console)?,
            Invocation::Case { styles } => self.change_case(styles, console)?,
            Invocation::Extension { ext, pattern } => self.change_ext(ext, pattern, console)?,
        }
        Ok(Flow::Continue)
    }

    fn automated(&self) -> bool {
        self.automation_depth > 0
    }

    /// Use the provided value or fall back to prompting. Prompting is not
    /// available while running from an automation file.
    fn required(
        &self,
        value: Option<String>,
        prompt: &str,
        console: &mut dyn Console,
    ) -> Result<String> {
        match value {
            Some(value) => Ok(value),
            None if self.automated() => {
                let label = prompt.trim_end_matches([':', ' ']);
                bail!("missing {label} value; prompts are disabled during automation")
            },
            None => Ok(console.read_line(prompt)?),
        }
    }

    /// Ask a yes/no question, re-asking until the answer classifies. A
    /// `back` answer counts as no. Automation auto-denies unless the
    /// command line carried `-c`.
    fn confirmed(&self, confirm: bool, question: &str, console: &mut dyn Console) -> Result<bool> {
        if confirm {
            return Ok(true);
        }
        if self.automated() {
            return Ok(false);
        }
        let mut answer = classify(&console.read_line(question)?);
        loop {
            match answer {
                Answer::Yes => return Ok(true),
                Answer::No | Answer::Back => return Ok(false),
                Answer::Other => answer = classify(&console.read_line("Yes or No? ")?),
            }
        }
    }

    /// Print committed vs staged path for every file.
    fn print_changes(&self, console: &mut dyn Console) {
        for file in &self.files {
            console.write_line(&format!(
                "{}\n{}\n",
                file.committed_path().display(),
                file.staged_path().display()
            ));
        }
        console.write_line(&"-".repeat(20));
    }

    fn print_history(&self, peek: bool, console: &mut dyn Console) {
        let shown = if peek {
            &self.files[..self.files.len().min(1)]
        } else {
            &self.files[..]
        };
        for file in shown {
            console.write_line(&format!(
                "{}\n{}",
                file.committed_path().display(),
                file.staged_path().display()
            ));
            let names = file.history();
            if names.is_empty() {
                console.write_line("   NA\n");
                continue;
            }
            let width = names.len().to_string().len();
            for (step, name) in names.iter().enumerate() {
                console.write_line(&format!("   {step:>width$}  {name}"));
            }
            console.write_line(&format!(
                "   {:>width$}  {}",
                names.len(),
                file.staged_name()
            ));
            console.write_line(&"~".repeat(20));
        }
    }

    fn help(&self, commands: &[String], small: bool, console: &mut dyn Console) {
        if small {
            console.write_line(&self.registry.help_small());
            return;
        }
        let known: Vec<String> = commands
            .iter()
            .filter_map(|name| self.registry.help_for(&name.to_lowercase()))
            .collect();
        if known.is_empty() {
            console.write_line(&self.registry.help_all());
        } else {
            for text in known {
                console.write_line(&text);
            }
        }
    }

    fn quit(&mut self, confirm: bool, console: &mut dyn Console) -> Result<Flow> {
        if self.confirmed(confirm, "Are you sure you want to quit? ", console)? {
            console.write_line("Thanks for using!");
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }

    /// Commit every staged name. A failed rename is reported and the rest
    /// are still attempted; the failed file keeps its committed name.
    fn save(&mut self, confirm: bool, console: &mut dyn Console) -> Result<()> {
        if !self.confirmed(confirm, "Are you sure you want to save new names? ", console)? {
            console.write_line("No files renamed.");
            return Ok(());
        }
        let mut failures = 0usize;
        for file in &mut self.files {
            if let Err(err) = file.commit() {
                failures += 1;
                console.write_line(&format!("ERROR: {err:#}"));
            }
        }
        if failures == 0 {
            console.write_line("Files renamed.");
        } else {
            console.write_line(&format!("{failures} file(s) could not be renamed."));
        }
        Ok(())
    }

    fn save_and_quit(&mut self, confirm: bool, console: &mut dyn Console) -> Result<Flow> {
        if self.confirmed(confirm, "Are you sure you want to save and quit? ", console)? {
            self.save(true, console)?;
            return self.quit(true, console);
        }
        Ok(Flow::Continue)
    }

    /// Undo up to `count` steps, in lock-step: every file walks back the
    /// same number of steps, bounded by the shortest history in the set.
    fn undo(&mut self, count: usize, console: &mut dyn Console) {
        let shortest = self
            .files
            .iter()
            .map(FileRecord::history_len)
            .min()
            .unwrap_or(0);
        let steps = count.min(shortest);
        for _ in 0..steps {
            for file in &mut self.files {
                file.undo();
            }
        }
        if steps == count && !self.automated() {
            self.print_changes(console);
        }
        console.write_line(if steps < count {
            "All changes have been undone."
        } else {
            "Last change has been undone."
        });
    }

    fn reset(&mut self, confirm: bool, console: &mut dyn Console) -> Result<()> {
        if self.confirmed(confirm, "Are you sure you want to reset all changes? ", console)? {
            for file in &mut self.files {
                file.reset();
            }
            if !self.automated() {
                self.print_changes(console);
            }
        }
        Ok(())
    }

    fn find_and_replace(
        &mut self,
        find: Option<String>,
        replace: Option<String>,
        console: &mut dyn Console,
    ) -> Result<()> {
        let find = self.required(find, "Find: ", console)?;
        let replace = self.required(replace, "Repl: ", console)?;
        let regex = pattern::compile(&find)?;
        let repl = pattern::replacement(&replace);
        self.apply_all(&regex, &repl);
        if !self.automated() {
            self.print_changes(console);
        }
        Ok(())
    }

    fn apply_all(&mut self, regex: &Regex, repl: &str) {
        for file in &mut self.files {
            file.apply(regex, repl);
        }
    }

    fn pend(&mut self, side: Side, args: PendArgs, console: &mut dyn Console) -> Result<()> {
        let PendArgs {
            find,
            value,
            filenames,
            padding,
        } = args;
        let manual_args = find.is_some() || value.is_some();
        if !filenames.is_empty() {
            self.pend_from_files(side, &filenames, &padding, console)?;
        } else if !manual_args {
            if self.automated() {
                bail!(
                    "'{}' needs a pattern or an -f file list in automation",
                    side.command_name()
                );
            }
            match classify(&console.read_line("Load from files? ")?) {
                Answer::Yes => {
                    let line = console.read_line("Filepath(s): ")?;
                    let files = shlex::split(&line).unwrap_or_default();
                    self.pend_from_files(side, &files, &padding, console)?;
                },
                Answer::Back => return Ok(()),
                Answer::No | Answer::Other => {
                    self.pend_manual(side, None, None, &padding, console)?;
                },
            }
        }
        if manual_args {
            self.pend_manual(side, find, value, &padding, console)?;
        }
        if !self.automated() {
            self.print_changes(console);
        }
        Ok(())
    }

    fn pend_manual(
        &mut self,
        side: Side,
        find: Option<String>,
        value: Option<String>,
        padding: &str,
        console: &mut dyn Console,
    ) -> Result<()> {
        let find = self.required(find, "Find: ", console)?;
        let value = self.required(value, side.value_prompt(), console)?;
        let selector = pattern::compile(&find)?;
        self.pend_apply(side, &selector, &value, padding)
    }

    /// Insert the padded value at the side's anchor for every file whose
    /// staged name matches `selector`.
    fn pend_apply(
        &mut self,
        side: Side,
        selector: &Regex,
        value: &str,
        padding: &str,
    ) -> Result<()> {
        let anchor = pattern::compile(side.anchor())?;
        let repl = pattern::literal(&side.pad_value(value, padding));
        for file in &mut self.files {
            if selector.is_match(file.staged_name()) {
                file.apply(&anchor, &repl);
            }
        }
        Ok(())
    }

    /// Apply pattern/value rows from table files. Each row claims the first
    /// file whose staged name matches its pattern; later files and later
    /// rows never steal a match back.
    fn pend_from_files(
        &mut self,
        side: Side,
        filenames: &[String],
        padding: &str,
        console: &mut dyn Console,
    ) -> Result<()> {
        let anchor = pattern::compile(side.anchor())?;
        for filename in filenames {
            let contents = match fs::read_to_string(filename) {
                Ok(contents) => contents,
                Err(_) => {
                    console.write_line(&format!(
                        "Unable to open {filename}; moving to next file provided (if any)"
                    ));
                    continue;
                },
            };
            for line in contents.lines() {
                let Some(tokens) = shlex::split(line) else {
                    continue;
                };
                let (Some(row_pattern), Some(value)) = (tokens.first(), tokens.get(1)) else {
                    continue;
                };
                let row = match side.row_pattern(row_pattern) {
                    Ok(row) => row,
                    Err(err) => {
                        console.write_line(&format!("ERROR: {err:#}"));
                        continue;
                    },
                };
                let repl = pattern::literal(&side.pad_value(value, padding));
                if let Some(file) = self
                    .files
                    .iter_mut()
                    .find(|file| row.is_match(file.staged_name()))
                {
                    file.apply(&anchor, &repl);
                }
            }
        }
        Ok(())
    }

    fn change_ext(
        &mut self,
        ext: Option<String>,
        name_pattern: Option<String>,
        console: &mut dyn Console,
    ) -> Result<()> {
        let ext = self.required(ext, "New Ext: ", console)?;
        let name_pattern = match name_pattern {
            Some(value) => Some(value),
            None if self.automated() => None,
            None => {
                let line = console.read_line("Match Pattern (leave blank for all files): ")?;
                (!line.is_empty()).then_some(line)
            },
        };
        let selector = name_pattern.as_deref().map(pattern::compile).transpose()?;
        for file in &mut self.files {
            file.change_ext(&ext, selector.as_ref());
        }
        if !self.automated() {
            self.print_changes(console);
        }
        Ok(())
    }

    fn change_case(&mut self, styles: Vec<String>, console: &mut dyn Console) -> Result<()> {
        let styles = if styles.is_empty() {
            let line = self.required(None, "Case styles: ", console)?;
            line.split_whitespace().map(str::to_string).collect()
        } else {
            styles
        };
        if styles.is_empty() {
            bail!("no case styles given");
        }
        let resolved = styles
            .iter()
            .map(|name| {
                CaseStyle::from_name(&name.to_lowercase())
                    .ok_or_else(|| anyhow!("unknown case style '{name}'"))
            })
            .collect::<Result<Vec<_>>>()?;
        for file in &mut self.files {
            file.change_case(&resolved);
        }
        if !self.automated() {
            self.print_changes(console);
        }
        Ok(())
    }

    /// Interactive insert: preview the split against the first file until
    /// the index is confirmed, then apply the same pattern everywhere.
    fn insert(
        &mut self,
        value: Option<String>,
        index: Option<i64>,
        confirm: bool,
        console: &mut dyn Console,
    ) -> Result<()> {
        if self.files.is_empty() {
            bail!("insert requires at least one file loaded");
        }
        if self.automated() && !confirm {
            console.write_line("Insert skipped; pass -c to confirm it in automation.");
            return Ok(());
        }
        let value = self.required(value, "Insert: ", console)?;
        let sample = self.files[0].staged_name().to_string();
        let sample_len = sample.chars().count();
        let repl = format!("${{1}}{}${{2}}", pattern::literal(&value));
        let mut index = index;

        let split = loop {
            let num = match index.take() {
                Some(num) => num,
                None if self.automated() => {
                    bail!("missing index value; prompts are disabled during automation")
                },
                None => match console.read_line("Index: ")?.trim().parse::<i64>() {
                    Ok(num) => num,
                    Err(_) => {
                        console.write_line("Please enter a positive or negative integer.");
                        continue;
                    },
                },
            };
            let split = pattern::insert_split(num, sample_len)?;
            console.write_line(&format!(
                "Example: {}",
                split.replace(&sample, repl.as_str())
            ));
            if confirm {
                break split;
            }
            let decision = loop {
                match classify(&console.read_line("Right index? ")?) {
                    Answer::Other => {},
                    answer => break answer,
                }
            };
            match decision {
                Answer::Yes => break split,
                Answer::Back => return Ok(()),
                // A "no" loops back to prompt for a new index.
                _ => {},
            }
        };

        self.apply_all(&split, &repl);
        if !self.automated() {
            self.print_changes(console);
        }
        Ok(())
    }

    fn automate_command(
        &mut self,
        filenames: Vec<String>,
        console: &mut dyn Console,
    ) -> Result<Flow> {
        let filenames = if filenames.is_empty() {
            if self.automated() {
                bail!("'automate' needs at least one filename in automation");
            }
            let line = console.read_line("Filepath(s): ")?;
            shlex::split(&line).unwrap_or_default()
        } else {
            filenames
        };
        let flow = self.automate(&filenames, console);
        if flow == Flow::Continue && !self.automated() {
            self.print_changes(console);
        }
        Ok(flow)
    }

    /// Run newline-delimited command scripts with prompting disabled.
    /// Unreadable scripts are reported and skipped; a bad line is reported
    /// and does not abort the rest. Scripts may nest further `automate`
    /// commands; a confirmed quit anywhere ends the whole run.
    pub fn automate(&mut self, filenames: &[String], console: &mut dyn Console) -> Flow {
        for filename in filenames {
            let contents = match fs::read_to_string(filename) {
                Ok(contents) => contents,
                Err(_) => {
                    console.write_line(&format!(
                        "Unable to open {filename}; moving to next file provided (if any)"
                    ));
                    continue;
                },
            };
            self.automation_depth += 1;
            let flow = self.run_script(&contents, console);
            self.automation_depth -= 1;
            if flow == Flow::Quit {
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    fn run_script(&mut self, contents: &str, console: &mut dyn Console) -> Flow {
        for line in contents.lines() {
            if self.submit(line, console) == Flow::Quit {
                return Flow::Quit;
            }
        }
        Flow::Continue
    }
}
