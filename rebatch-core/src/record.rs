//! Per-file rename state: the name on disk, the staged working name, and the
//! trail of staged names recorded since the last baseline.

use crate::case_model::CaseStyle;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// One file being renamed.
///
/// Every transformation pushes the pre-change staged name onto `history`, so
/// `undo` can walk back one step at a time. `save` and `reset` establish a new
/// baseline and clear the trail.
#[derive(Debug, Clone)]
pub struct FileRecord {
    directory: PathBuf,
    original: String,
    original_ext: String,
    committed: String,
    committed_ext: String,
    staged: String,
    ext: String,
    history: Vec<String>,
}

impl FileRecord {
    pub fn new(path: &Path) -> Self {
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let base = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (name, ext) = split_ext(&base);
        Self {
            directory,
            original: name.clone(),
            original_ext: ext.clone(),
            committed: name.clone(),
            committed_ext: ext.clone(),
            staged: name,
            ext,
            history: Vec::new(),
        }
    }

    /// Staged base name, without directory or extension.
    pub fn staged_name(&self) -> &str {
        &self.staged
    }

    /// Staged file name, extension included.
    pub fn staged_file(&self) -> String {
        format!("{}{}", self.staged, self.ext)
    }

    pub fn staged_path(&self) -> PathBuf {
        self.directory.join(self.staged_file())
    }

    /// File name as it currently exists on disk.
    pub fn committed_file(&self) -> String {
        format!("{}{}", self.committed, self.committed_ext)
    }

    pub fn committed_path(&self) -> PathBuf {
        self.directory.join(self.committed_file())
    }

    /// Staged names recorded since the last baseline, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Substitute every match of `find` in the staged name.
    pub fn apply(&mut self, find: &Regex, repl: &str) {
        self.history.push(self.staged.clone());
        self.staged = find.replace_all(&self.staged, repl).into_owned();
    }

    /// Fold a sequence of case transforms over the staged name. The whole
    /// sequence counts as one undo step.
    pub fn change_case(&mut self, styles: &[CaseStyle]) {
        self.history.push(self.staged.clone());
        for style in styles {
            self.staged = style.apply(&self.staged);
        }
    }

    /// Replace the staged extension when `pattern` is absent or matches the
    /// staged name. The staged name itself is unchanged, but the step is
    /// still recorded so undo stays in lock-step across the file set.
    pub fn change_ext(&mut self, new_ext: &str, pattern: Option<&Regex>) {
        self.history.push(self.staged.clone());
        if pattern.is_none_or(|p| p.is_match(&self.staged)) {
            self.ext = normalize_ext(new_ext);
        }
    }

    /// Walk the staged name back one step. Returns false once the trail is
    /// exhausted.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(name) => {
                self.staged = name;
                true
            },
            None => false,
        }
    }

    /// Discard all staged state and return to the load-time name. The
    /// committed name is left alone: the file is still wherever the last
    /// save put it, and a later save renames it back.
    pub fn reset(&mut self) {
        self.staged = self.original.clone();
        self.ext = self.original_ext.clone();
        self.history.clear();
    }

    /// Rename the file on disk to the staged name and make that the new
    /// baseline. On failure the committed name is untouched.
    pub fn commit(&mut self) -> Result<()> {
        let old = self.committed_path();
        let new = self.staged_path();
        if old != new {
            fs::rename(&old, &new).with_context(|| {
                format!("failed to rename {} -> {}", old.display(), new.display())
            })?;
        }
        self.committed = self.staged.clone();
        self.committed_ext = self.ext.clone();
        self.history.clear();
        Ok(())
    }
}

/// Split a file name at the last dot. A dot in the first position does not
/// start an extension, so `.bashrc` has none.
fn split_ext(base: &str) -> (String, String) {
    match base.rfind('.') {
        Some(idx) if idx > 0 => (base[..idx].to_string(), base[idx..].to_string()),
        _ => (base.to_string(), String::new()),
    }
}

/// Ensure the extension carries its leading dot. Empty stays empty, which
/// removes the extension.
fn normalize_ext(ext: &str) -> String {
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str) -> FileRecord {
        FileRecord::new(Path::new(path))
    }

    #[test]
    fn splits_directory_name_and_extension() {
        let rec = record("test/res/file.txt");
        assert_eq!(rec.staged_name(), "file");
        assert_eq!(rec.staged_file(), "file.txt");
        assert_eq!(rec.committed_path(), PathBuf::from("test/res/file.txt"));
    }

    #[test]
    fn bare_name_gets_a_dot_directory_and_dotfiles_have_no_extension() {
        assert_eq!(record("file.txt").staged_path(), PathBuf::from("./file.txt"));
        assert_eq!(record(".bashrc").staged_file(), ".bashrc");
        assert_eq!(record("a.b.c").staged_name(), "a.b");
    }

    #[test]
    fn apply_records_history_and_undo_pops_it() {
        let mut rec = record("file.txt");
        let find = Regex::new("file").unwrap();
        rec.apply(&find, "bar");
        assert_eq!(rec.staged_name(), "bar");
        assert_eq!(rec.history(), ["file"]);
        assert!(rec.undo());
        assert_eq!(rec.staged_name(), "file");
        assert!(!rec.undo());
    }

    #[test]
    fn change_ext_normalizes_and_respects_the_pattern() {
        let mut rec = record("file.txt");
        rec.change_ext("tsv", None);
        assert_eq!(rec.staged_file(), "file.tsv");
        rec.change_ext(".md", Some(&Regex::new("nope").unwrap()));
        assert_eq!(rec.staged_file(), "file.tsv");
        rec.change_ext(".md", Some(&Regex::new("file").unwrap()));
        assert_eq!(rec.staged_file(), "file.md");
        assert_eq!(rec.history_len(), 3);
    }

    #[test]
    fn reset_returns_to_the_load_time_name() {
        let mut rec = record("file.txt");
        rec.apply(&Regex::new("f").unwrap(), "gr");
        rec.change_ext("tsv", None);
        rec.reset();
        assert_eq!(rec.staged_file(), "file.txt");
        assert_eq!(rec.history_len(), 0);
        assert!(!rec.undo());
    }

    #[test]
    fn commit_renames_on_disk_and_clears_the_trail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        fs::write(&path, "").unwrap();

        let mut rec = FileRecord::new(&path);
        rec.apply(&Regex::new("file").unwrap(), "bar");
        rec.commit().unwrap();

        assert!(dir.path().join("bar.txt").is_file());
        assert!(!path.exists());
        assert_eq!(rec.committed_file(), "bar.txt");
        assert_eq!(rec.history_len(), 0);
    }

    #[test]
    fn failed_commit_keeps_the_committed_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let mut rec = FileRecord::new(&path);
        rec.apply(&Regex::new("missing").unwrap(), "found");
        assert!(rec.commit().is_err());
        assert_eq!(rec.committed_file(), "missing.txt");
        assert_eq!(rec.history_len(), 1);
    }
}
