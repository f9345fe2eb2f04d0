use clap::Parser;
use rebatch_core::{Flow, Invocation, RenameSession, StdConsole};
use std::path::PathBuf;

/// Stage batch rename operations interactively, commit them once
#[derive(Parser, Debug)]
#[command(name = "rebatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files to rename
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Command scripts to run before the interactive prompt
    #[arg(short = 'a', long = "auto", value_name = "SCRIPT")]
    auto: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let mut session = RenameSession::new(&cli.files);
    let mut console = StdConsole;

    if !cli.auto.is_empty() {
        let scripts: Vec<String> = cli
            .auto
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        let flow = session.execute(Invocation::Automate { filenames: scripts }, &mut console);
        if flow == Flow::Quit {
            return;
        }
    }

    session.run(&mut console);
}
