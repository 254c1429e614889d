use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::{Cli, CompletionShell};
use crate::error::CliError;

const BIN_NAME: &str = "daybook";

pub fn run_completions(shell: CompletionShell, output_path: Option<&Path>) -> Result<(), CliError> {
    let script = render_completions(shell);

    if let Some(path) = output_path {
        std::fs::write(path, &script)?;
        println!("{}", path.display());
    } else {
        io::stdout().write_all(&script)?;
    }

    Ok(())
}

pub fn render_completions(shell: CompletionShell) -> Vec<u8> {
    let shell = match shell {
        CompletionShell::Bash => Shell::Bash,
        CompletionShell::Zsh => Shell::Zsh,
        CompletionShell::Fish => Shell::Fish,
        CompletionShell::PowerShell => Shell::PowerShell,
    };
    let mut buffer = Vec::new();
    generate(shell, &mut Cli::command(), BIN_NAME, &mut buffer);
    buffer
}
