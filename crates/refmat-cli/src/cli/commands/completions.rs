use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};

pub fn run_completions(shell: Shell) -> Result<()> {
    let mut command = crate::cli::Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
