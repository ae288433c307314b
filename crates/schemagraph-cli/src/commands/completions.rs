//! `completions` subcommand

use std::io::Write;

use clap::{Args, CommandFactory};
use clap_complete::Shell;

use crate::Cli;

#[derive(Args)]
pub struct CompletionsArgs {
    /// bash, elvish, fish, powershell or zsh
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `schemagraph` to `out`
pub fn run(args: &CompletionsArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, bin, &mut *out);
    out.flush()?;
    Ok(())
}
