use std::path::PathBuf;

use faraid::CaseDirectory;
use tracing::instrument;

mod add;
mod list;
mod remove;

#[derive(Debug, clap::Parser)]
pub struct Command {
    #[command(subcommand)]
    command: HeirCommand,
}

#[derive(Debug, clap::Parser)]
enum HeirCommand {
    /// Add an heir to the roster
    Add(add::Command),

    /// Remove an heir by list position or identifier
    Remove(remove::Command),

    /// List the heirs in the order they were added
    List(list::Command),
}

impl Command {
    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut case = CaseDirectory::open(root)?;

        match self.command {
            HeirCommand::Add(add) => add.run(&mut case),
            HeirCommand::Remove(remove) => remove.run(&mut case),
            HeirCommand::List(list) => {
                list.run(&case);
                Ok(())
            }
        }
    }
}
