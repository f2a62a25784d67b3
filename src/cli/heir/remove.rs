use faraid::{CaseDirectory, Heir};
use tracing::instrument;
use uuid::Uuid;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Position of the heir as shown by 'faraid heir list' (starting at 1)
    #[arg(required_unless_present = "id", conflicts_with = "id")]
    index: Option<usize>,

    /// Identifier of the heir
    #[arg(long)]
    id: Option<Uuid>,

    /// Skip confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Command {
    /// Finds the heir the arguments point at, without removing it.
    fn target<'a>(&self, case: &'a CaseDirectory) -> anyhow::Result<&'a Heir> {
        let roster = case.case().roster();
        match (self.index, self.id) {
            (_, Some(id)) => roster
                .get(id)
                .ok_or_else(|| anyhow::anyhow!("No heir with id {id}")),
            (Some(index), None) => index
                .checked_sub(1)
                .and_then(|i| roster.as_slice().get(i))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "No heir at position {index}; the roster has {} heir(s)",
                        roster.len()
                    )
                }),
            (None, None) => anyhow::bail!("Give a list position or --id"),
        }
    }

    #[instrument(skip(case))]
    pub fn run(self, case: &mut CaseDirectory) -> anyhow::Result<()> {
        let heir = self.target(case)?;
        let id = heir.id();
        let summary = format!("{} ({})", heir.name(), heir.relationship());

        if !self.yes {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!("Remove {summary}?"))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Cancelled");
                std::process::exit(130);
            }
        }

        case.case_mut().roster_mut().remove(id);
        case.save()?;

        println!("{}", format!("✅ Removed {summary}").success());
        Ok(())
    }
}
