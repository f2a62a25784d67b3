use faraid::{CaseDirectory, Gender, Heir, HeirName, Relationship};
use tracing::instrument;

use crate::cli::terminal::Colorize;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// The heir's name
    name: String,

    /// Relationship to the deceased (spouse, father, mother, son, daughter,
    /// brother, sister, grandfather, grandmother)
    #[arg(long, short)]
    relationship: Relationship,

    /// Gender, if it differs from the relationship's default
    #[arg(long, short)]
    gender: Option<Gender>,

    /// The heir died before the deceased
    #[arg(long)]
    deceased: bool,
}

impl Command {
    fn heir(self) -> anyhow::Result<Heir> {
        let name = HeirName::new(self.name).map_err(|e| anyhow::anyhow!("{e}"))?;
        let mut heir = Heir::new(name, self.relationship).with_alive(!self.deceased);
        if let Some(gender) = self.gender {
            heir = heir.with_gender(gender);
        }
        Ok(heir)
    }

    #[instrument(skip(case))]
    pub fn run(self, case: &mut CaseDirectory) -> anyhow::Result<()> {
        let heir = self.heir()?;
        let summary = format!("{} ({})", heir.name(), heir.relationship());

        if heir.relationship().is_collateral() {
            println!(
                "{}",
                format!(
                    "ℹ️  A {} receives no share under the supported rules",
                    heir.relationship()
                )
                .info()
            );
        }

        case.case_mut().roster_mut().add(heir);
        case.save()?;

        println!("{}", format!("✅ Added {summary}").success());
        println!(
            "{}",
            format!("{} heir(s) on the roster", case.case().roster().len()).dim()
        );

        Ok(())
    }
}
