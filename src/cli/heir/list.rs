use faraid::CaseDirectory;

use crate::cli::terminal::{Colorize, is_narrow};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Show heir identifiers
    #[arg(long)]
    ids: bool,
}

impl Command {
    pub fn run(self, case: &CaseDirectory) {
        let roster = case.case().roster();
        if roster.is_empty() {
            println!("No heirs yet. Add one with 'faraid heir add'.");
            return;
        }

        let narrow = is_narrow();
        for (position, heir) in roster.iter().enumerate() {
            let mut line = if narrow {
                format!("{}. {} ({})", position + 1, heir.name(), heir.relationship())
            } else {
                format!(
                    "{:>3}. {:<24} {:<12} {:<7}",
                    position + 1,
                    heir.name().as_str(),
                    heir.relationship().as_str(),
                    heir.gender().to_string()
                )
            };
            if !heir.is_alive() {
                line.push_str(&format!(" {}", "deceased".warning()));
            }
            if self.ids {
                line.push_str(&format!(" {}", heir.id().to_string().dim()));
            }
            println!("{}", line.trim_end());
        }
    }
}
