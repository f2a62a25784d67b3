use std::path::PathBuf;

use clap::Parser;
use faraid::{CaseDirectory, CaseFile};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow, money};

#[derive(Debug, Parser, Default)]
#[command(about = "Show the estate financials and heir count")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let case = CaseDirectory::open(root)?;
        let currency = case.config().currency();

        match self.output {
            OutputFormat::Json => Self::output_json(case.case())?,
            OutputFormat::Table if self.quiet => Self::output_quiet(case.case()),
            OutputFormat::Table => Self::output_table(case.case(), currency),
        }

        Ok(())
    }

    fn output_json(case: &CaseFile) -> anyhow::Result<()> {
        use serde_json::json;

        let estate = case.estate();
        let output = json!({
            "deceased_name": estate.deceased_name(),
            "created": case.created().to_rfc3339(),
            "total_estate": estate.total_estate(),
            "debts": estate.debts(),
            "funeral_costs": estate.funeral_costs(),
            "bequests": estate.bequests(),
            "max_bequest": estate.max_bequest(),
            "net_estate": estate.net_estate(),
            "heirs": case.roster().len(),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(case: &CaseFile) {
        println!(
            "net_estate={:.2} heirs={}",
            case.estate().net_estate(),
            case.roster().len()
        );
    }

    fn output_table(case: &CaseFile, currency: &str) {
        let estate = case.estate();
        let heirs = case.roster().len();
        let title = estate.deceased_name().map_or_else(
            || "Estate".to_string(),
            |name| format!("Estate of {name}"),
        );
        println!("{title}");
        println!("{}", "─".repeat(title.chars().count()).dim());

        let rows = [
            ("Total estate", money(estate.total_estate(), currency)),
            ("Debts", money(estate.debts(), currency)),
            ("Funeral costs", money(estate.funeral_costs(), currency)),
            (
                "Bequests",
                format!(
                    "{} {}",
                    money(estate.bequests(), currency),
                    format!("(max {})", money(estate.max_bequest(), currency)).dim()
                ),
            ),
            ("Net estate", money(estate.net_estate(), currency)),
        ];

        if is_narrow() {
            for (label, value) in rows {
                println!("{label}: {value}");
            }
            println!("Heirs: {heirs}");
        } else {
            for (label, value) in rows {
                println!("{label:<14} {value}");
            }
            println!("{:<14} {heirs}", "Heirs");
        }

        println!(
            "{}",
            format!("Created {}", case.created().format("%Y-%m-%d")).dim()
        );

        println!();
        if estate.total_estate() <= 0.0 {
            println!("{}", "Set the estate value with 'faraid estate --total'.".dim());
        } else if heirs == 0 {
            println!("{}", "Add heirs with 'faraid heir add'.".dim());
        } else {
            println!("{}", "Run 'faraid calculate' to compute the shares.".dim());
        }
    }
}
