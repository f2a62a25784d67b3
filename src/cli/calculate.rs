use std::{path::PathBuf, process};

use clap::Parser;
use faraid::{
    CaseDirectory, Distribution,
    domain::{Completeness, Residue, RuleOptions},
};
use tracing::instrument;

use super::{
    status::OutputFormat,
    terminal::{Colorize, is_narrow, money, percent},
};

#[derive(Debug, Parser)]
#[command(about = "Compute each heir's share of the net estate")]
pub struct Calculate {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Exit with status 2 if the estate is not fully distributed
    #[arg(long)]
    strict: bool,
}

impl Calculate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let case = CaseDirectory::open(root)?;
        let estate = case.case().estate();
        let roster = case.case().roster();

        if roster.is_empty() {
            anyhow::bail!("No heirs to distribute to. Add one with 'faraid heir add'.");
        }
        if estate.total_estate() <= 0.0 {
            anyhow::bail!("The estate has no value. Set it with 'faraid estate --total'.");
        }
        if estate.net_estate() <= 0.0 {
            anyhow::bail!(
                "Nothing to distribute: debts, funeral costs and bequests leave a net estate of \
                 {}",
                money(estate.net_estate(), case.config().currency())
            );
        }

        let options = case.config().rule_options();
        let distribution = case.distribution();

        match self.output {
            OutputFormat::Json => Self::output_json(&case, &distribution)?,
            OutputFormat::Table => Self::output_table(&case, &distribution, &options),
        }

        if self.strict && !distribution.is_complete() {
            process::exit(2);
        }

        Ok(())
    }

    fn output_json(case: &CaseDirectory, distribution: &Distribution) -> anyhow::Result<()> {
        use serde_json::json;

        let heirs: Vec<_> = distribution
            .allocations()
            .iter()
            .map(|allocation| {
                let heir = allocation.heir();
                json!({
                    "id": heir.id(),
                    "name": heir.name().as_str(),
                    "relationship": heir.relationship(),
                    "gender": heir.gender(),
                    "is_alive": heir.is_alive(),
                    "share_percentage": allocation.share_percentage(),
                    "share_amount": allocation.share_amount(),
                })
            })
            .collect();

        let residue = match distribution.residue() {
            Residue::NotReallocated => json!(null),
            Residue::Reallocated {
                percentage,
                total_shares,
            } => json!({ "percentage": percentage, "total_shares": total_shares }),
        };

        let output = json!({
            "deceased_name": case.case().estate().deceased_name(),
            "net_estate": distribution.net_estate(),
            "heirs": heirs,
            "residue": residue,
            "total_percentage": distribution.total_percentage(),
            "total_distributed": distribution.total_distributed(),
            "undistributed": distribution.undistributed(),
            "complete": distribution.is_complete(),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_table(case: &CaseDirectory, distribution: &Distribution, options: &RuleOptions) {
        let currency = case.config().currency();
        let title = case.case().estate().deceased_name().map_or_else(
            || "Distribution".to_string(),
            |name| format!("Distribution of the estate of {name}"),
        );
        println!("{title}");
        println!("{}", "─".repeat(title.chars().count()).dim());

        if is_narrow() {
            for allocation in distribution.allocations() {
                println!(
                    "{} ({}): {} = {}",
                    allocation.heir().name(),
                    allocation.relationship(),
                    percent(allocation.share_percentage()),
                    money(allocation.share_amount(), currency)
                );
            }
            println!(
                "Total: {} = {}",
                percent(distribution.total_percentage()),
                money(distribution.total_distributed(), currency)
            );
        } else {
            println!(
                "{:<24} {:<12} {:>8} {:>16}",
                "Heir", "Relationship", "Share", "Amount"
            );
            for allocation in distribution.allocations() {
                println!(
                    "{:<24} {:<12} {:>8} {:>16}",
                    allocation.heir().name().as_str(),
                    allocation.relationship().as_str(),
                    percent(allocation.share_percentage()),
                    money(allocation.share_amount(), currency)
                );
            }
            println!(
                "{:<37} {:>8} {:>16}",
                "Total",
                percent(distribution.total_percentage()),
                money(distribution.total_distributed(), currency)
            );
        }

        println!();
        println!("Net estate:    {}", money(distribution.net_estate(), currency));
        println!("Undistributed: {}", money(distribution.undistributed(), currency));
        println!();

        let advisory = advisory(distribution, currency);
        if distribution.is_complete() {
            println!("{}", advisory.success());
        } else {
            println!("{}", advisory.warning());
        }

        for note in notes(distribution, options) {
            println!("{}", note.dim());
        }
    }
}

/// Summarises whether the estate was fully handed out.
///
/// Over- and under-allocation are told apart by the total percentage, since
/// the sign of the undistributed amount also depends on the net estate.
fn advisory(distribution: &Distribution, currency: &str) -> String {
    match distribution.completeness() {
        Completeness::Complete => "✅ Estate fully distributed".to_string(),
        Completeness::Incomplete { undistributed } => {
            let gap = money(undistributed.abs(), currency);
            if distribution.total_percentage() > 100.0 {
                format!("⚠️  Shares exceed the estate by {gap}")
            } else {
                format!("⚠️  {gap} of the estate is not distributed")
            }
        }
    }
}

/// Explains why parts of the roster received nothing.
fn notes(distribution: &Distribution, options: &RuleOptions) -> Vec<String> {
    let allocations = distribution.allocations();
    let mut notes = Vec::new();

    let collateral = allocations
        .iter()
        .filter(|allocation| allocation.relationship().is_collateral())
        .count();
    if collateral > 0 {
        notes.push(format!(
            "{collateral} heir(s) outside spouse, parents and children receive no share."
        ));
    }

    let deceased = allocations
        .iter()
        .filter(|allocation| !allocation.heir().is_alive())
        .count();
    if deceased > 0 && !options.exclude_deceased_heirs {
        notes.push(format!(
            "{deceased} deceased heir(s) are counted. Set exclude_deceased_heirs to leave them \
             out."
        ));
    }

    let presence = faraid::domain::Presence::of(
        allocations.iter().map(faraid::Allocation::heir),
        |heir| heir.is_alive() || !options.exclude_deceased_heirs,
    );
    if presence.has_sons()
        && !presence.has_daughters()
        && matches!(distribution.residue(), Residue::NotReallocated)
    {
        notes.push(
            "Sons without daughters receive no residue. Set sons_take_residue to change this."
                .to_string(),
        );
    }

    notes
}
