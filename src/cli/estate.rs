use std::path::PathBuf;

use clap::Parser;
use faraid::{
    CaseDirectory,
    domain::{BequestOutcome, EstateError},
};
use tracing::instrument;

use super::terminal::{Colorize, money};

/// Edit the estate financials.
///
/// Only the given values change. The total is applied first, so bequests are
/// checked against the new total.
#[derive(Debug, Parser)]
pub struct Estate {
    /// Name of the deceased (empty to clear)
    #[arg(long)]
    deceased: Option<String>,

    /// Gross value of the estate
    #[arg(long, allow_negative_numbers = true)]
    total: Option<f64>,

    /// Outstanding debts
    #[arg(long, allow_negative_numbers = true)]
    debts: Option<f64>,

    /// Funeral costs
    #[arg(long, allow_negative_numbers = true)]
    funeral_costs: Option<f64>,

    /// Bequests to non-heirs (at most a third of the total)
    #[arg(long, allow_negative_numbers = true)]
    bequests: Option<f64>,
}

impl Estate {
    const fn is_empty(&self) -> bool {
        self.deceased.is_none()
            && self.total.is_none()
            && self.debts.is_none()
            && self.funeral_costs.is_none()
            && self.bequests.is_none()
    }

    #[instrument]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        if self.is_empty() {
            anyhow::bail!(
                "Nothing to change. Pass at least one of --deceased, --total, --debts, \
                 --funeral-costs or --bequests"
            );
        }

        let mut case = CaseDirectory::open(root)?;
        let currency = case.config().currency().to_string();

        let outcomes = self.apply(case.case_mut().estate_mut())?;
        for outcome in outcomes {
            if let BequestOutcome::Clamped { requested, stored } = outcome {
                println!(
                    "{}",
                    format!(
                        "⚠️  Bequests of {} exceed a third of the estate; capped at {}",
                        money(requested, &currency),
                        money(stored, &currency)
                    )
                    .warning()
                );
            }
        }

        case.save()?;

        let estate = case.case().estate();
        println!(
            "{}",
            format!("Net estate: {}", money(estate.net_estate(), &currency)).success()
        );

        Ok(())
    }

    /// Applies the requested changes, total first.
    fn apply(self, estate: &mut faraid::EstateCase) -> Result<Vec<BequestOutcome>, EstateError> {
        let mut outcomes = Vec::new();

        if let Some(name) = self.deceased {
            estate.set_deceased_name(Some(name));
        }
        if let Some(total) = self.total {
            outcomes.push(estate.set_total_estate(total)?);
        }
        if let Some(debts) = self.debts {
            estate.set_debts(debts)?;
        }
        if let Some(funeral_costs) = self.funeral_costs {
            estate.set_funeral_costs(funeral_costs)?;
        }
        if let Some(bequests) = self.bequests {
            outcomes.push(estate.set_bequests(bequests)?);
        }

        Ok(outcomes)
    }
}
