use std::path::{Path, PathBuf};

use clap::Parser;
use faraid::{CaseDirectory, storage::discover};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::instrument;

use super::{
    status::OutputFormat,
    terminal::{Colorize, is_narrow, money},
};

#[derive(Debug, Parser)]
pub struct Batch {
    /// Directory to search for cases
    dir: PathBuf,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

/// The outcome of computing one case.
#[derive(Debug)]
struct Summary {
    path: PathBuf,
    result: Result<Computed, String>,
}

#[derive(Debug)]
struct Computed {
    deceased_name: Option<String>,
    heirs: usize,
    net_estate: f64,
    distributed: f64,
    complete: bool,
    currency: String,
}

impl Computed {
    fn of(case: &CaseDirectory) -> Self {
        let distribution = case.distribution();
        Self {
            deceased_name: case.case().estate().deceased_name().map(ToString::to_string),
            heirs: case.case().roster().len(),
            net_estate: distribution.net_estate(),
            distributed: distribution.total_distributed(),
            complete: distribution.is_complete(),
            currency: case.config().currency().to_string(),
        }
    }
}

fn compute_all(roots: &[PathBuf], progress: &ProgressBar) -> Vec<Summary> {
    roots
        .par_iter()
        .map(|root| {
            let result = CaseDirectory::open(root.clone())
                .map(|case| Computed::of(&case))
                .map_err(|e| e.to_string());
            if let Err(e) = &result {
                tracing::warn!("{e}");
            }
            progress.inc(1);
            Summary {
                path: root.clone(),
                result,
            }
        })
        .collect()
}

impl Batch {
    #[instrument]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let dir = root.join(&self.dir);
        let roots = discover(&dir);
        if roots.is_empty() {
            println!("No cases found below {}", dir.display());
            return Ok(());
        }
        tracing::info!("Found {} case(s)", roots.len());

        let progress = match self.output {
            OutputFormat::Table => ProgressBar::new(roots.len() as u64).with_style(
                ProgressStyle::with_template("{bar:40} {pos}/{len} cases")?,
            ),
            OutputFormat::Json => ProgressBar::hidden(),
        };
        let summaries = compute_all(&roots, &progress);
        progress.finish_and_clear();

        match self.output {
            OutputFormat::Json => Self::output_json(&summaries, &dir)?,
            OutputFormat::Table => Self::output_table(&summaries, &dir),
        }

        let failed = summaries.iter().filter(|s| s.result.is_err()).count();
        if failed > 0 {
            anyhow::bail!("{failed} case(s) could not be loaded");
        }

        Ok(())
    }

    fn output_json(summaries: &[Summary], dir: &Path) -> anyhow::Result<()> {
        use serde_json::json;

        let cases: Vec<_> = summaries
            .iter()
            .map(|summary| {
                let path = display_path(&summary.path, dir);
                match &summary.result {
                    Ok(computed) => json!({
                        "path": path,
                        "deceased_name": computed.deceased_name,
                        "heirs": computed.heirs,
                        "net_estate": computed.net_estate,
                        "total_distributed": computed.distributed,
                        "complete": computed.complete,
                    }),
                    Err(error) => json!({
                        "path": path,
                        "error": error,
                    }),
                }
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&cases)?);
        Ok(())
    }

    fn output_table(summaries: &[Summary], dir: &Path) {
        let narrow = is_narrow();
        if !narrow {
            println!(
                "{:<28} {:>6} {:>16} {:>16}  Status",
                "Case", "Heirs", "Net estate", "Distributed"
            );
        }

        for summary in summaries {
            let path = display_path(&summary.path, dir);
            match &summary.result {
                Ok(computed) => {
                    let status = if computed.complete {
                        "complete".success()
                    } else {
                        "incomplete".warning()
                    };
                    if narrow {
                        println!(
                            "{path}: {} of {} ({status})",
                            money(computed.distributed, &computed.currency),
                            money(computed.net_estate, &computed.currency)
                        );
                    } else {
                        println!(
                            "{path:<28} {:>6} {:>16} {:>16}  {status}",
                            computed.heirs,
                            money(computed.net_estate, &computed.currency),
                            money(computed.distributed, &computed.currency)
                        );
                    }
                }
                Err(error) => println!("{path}: {}", error.warning()),
            }
        }

        let incomplete = summaries
            .iter()
            .filter(|s| matches!(&s.result, Ok(computed) if !computed.complete))
            .count();
        println!();
        println!(
            "{}",
            format!(
                "{} case(s), {incomplete} not fully distributed",
                summaries.len()
            )
            .dim()
        );
    }
}

fn display_path(path: &Path, dir: &Path) -> String {
    match path.strip_prefix(dir) {
        Ok(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Ok(relative) => relative.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}
