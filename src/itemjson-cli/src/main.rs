mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use itemjson::{Options, RunSummary};
use std::io::{self, Write};

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let options = Options::new(&cli.file, &cli.outdir);
    let summary = itemjson::run(&options)
        .with_context(|| format!("Failed to convert {}", cli.file.display()))?;

    print_report(&mut io::stdout().lock(), &mut io::stderr().lock(), &summary)?;

    Ok(())
}

/// Per-file results followed by the run totals.
///
/// Category failures go to `err`, everything else to `out`.
fn print_report(
    out: &mut impl Write,
    err: &mut impl Write,
    summary: &RunSummary,
) -> io::Result<()> {
    let export = &summary.export;
    writeln!(out, "All items saved to {}", export.aggregate.path.display())?;

    for category in &export.categories {
        match &category.result {
            Ok(()) => writeln!(
                out,
                "Category '{}' saved to {} ({} items)",
                category.category,
                category.path.display(),
                category.items
            )?,
            Err(e) => writeln!(err, "Error: {}", e)?,
        }
    }

    writeln!(out)?;
    writeln!(out, "Total items processed: {}", summary.total_items)?;
    writeln!(out, "Items exported to {} category files", export.written())?;

    Ok(())
}
