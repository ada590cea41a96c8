use std::{fs, io::Write, time::Duration};

use anyhow::{Context, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Stream::Stderr};

use crate::{
    cli::{Cli, Command},
    page::{Outcome, PageOptions},
};

mod cli;
mod dom;
mod loader;
mod logging;
mod page;
mod record;
mod render;
mod report;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::init(args.verbose);
    match args.command {
        Command::Render {
            input,
            out,
            fragment,
            title,
            no_error_area,
            strict,
        } => {
            let source = input.source()?;
            let mut doc = page::skeleton(&PageOptions {
                title,
                error_area: !no_error_area,
            });

            let spinner = spinner(&source);
            let outcome = page::load_into(&mut doc, &source, input.timeout());
            spinner.finish_and_clear();

            let html = if fragment {
                page::fragment(&doc) + "\n"
            } else {
                doc.to_string()
            };
            match &out {
                Some(path) => fs::write(path, html)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => std::io::stdout()
                    .write_all(html.as_bytes())
                    .context("failed to write page to stdout")?,
            }

            match outcome {
                Outcome::Rendered { records, groups } => eprintln!(
                    "{} {records} records in {groups} years",
                    "✓".if_supports_color(Stderr, |t| t.green())
                ),
                Outcome::Failed(err) => {
                    eprintln!("{} {err}", "✗".if_supports_color(Stderr, |t| t.red()));
                    if strict {
                        bail!("publications could not be loaded from {source}");
                    }
                }
            }
        }
        Command::Summary { input } => {
            let source = input.source()?;
            let spinner = spinner(&source);
            let records = loader::load(&source, input.timeout());
            spinner.finish_and_clear();
            let records = records.with_context(|| format!("loading {source}"))?;

            let mut stdout = std::io::stdout().lock();
            for group in render::group_by_year(&records) {
                writeln!(stdout, "{:<10} {}", group.year.to_string(), group.records.len())?;
            }
        }
    }
    Ok(())
}

fn spinner(source: &cli::Source) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("loading {source}"));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
