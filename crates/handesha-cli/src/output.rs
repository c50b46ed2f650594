//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use handesha_site::i18n::CoverageReport;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::commands::active::ActiveSummary;
use crate::commands::content::ContentPreview;
use crate::commands::membership::MembershipStatus;
use crate::error::{CliError, CliResult};

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_coverage(report: &CoverageReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Table => {
            println!("{:<8} {:>8} {:>8}", "LOCALE", "PRESENT", "MISSING");
            for locale in &report.locales {
                println!(
                    "{:<8} {:>8} {:>8}",
                    locale.locale,
                    locale.present,
                    locale.missing.len()
                );
            }
            println!("total keys: {}", report.total_keys);
            for locale in &report.locales {
                for key in &locale.missing {
                    println!("missing [{}]: {key}", locale.locale);
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn render_active(summary: &ActiveSummary, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(summary)?,
        OutputFormat::Table => {
            println!("{} {}", summary.number, summary.label);
            println!(
                "since {} as of {}: {} year(s), {} month(s)",
                summary.since, summary.today, summary.years, summary.months
            );
            println!("key: {} ({})", summary.key, summary.locale);
        }
    }
    Ok(())
}

pub(crate) fn render_membership(status: &MembershipStatus, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(status)?,
        OutputFormat::Table => {
            let state = if status.open { "open" } else { "closed" };
            println!("registration: {state} at {}", status.at);
            println!("window: {} .. {}", status.opens_at, status.closes_at);
            if status.open {
                println!("form: {}", status.form_url);
            }
        }
    }
    Ok(())
}

pub(crate) fn render_content(preview: &ContentPreview, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(preview)?,
        OutputFormat::Table => {
            println!("overrides applied: {}", preview.overridden);
            println!("{:<20} VALUE", "PROPERTY");
            for (name, value) in &preview.styles {
                println!("{name:<20} {value}");
            }
            println!("{:<20} TEXT", "PANEL FIELD");
            for (field, value) in &preview.edit_panel {
                println!("{field:<20} {value}");
            }
            println!("recolorable: {}", preview.recolorables.join(", "));
            for issue in &preview.issues {
                match &issue.value {
                    Some(value) => println!("rejected {}: {} ({value})", issue.field, issue.reason),
                    None => println!("rejected {}: {}", issue.field, issue.reason),
                }
            }
        }
    }
    Ok(())
}
