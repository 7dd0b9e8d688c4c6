//! Retirement Rules CLI
//!
//! Evaluate tool calls, single members or whole member files against the
//! rule tables.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use retirement_rules::citation::DEFAULT_CITATIONS_PATH;
use retirement_rules::member::{load_members, loader::DEFAULT_MEMBERS_PATH};
use retirement_rules::rules::loader::DEFAULT_RULES_PATH;
use retirement_rules::{RulesEngine, ToolCall, DEFAULT_PROJECTION_YEARS};

#[derive(Debug, Parser)]
#[command(name = "retirement-rules", version, about = "Multi-jurisdiction retirement benefit rules engine")]
struct Cli {
    /// Directory holding tax_brackets.csv
    #[arg(long, global = true, default_value = DEFAULT_RULES_PATH)]
    rules_dir: PathBuf,

    /// Citation registry CSV
    #[arg(long, global = true, default_value = DEFAULT_CITATIONS_PATH)]
    citations: PathBuf,

    /// Ignore the data files and use the built-in 2024 tables
    #[arg(long, global = true)]
    builtin: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one JSON tool call (pass `-` to read it from stdin)
    Call { json: String },

    /// Evaluate tax, eligibility and projection for one member of a member file
    Member {
        member_id: String,
        #[arg(long, default_value = DEFAULT_MEMBERS_PATH)]
        members: PathBuf,
        #[arg(long, default_value_t = DEFAULT_PROJECTION_YEARS)]
        years: u32,
    },

    /// Evaluate every member of a member file in parallel and write a CSV summary
    Batch {
        #[arg(long, default_value = DEFAULT_MEMBERS_PATH)]
        members: PathBuf,
        #[arg(long, default_value_t = DEFAULT_PROJECTION_YEARS)]
        years: u32,
        #[arg(long, short, default_value = "member_reports.csv")]
        output: PathBuf,
    },

    /// List the regulation citations in use
    Citations,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let engine = if cli.builtin {
        RulesEngine::new()
    } else {
        RulesEngine::from_csv_path(&cli.rules_dir, &cli.citations).with_context(|| {
            format!(
                "Failed to load rules from {} and {}",
                cli.rules_dir.display(),
                cli.citations.display()
            )
        })?
    };

    match cli.command {
        Command::Call { json } => run_call(&engine, &json),
        Command::Member { member_id, members, years } => run_member(&engine, &member_id, &members, years),
        Command::Batch { members, years, output } => run_batch(&engine, &members, years, &output),
        Command::Citations => {
            println!("{:<16} {:<3} {:<20} {:<48} Authority", "Citation", "", "Tool", "Regulation");
            println!("{}", "-".repeat(120));
            for citation in engine.citations().iter() {
                println!(
                    "{:<16} {:<3} {:<20} {:<48} {}",
                    citation.citation_id,
                    citation.country.code(),
                    citation.tool.as_str(),
                    citation.regulation(),
                    citation.authority
                );
            }
            Ok(())
        }
    }
}

fn run_call(engine: &RulesEngine, json: &str) -> Result<()> {
    let input = if json == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read tool call from stdin")?;
        buf
    } else {
        json.to_string()
    };

    let call: ToolCall = serde_json::from_str(&input).context("Invalid tool call")?;
    let output = engine.dispatch(&call)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_member(engine: &RulesEngine, member_id: &str, members: &Path, years: u32) -> Result<()> {
    let records = load_members(members).with_context(|| format!("Failed to load {}", members.display()))?;
    let Some(record) = records.iter().find(|r| r.profile.member_id == member_id) else {
        bail!("Member {} not found in {}", member_id, members.display());
    };

    let report = engine.evaluate_member(&record.profile, &record.request, years)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_batch(engine: &RulesEngine, members: &Path, years: u32, output: &Path) -> Result<()> {
    let start = Instant::now();
    let records = load_members(members).with_context(|| format!("Failed to load {}", members.display()))?;
    println!("Loaded {} members in {:?}", records.len(), start.elapsed());

    let reports = engine.evaluate_batch(&records, years);

    let file = File::create(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    let mut failed = 0;
    for (record, report) in records.iter().zip(&reports) {
        match report {
            Ok(report) => writer.serialize(report.summary_row())?,
            Err(e) => {
                eprintln!("  {}: {}", record.profile.member_id, e);
                failed += 1;
            }
        }
    }
    writer.flush()?;

    println!(
        "Evaluated {} members ({} failed) in {:?}",
        reports.len(),
        failed,
        start.elapsed()
    );
    println!("Output written to {}", output.display());
    Ok(())
}
