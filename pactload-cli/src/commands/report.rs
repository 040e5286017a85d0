//! Shared pact listing output (table or JSON).

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use pactload_core::PactDocument;

#[derive(Tabled)]
struct PactRow {
    #[tabled(rename = "consumer")]
    consumer: String,
    #[tabled(rename = "provider")]
    provider: String,
    #[tabled(rename = "interactions")]
    interactions: usize,
    #[tabled(rename = "spec")]
    spec: String,
    #[tabled(rename = "source")]
    source: String,
}

#[derive(Serialize)]
struct ReportJson<'a> {
    source: &'a str,
    pacts: Vec<PactJson<'a>>,
}

#[derive(Serialize)]
struct PactJson<'a> {
    consumer: &'a str,
    provider: &'a str,
    interactions: usize,
    spec_version: Option<&'a str>,
    source: &'a str,
}

/// Print `pacts` loaded from `description`.
pub fn print(description: &str, pacts: &[PactDocument], json: bool) -> Result<()> {
    if json {
        return print_json(description, pacts);
    }
    print_table(description, pacts);
    Ok(())
}

fn print_json(description: &str, pacts: &[PactDocument]) -> Result<()> {
    let payload = ReportJson {
        source: description,
        pacts: pacts
            .iter()
            .map(|p| PactJson {
                consumer: &p.consumer.name,
                provider: &p.provider.name,
                interactions: p.interaction_count(),
                spec_version: p.spec_version(),
                source: &p.source,
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize pact listing")?
    );
    Ok(())
}

fn print_table(description: &str, pacts: &[PactDocument]) {
    println!("{} | {} pact(s)", description.bold(), pacts.len());
    if pacts.is_empty() {
        println!("{}", "No pacts found.".yellow());
        return;
    }
    let rows: Vec<PactRow> = pacts
        .iter()
        .map(|p| PactRow {
            consumer: p.consumer.name.clone(),
            provider: p.provider.name.clone(),
            interactions: p.interaction_count(),
            spec: p.spec_version().unwrap_or("-").to_string(),
            source: p.source.clone(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
