//! Plain and JSON renderings of query results

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use qoelog_engine::LogSearch;
use qoelog_runtime::{FileOutcome, ResolvedFiles, SyncReport};
use qoelog_types::{ArgValue, LogEntry, format_log_date};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeSet;

use crate::types::OutputFormat;

#[derive(Serialize)]
struct FoundItem<'a> {
    index: usize,
    entry: &'a LogEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    argument: Option<Option<&'a ArgValue>>,
}

fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

fn status(entry: &LogEntry, color: bool) -> String {
    let (text, failed) = match (entry.complete, entry.error) {
        (_, true) => ("error", true),
        (false, false) => ("incomplete", true),
        (true, false) => ("ok", false),
    };
    match (color, failed) {
        (true, true) => text.red().to_string(),
        (true, false) => text.green().to_string(),
        (false, _) => text.to_string(),
    }
}

/// Found entries, optionally with one argument's value per entry
pub fn print_found(
    search: &LogSearch,
    show_arg: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let values = show_arg.map(|name| search.arg_query(name));

    match format {
        OutputFormat::Json => {
            let found: Vec<FoundItem> = search
                .found_entries()
                .enumerate()
                .map(|(n, (index, entry))| FoundItem {
                    index,
                    entry,
                    argument: values.as_ref().map(|v| v[n]),
                })
                .collect();
            let out = json!({ "total": search.len(), "found": found });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Plain => {
            let color = use_color();
            for (n, (index, entry)) in search.found_entries().enumerate() {
                let operation = if color {
                    entry.operation.cyan().to_string()
                } else {
                    entry.operation.clone()
                };
                let mut line = format!(
                    "{:>5}  {}  {:<12}  {:<10}  {}",
                    index,
                    format_log_date(&entry.date),
                    operation,
                    status(entry, color),
                    entry.log_file
                );
                if let Some(values) = &values {
                    let shown = values[n].map_or_else(|| "-".to_string(), ArgValue::to_string);
                    line.push_str(&format!("  {}", shown));
                }
                println!("{}", line);
            }
            println!("{} of {} entries", search.found().len(), search.len());
        }
    }
    Ok(())
}

pub fn print_fields(names: &BTreeSet<String>, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(names)?),
        OutputFormat::Plain => {
            for name in names {
                println!("{}", name);
            }
        }
    }
    Ok(())
}

fn outcome_json(outcome: &FileOutcome) -> Value {
    match outcome {
        FileOutcome::Files(paths) => json!({ "status": "found", "paths": paths }),
        other => json!({
            "status": other.label().trim_start_matches(':').to_lowercase(),
            "paths": []
        }),
    }
}

pub fn print_files(resolved: &[ResolvedFiles], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let items: Vec<Value> = resolved
                .iter()
                .map(|r| {
                    let mut item = outcome_json(&r.outcome);
                    item["index"] = json!(r.index);
                    item
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ "files": items }))?);
        }
        OutputFormat::Plain => {
            let color = use_color();
            for r in resolved {
                match &r.outcome {
                    FileOutcome::Files(paths) => {
                        for path in paths {
                            println!("{:>5}  {}", r.index, path.display());
                        }
                    }
                    other if color => println!("{:>5}  {}", r.index, other.label().yellow()),
                    other => println!("{:>5}  {}", r.index, other.label()),
                }
            }
        }
    }
    Ok(())
}

pub fn print_sync(report: &SyncReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let out = json!({ "copied": report.copied, "files": report.files });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Plain => {
            for path in &report.copied {
                eprintln!("copied {}", path.display());
            }
            for path in &report.files {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

