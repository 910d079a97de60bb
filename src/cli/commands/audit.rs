use std::collections::HashMap;

use anyhow::{anyhow, Result};
use dialoguer::Select;

use taxon::session::EditorSession;

use crate::cli::ui;

/// Completeness audit command
pub async fn check(session: &EditorSession) -> Result<()> {
    let spinner = ui::create_spinner("Running completeness audit...");
    let report = session.check_completeness().await?;
    spinner.finish_and_clear();

    ui::print_header("Completeness Audit");
    if report.is_complete() {
        ui::print_success("The knowledge schema is complete");
        return Ok(());
    }

    if !report.incomplete_types.is_empty() {
        println!("Incomplete types:");
        for finding in &report.incomplete_types {
            match &finding.type_name {
                Some(name) => ui::print_item(&format!("{}: {}", name, finding.reason)),
                None => ui::print_item(&finding.reason),
            }
        }
    }
    if !report.properties_without_values.is_empty() {
        println!("Properties without possible values:");
        for name in &report.properties_without_values {
            ui::print_item(name);
        }
    }
    Ok(())
}

/// Classification command: rule-based solver or the learned model
pub async fn classify(
    session: &EditorSession,
    ai: bool,
    pairs: &[String],
    interactive: bool,
) -> Result<()> {
    let chosen = if interactive {
        prompt_values(session)?
    } else {
        parse_pairs(pairs)?
    };

    let spinner = ui::create_spinner("Classifying...");
    if ai {
        let verdict = match session.classify_ai(&chosen).await {
            Ok(verdict) => {
                spinner.finish_and_clear();
                verdict
            }
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e.into());
            }
        };
        ui::print_header("Classification (learned model)");
        ui::print_result("Predicted type", &verdict.type_name);
        println!("\nExplanation:");
        for line in &verdict.explanation {
            ui::print_text(line);
        }
        println!("\nProbabilities:");
        let mut ranked: Vec<_> = verdict.probabilities.iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
        for (type_name, probability) in ranked {
            ui::print_item(&format!("{}: {:.4}", type_name, probability));
        }
    } else {
        let verdict = match session.classify(&chosen).await {
            Ok(verdict) => {
                spinner.finish_and_clear();
                verdict
            }
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e.into());
            }
        };
        ui::print_header("Classification (rule-based)");
        ui::print_result("Predicted type", &verdict.type_name);
        println!("\nExplanation:");
        for line in &verdict.explanation {
            ui::print_text(line);
        }
    }
    Ok(())
}

/// Parse `name=value` arguments into a selection map
fn parse_pairs(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut chosen = HashMap::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected NAME=VALUE, got '{}'", pair))?;
        chosen.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok(chosen)
}

/// Walk every property, offering its domain values plus a skip option
fn prompt_values(session: &EditorSession) -> Result<HashMap<String, String>> {
    let mut chosen = HashMap::new();
    for property in session.store().properties() {
        let values = session.store().values_of_property(&property.name);
        if values.is_empty() {
            ui::print_warning(&format!(
                "Property '{}' has no possible values, skipping",
                property.name
            ));
            continue;
        }
        let mut options = vec!["(not selected)".to_string()];
        options.extend(values.iter().cloned());
        let picked = Select::with_theme(&ui::get_theme())
            .with_prompt(format!("Value for '{}'", property.name))
            .items(&options)
            .default(0)
            .interact()?;
        if picked > 0 {
            chosen.insert(property.name.clone(), values[picked - 1].clone());
        }
    }
    Ok(chosen)
}
