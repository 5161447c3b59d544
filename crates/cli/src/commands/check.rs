use super::load_site;
use colored::*;
use std::collections::BTreeMap;

pub fn check(file_path: &str) -> anyhow::Result<()> {
    println!("{} {}", "Checking site:".bold(), file_path);

    let site = load_site(file_path)?;
    let catalog = &site.catalog;

    // Count content by kind
    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for item in catalog.items() {
        *kinds.entry(item.kind.type_name()).or_default() += 1;
    }

    println!("  {} Content items: {}", "✓".green(), catalog.len());
    for (kind, count) in &kinds {
        println!("      {}: {}", kind, count);
    }
    println!("  {} Tracks: {}", "✓".green(), catalog.tracks().count());
    println!("  {} Viewers: {}", "✓".green(), site.ledger.viewer_count());

    match catalog.options().membership_required {
        Some(id) => println!("  {} Sitewide membership: {}", "✓".green(), id),
        None => println!("  {} Sitewide membership: none", "✓".green()),
    }

    // Dangling references never fail resolution but are worth fixing
    let warnings = catalog.lint();
    for warning in &warnings {
        println!("  {} {}", "⚠".yellow(), warning);
    }

    // Summary
    println!();
    if warnings.is_empty() {
        println!("{} Site is valid!", "✓".green().bold());
    } else {
        println!(
            "{} Site is valid with {} warning(s)",
            "⚠".yellow().bold(),
            warnings.len()
        );
    }

    Ok(())
}
