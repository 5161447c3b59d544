use super::load_site;
use app_utils::{clock_for, yaml::to_yaml};
use colored::*;
use core_restriction::{ConfigurationStore, RestrictionResolver, ViewContext};
use tracing::debug;

pub fn resolve(
    file_path: &str,
    content_id: u64,
    viewer: Option<u64>,
    context: ViewContext,
    at: Option<&str>,
    yaml: bool,
) -> anyhow::Result<()> {
    let site = load_site(file_path)?;

    let now = clock_for(at)?.now()?;
    debug!(now, "evaluation time");

    let resolver = RestrictionResolver::new(&site.catalog, &site.ledger, now);
    let result = resolver.resolve_in(context, content_id, viewer);

    if yaml {
        let output = to_yaml(&result).map_err(|e| anyhow::anyhow!(e))?;
        print!("{}", output);
        return Ok(());
    }

    let title = site
        .catalog
        .content(content_id)
        .map_or("unknown content", |item| item.title.as_str());
    let who = viewer.map_or_else(|| "anonymous".to_string(), |id| format!("viewer {}", id));

    println!(
        "{} {} ({}) for {} in {} context",
        "Resolving".bold(),
        content_id,
        title,
        who,
        context.as_str()
    );

    if result.is_restricted() {
        println!(
            "  {} Restricted: {} (restriction id {})",
            "✗".red(),
            result.reason().to_string().yellow(),
            result.restriction_id()
        );
        println!("  {}", resolver.format_message(&result, viewer));
    } else {
        println!("  {} Accessible", "✓".green());
    }

    Ok(())
}
