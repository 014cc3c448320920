use anyhow::{bail, Context, Result};
use localization_table::{
    LocalizationConfig, LocalizedEntity, MemoryBackend, OwnerId, TranslatableSchema,
};
use std::sync::Arc;
use tracing::info;

const USAGE: &str = "Usage: localization-table <attribute> [<locale-code>=<value>]...";

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("localization_table=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let attribute = match args.next() {
        Some(attribute) => attribute,
        None => bail!(USAGE),
    };
    let assignments = args
        .map(|arg| parse_assignment(&arg))
        .collect::<Result<Vec<_>>>()?;

    // Load configuration from environment
    let config = LocalizationConfig::from_env()?;
    let resolver = config.resolver();

    let schema = Arc::new(TranslatableSchema::new("Record", [attribute.as_str()]));
    let backend = MemoryBackend::new();
    let mut entity = LocalizedEntity::new(OwnerId(1), schema, backend.clone());
    entity.initialize(&config)?;

    for (code, value) in &assignments {
        let locale = config
            .directory
            .find_by_code(code)?
            .with_context(|| format!("Unknown locale code: '{}'", code))?;
        info!("Writing {} for {}", attribute, locale);
        resolver.write_for(&mut entity, &attribute, value, Some(&locale))?;
    }

    entity.save(&config)?;
    info!(
        "Saved {} localizations",
        backend.count(entity.owner()).context("Failed to count stored localizations")?
    );

    for locale in config.directory.all_locales()? {
        let value = resolver.read_in(&mut entity, &attribute, &locale)?;
        println!("{}\t{}", locale.code(), value);
    }

    let report = serde_json::to_string_pretty(&config.metrics().report())
        .context("Failed to serialize metrics report")?;
    println!("{}", report);

    Ok(())
}

fn parse_assignment(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((code, value)) if !code.trim().is_empty() => {
            Ok((code.trim().to_string(), value.to_string()))
        }
        _ => bail!("Expected <locale-code>=<value>, got '{}'\n{}", arg, USAGE),
    }
}
