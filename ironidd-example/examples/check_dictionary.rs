//! Dictionary Check Example
//!
//! Loads a dictionary with its includes, prints a summary and every
//! diagnostic, and exits with an error if the dictionary is malformed.
//!
//! Environment: `IDD_ROOT`, `IDD_SOURCE`, `IDD_STRICT`, `RUST_LOG`.

use ironidd_core::Severity;
use ironidd_example::{ExampleConfig, init_logging};
use ironidd_store::{DictionaryCache, FileSystemLoader};
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    init_logging();
    let cfg = ExampleConfig::from_env();
    info!("Checking {} in {}", cfg.source, cfg.root.display());

    let cache = DictionaryCache::new(FileSystemLoader::new(&cfg.root));
    let outcome = cache.get_or_load(&cfg.source)?;
    let dictionary = &outcome.dictionary;

    info!(
        "Version {} (build {}), {} objects in {} groups",
        dictionary.version().unwrap_or("?"),
        dictionary.build().unwrap_or("?"),
        dictionary.len(),
        dictionary.groups().len()
    );
    for group in dictionary.groups() {
        let names: Vec<_> = dictionary.objects_in_group(group).map(|o| o.name.as_str()).collect();
        info!("  [{}] {}", group, names.join(", "));
    }

    for diagnostic in &outcome.diagnostics {
        match diagnostic.severity {
            Severity::Error => error!("{}", diagnostic),
            Severity::Warning => warn!("{}", diagnostic),
            Severity::Info => info!("{}", diagnostic),
        }
    }

    let outcome = (*outcome).clone();
    let dictionary = if cfg.strict {
        outcome.into_strict_with_warnings()?
    } else {
        outcome.into_strict()?
    };

    if let Some(zone) = dictionary.object("zone") {
        let multiplier = zone.field_by_name("Multiplier");
        for value in ["2", "0", "many"] {
            match multiplier.map(|f| f.validate(value)) {
                Some(Ok(())) => info!("Zone multiplier {:?} accepted", value),
                Some(Err(e)) => warn!("Zone multiplier {:?} rejected: {}", value, e),
                None => {}
            }
        }
    }

    info!("Dictionary is valid");
    Ok(())
}
