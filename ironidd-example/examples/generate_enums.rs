//! Code Generation Example
//!
//! Parses a dictionary and prints the generated object-type and field
//! index enums to stdout.
//!
//! Environment: `IDD_ROOT`, `IDD_SOURCE`, `RUST_LOG`.

use ironidd_codegen::{CodeGenerator, GeneratorConfig};
use ironidd_dictionary::{DictionaryParser, ParserConfig};
use ironidd_example::{ExampleConfig, init_logging};
use ironidd_store::FileSystemLoader;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();
    let cfg = ExampleConfig::from_env();

    let loader = FileSystemLoader::new(&cfg.root);
    let parser_config = ParserConfig::new().with_comment_only_object(true);
    let dictionary = DictionaryParser::new()
        .with_config(&parser_config)
        .with_loader(&loader)
        .load(&cfg.source)?
        .into_strict()?;
    info!("Generating code for {} objects", dictionary.len());

    let generator = CodeGenerator::with_config(GeneratorConfig {
        visibility: "pub(crate)".to_string(),
        ..GeneratorConfig::default()
    });
    println!("{}", generator.generate(&dictionary));
    Ok(())
}
