//! Config command handlers

use crate::cli::ConfigInitArgs;
use std::fs;

/// Annotated configuration with every default spelled out.
pub const EXAMPLE_CONFIG: &str = include_str!("../../symcheck.example.toml");

/// Handle `symcheck config init` command
///
/// Returns the confirmation message to print.
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<String, Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        )
        .into());
    }

    fs::write(&args.output, EXAMPLE_CONFIG)?;

    Ok(format!(
        "✓ Configuration file created: {}\n  Export the API key variable named in [model] before running `symcheck serve`.",
        args.output.display()
    ))
}
