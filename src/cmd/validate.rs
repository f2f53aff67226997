//! `signpost validate`: check a route file for errors.
//!
//! Parses and validates the route file, reporting results in either
//! human-readable text or machine-readable JSON format.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::error::SignpostError;
use crate::routing::RouteTable;
use crate::store::sources::parse_routes_str;
use crate::store::validation;

pub fn execute(args: &ValidateArgs) -> Result<(), SignpostError> {
    let path = &args.config;

    if !path.exists() {
        return Err(SignpostError::RouteFileNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path)?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let set = parse_routes_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&set) {
        match args.format {
            ValidateFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            ValidateFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "route": e.route,
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(SignpostError::SnapshotValidation { errors });
    }

    // Validation passed, so building the table reports the checksum a
    // running instance would publish for this file.
    let table = RouteTable::build(&set)?;
    let stats = table.stats();

    match args.format {
        ValidateFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &set)
            );
            println!("  checksum {}", stats.checksum);
        }
        ValidateFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "routes": stats.count,
                    "redirects": set.redirect_count(),
                    "checksum": stats.checksum,
                })
            );
        }
    }

    Ok(())
}
