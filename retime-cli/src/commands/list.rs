// ============================================================================
// retime-cli/src/commands/list.rs
// ============================================================================
//
// LIST COMMAND: Show the edit services a host would expose
//
// Text output is meant for people; `--json` prints the same schema shape a
// host UI would read.

use crate::cli::ListArgs;
use crate::error::CliResult;

use retime_core::{ConfigField, EditService, edit_services};
use serde_json::json;
use std::process::ExitCode;

/// Prints the available services and their settings to stdout.
pub fn run_list(args: &ListArgs) -> CliResult<ExitCode> {
    let services = edit_services();
    if args.json {
        println!("{}", services_json(&services)?);
    } else {
        print!("{}", services_text(&services));
    }
    Ok(ExitCode::SUCCESS)
}

/// Serializes services as a JSON array of `{title, slug, config}` objects.
pub fn services_json(services: &[EditService]) -> CliResult<String> {
    let entries: Vec<_> = services
        .iter()
        .map(|service| {
            json!({
                "title": service.title,
                "slug": service.slug,
                "config": service.config,
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Renders services as an indented plain-text listing.
pub fn services_text(services: &[EditService]) -> String {
    let mut out = String::new();
    for service in services {
        out.push_str(&format!("{} ({})\n", service.title, service.slug));
        for (key, field) in service.config.iter() {
            out.push_str(&format!("  {key:<18}{}\n", field_summary(field)));
            out.push_str(&format!("      {}\n", field.description));
        }
    }
    out
}

fn field_summary(field: &ConfigField) -> String {
    let mut parts = vec![field.kind.to_string(), format!("default {}", field.default)];
    match (field.minimum, field.maximum) {
        (Some(min), Some(max)) => parts.push(format!("range [{min}, {max}]")),
        (Some(min), None) => parts.push(format!("min {min}")),
        (None, Some(max)) => parts.push(format!("max {max}")),
        (None, None) => {}
    }
    if field.required {
        parts.push("required".to_string());
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_services_text_lists_every_key() {
        let text = services_text(&edit_services());
        assert!(text.contains("Slow Down (slow-down)"));
        assert!(text.contains("Speed Up (speed-up)"));
        assert!(text.contains("slowDownPercent"));
        assert!(text.contains("number, default 0.5, range [0, 1], required"));
        assert!(text.contains("number, default 2, min 1, required"));
        assert!(text.contains("boolean, default true"));
    }

    #[test]
    fn test_services_json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&services_json(&edit_services()).unwrap()).unwrap();
        assert_eq!(json[0]["slug"], "slow-down");
        assert_eq!(json[1]["title"], "Speed Up");
        assert_eq!(json[1]["config"]["speedUpPercent"]["minimum"], 1.0);
    }
}
