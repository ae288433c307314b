//! CLI command implementations

pub mod completions;
pub mod config;
pub mod edge;
pub mod graph;
pub mod node;
pub mod schema;
pub mod traverse;

use schemagraph_core::{PropertyFilter, Properties};

/// Parse a `key=value` argument
pub fn parse_property(s: &str) -> Result<(String, String), String> {
    PropertyFilter::parse(s)
        .map(|f| (f.key, f.value))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

/// Collect parsed `key=value` arguments into a property map
pub fn to_properties(pairs: &[(String, String)]) -> Properties {
    pairs.iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_property() {
        assert_eq!(
            parse_property("name=Alice").unwrap(),
            ("name".to_string(), "Alice".to_string())
        );
        assert_eq!(parse_property("empty=").unwrap().1, "");
        assert!(parse_property("broken").is_err());
    }
}
