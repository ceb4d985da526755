//! Column selection sent by clients.

use std::collections::HashSet;

use crate::domain::ColumnSet;
use crate::error::ForecastError;

/// Parse an optional JSON array of column names (`["Rice","Wheat"]`).
///
/// Absent or blank input selects nothing, which callers treat as "all columns".
pub fn parse_selection(raw: Option<&str>) -> Result<Vec<String>, ForecastError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Vec::new());
    };
    serde_json::from_str::<Vec<String>>(raw).map_err(|e| ForecastError::InvalidSelection(e.to_string()))
}

/// Check every selected name against the tracked columns.
///
/// Runs before any inference, so it rejects everything `ForecastResult::project`
/// would reject: unknown names and repeated names.
pub fn validate_selection(selected: &[String], columns: &ColumnSet) -> Result<(), ForecastError> {
    let mut seen = HashSet::with_capacity(selected.len());
    for name in selected {
        if columns.index_of(name).is_none() {
            return Err(ForecastError::UnknownColumn(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            return Err(ForecastError::InvalidSelection(format!("duplicate column `{name}`")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_arrays() {
        assert_eq!(
            parse_selection(Some(r#"["Rice","Gram Dal"]"#)).unwrap(),
            vec!["Rice".to_string(), "Gram Dal".to_string()]
        );
        assert!(parse_selection(None).unwrap().is_empty());
        assert!(parse_selection(Some("  ")).unwrap().is_empty());
        assert!(parse_selection(Some("[]")).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_selection(Some("Rice,Wheat")),
            Err(ForecastError::InvalidSelection(_))
        ));
    }

    #[test]
    fn unknown_names_are_reported() {
        let cols = ColumnSet::default();
        assert!(validate_selection(&["Rice".to_string()], &cols).is_ok());
        assert_eq!(
            validate_selection(&["Rice".to_string(), "Onion".to_string()], &cols),
            Err(ForecastError::UnknownColumn("Onion".to_string()))
        );
    }

    #[test]
    fn repeated_names_are_rejected() {
        let cols = ColumnSet::default();
        assert_eq!(
            validate_selection(&["Rice".to_string(), "Rice".to_string()], &cols),
            Err(ForecastError::InvalidSelection("duplicate column `Rice`".to_string()))
        );
    }
}
