use super::config::{RuleTable, DEFENSIVE_SCORE, PARAMETER_KEYS};
use crate::games::MatchFormat;

/// Validate a rule table before scoring.
/// Returns all validation errors at once (not just the first).
///
/// `required` lists the formats the league's fixtures actually use.
pub fn validate_rule_table(rules: &RuleTable, required: &[MatchFormat]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for format in required {
        if rules.rules_for(*format).is_err() {
            errors.push(format!("rules.{}: no column for a format used by fixtures", format));
        }
    }

    for format in rules.formats() {
        let Ok(format_rules) = rules.rules_for(format) else {
            continue;
        };
        for key in PARAMETER_KEYS {
            if let Some(value) = format_rules.get(key) {
                if !value.is_finite() {
                    errors.push(format!("rules.{}.{}: must be a finite number", format, key));
                }
            }
        }
        if format_rules.defensive_base < 0.0 {
            errors.push(format!(
                "rules.{}.{}: must be non-negative",
                format, DEFENSIVE_SCORE
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
