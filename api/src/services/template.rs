//! `{{ placeholder }}` substitution for stored subjects and templates.
//!
//! Coordinators edit these templates through the settings screen, so
//! rendering must never fail: a placeholder without a matching variable is
//! left in place untouched.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("valid placeholder regex"));

/// Substitutes `{{ name }}` placeholders from the given vocabulary.
/// Whitespace inside the braces is tolerated; unresolved placeholders are
/// left inert.
pub fn render(template: &str, vars: &[(&str, String)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            match vars.iter().find(|(name, _)| *name == &caps[1]) {
                Some((_, value)) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::render;

    #[test]
    fn substitutes_known_placeholders() {
        let out = render(
            "Dear {{ attendee_first_name }} {{attendee_last_name}},",
            &[
                ("attendee_first_name", "Ada".to_string()),
                ("attendee_last_name", "Lovelace".to_string()),
            ],
        );
        assert_eq!(out, "Dear Ada Lovelace,");
    }

    #[test]
    fn unresolved_placeholders_are_left_inert() {
        let out = render(
            "Hours: {{ earned_pd_hour }} / {{ unknown_var }}",
            &[("earned_pd_hour", "2.5".to_string())],
        );
        assert_eq!(out, "Hours: 2.5 / {{ unknown_var }}");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(render("no placeholders here", &[]), "no placeholders here");
    }
}
