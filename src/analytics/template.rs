//! `{placeholder}` substitution for summary and bullet templates.

use std::fmt;

/// A value substituted into a template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::Text(s) => f.write_str(s),
            TemplateValue::Number(n) => f.write_str(&format_number(*n)),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Text(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Text(value)
    }
}

impl From<&String> for TemplateValue {
    fn from(value: &String) -> Self {
        TemplateValue::Text(value.clone())
    }
}

impl From<f64> for TemplateValue {
    fn from(value: f64) -> Self {
        TemplateValue::Number(value)
    }
}

impl From<usize> for TemplateValue {
    fn from(value: usize) -> Self {
        TemplateValue::Number(value as f64)
    }
}

impl From<i64> for TemplateValue {
    fn from(value: i64) -> Self {
        TemplateValue::Number(value as f64)
    }
}

/// Shortest round-trip decimal form: `25`, `0.4`, `12.5`. Negative zero prints
/// as `0`. Magnitudes of at least 1e21 or below 1e-6 switch to exponent form
/// with a signed exponent (`1e+21`, `1.5e-7`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if value.is_finite() && (magnitude >= 1e21 || magnitude < 1e-6) {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        };
    }

    value.to_string()
}

/// Ordered placeholder bindings for [`interpolate`].
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    vars: Vec<(&'static str, TemplateValue)>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &'static str, value: impl Into<TemplateValue>) -> Self {
        self.vars.push((key, value.into()));
        self
    }
}

/// Replaces every `{key}` with its bound value, in binding order.
/// Placeholders without a binding are left as-is.
pub fn interpolate(template: &str, vars: &TemplateVars) -> String {
    vars.vars
        .iter()
        .fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("{{{key}}}"), &value.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(25.0), "25");
        assert_eq!(format_number(0.4), "0.4");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-3.25), "-3.25");
    }

    #[test]
    fn test_format_number_extreme_magnitudes() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_interpolate_replaces_every_occurrence() {
        let vars = TemplateVars::new().set("name", "A");
        assert_eq!(interpolate("{name} and {name}", &vars), "A and A");
    }

    #[test]
    fn test_interpolate_numbers() {
        let vars = TemplateVars::new()
            .set("total", 25.0)
            .set("count", 3usize);
        assert_eq!(
            interpolate("{count} routes, {total} mins", &vars),
            "3 routes, 25 mins"
        );
    }

    #[test]
    fn test_interpolate_leaves_unknown_placeholders() {
        let vars = TemplateVars::new().set("name", "A");
        assert_eq!(
            interpolate("{name} saves {saved} mins", &vars),
            "A saves {saved} mins"
        );
    }

    #[test]
    fn test_interpolate_ignores_unused_vars() {
        let vars = TemplateVars::new().set("unused", "x");
        assert_eq!(interpolate("plain text", &vars), "plain text");
    }
}
