//! Diagnostic formatting for binding values.
//!
//! Used to build error and trace messages; nothing branches on the output.

use std::fmt;

use super::types::BindingValue;

/// Render `value` for diagnostics.
///
/// - `Null` renders empty
/// - strings pass through
/// - functions render their name
/// - objects render their type name, else the first line of their debug output
/// - lists render their items comma-joined
pub fn stringify(value: &BindingValue) -> String {
    match value {
        BindingValue::Null => String::new(),
        BindingValue::Bool(b) => b.to_string(),
        BindingValue::Number(n) => format_number(*n),
        BindingValue::Str(s) => s.to_string(),
        BindingValue::Function(f) => f.name().to_string(),
        BindingValue::Object(object) => match object.type_name() {
            Some(name) => name.to_string(),
            None => {
                let debug = format!("{:?}", object);
                match debug.split_once('\n') {
                    Some((first, _)) => first.to_string(),
                    None => debug,
                }
            }
        },
        BindingValue::List(items) => items
            .iter()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let name = if n > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_string()
    } else if n == 0.0 {
        // -0 prints as 0.
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        exponential(n)
    } else {
        format!("{}", n)
    }
}

/// Shortest exponent form with an explicit sign on the exponent (`1e+21`).
fn exponential(n: f64) -> String {
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

impl fmt::Display for BindingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(self))
    }
}
