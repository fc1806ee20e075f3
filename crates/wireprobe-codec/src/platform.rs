//! Host shim for locale-sensitive number conversion.

/// Double/string conversion used by the JSON parser and writer.
///
/// Implementations must be locale-independent: `.` is the decimal
/// separator in both directions regardless of the process environment.
pub trait Platform {
    /// Formats a double for JSON output.
    fn double_to_string(&self, value: f64) -> String;

    /// Parses a JSON number token. Returns `None` when the text does not
    /// denote a finite double.
    fn string_to_double(&self, text: &str) -> Option<f64>;
}

/// The default [`Platform`]. Rust's own float formatting and parsing are
/// locale-independent, so no libc detour is needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn double_to_string(&self, value: f64) -> String {
        if value.is_nan() {
            // JSON has no NaN or infinity; these can only arrive over the
            // binary wire.
            "null".to_string()
        } else if value.is_infinite() {
            if value > 0.0 { "1e308" } else { "-1e308" }.to_string()
        } else if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else {
            format!("{value}")
        }
    }

    fn string_to_double(&self, text: &str) -> Option<f64> {
        text.parse::<f64>().ok().filter(|value| value.is_finite())
    }
}
