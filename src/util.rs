// Small shared helpers: slugs, display formatting and the browser console logger.

use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::Value;
use wasm_bindgen::JsValue;

pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    if out.is_empty() { "item".to_string() } else { out }
}

/// Render a loosely-typed community value as plain ASCII for display. Empty becomes `-`.
pub fn format_value(val: &Value) -> String {
    let raw = match val {
        Value::Null => return "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2192}' => out.push_str("->"),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201c}' | '\u{201d}' => out.push('"'),
            ' '..='~' => out.push(c),
            _ => {}
        }
    }
    let trimmed = out.trim();
    if trimmed.is_empty() { "-".to_string() } else { trimmed.to_string() }
}

/// `log` backend that writes to the browser console.
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

pub fn init_console_logger(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("Abyssal Hunger", "abyssal-hunger")]
    #[case("  Ballista!! Mk II ", "ballista-mk-ii")]
    #[case("Défense", "d-fense")]
    #[case("***", "item")]
    #[case("", "item")]
    fn slugify_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(slugify(input), expected);
    }

    #[rstest]
    #[case(json!(null), "-")]
    #[case(json!(""), "-")]
    #[case(json!("  "), "-")]
    #[case(json!("10 \u{2013} 20"), "10 - 20")]
    #[case(json!("a \u{2192} b"), "a -> b")]
    #[case(json!("\u{201c}quoted\u{201d}"), "\"quoted\"")]
    #[case(json!("it\u{2019}s"), "it's")]
    #[case(json!(1200), "1200")]
    #[case(json!("snow\u{2744}flake"), "snowflake")]
    fn format_value_cases(#[case] input: Value, #[case] expected: &str) {
        assert_eq!(format_value(&input), expected);
    }
}
