use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use serde_json::Value;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print a progress line.
pub fn print_status(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", message.dimmed())
    } else {
        writeln!(w, "{}", message)
    }
}

pub fn print_success(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "✓".green().bold(), message)
    } else {
        writeln!(w, "[OK] {}", message)
    }
}

pub fn print_error(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "✗".red().bold(), message.red())
    } else {
        writeln!(w, "[ERROR] {}", message)
    }
}

/// Write `value` as pretty JSON to `output`, or to `w` when no path is given.
pub fn write_json(w: &mut dyn Write, value: &Value, output: Option<&Path>) -> std::io::Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, rendered + "\n"),
        None => writeln!(w, "{}", rendered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_status_lines() {
        let mut buf = Vec::new();
        print_success(&mut buf, "done", ColorMode(false)).unwrap();
        print_error(&mut buf, "failed", ColorMode(false)).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[OK] done\n[ERROR] failed\n");
    }

    #[test]
    fn json_goes_to_writer_without_output_path() {
        let mut buf = Vec::new();
        write_json(&mut buf, &serde_json::json!({"a": 1}), None).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\n  \"a\": 1\n}\n");
    }
}
