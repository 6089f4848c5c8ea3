use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;

/// Pretty JSON for stdout, newline-terminated.
pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    let mut output =
        serde_json::to_string_pretty(value).context("Failed to encode output as JSON")?;
    output.push('\n');
    Ok(output)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = render_json(value)?;
    let mut stdout = io::stdout().lock();
    match stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
        // `adminbridge call ... | head` closes the pipe early.
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("Failed to write JSON to stdout"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_is_pretty_and_terminated() {
        let rendered = render_json(&json!({ "token": null, "roles": ["admin"] })).unwrap();
        assert!(rendered.ends_with("}\n"));
        assert!(rendered.contains("\n  \"roles\": [\n    \"admin\"\n  ]"));
    }
}
