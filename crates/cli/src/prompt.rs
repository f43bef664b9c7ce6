//! Line-oriented prompting over any `BufRead` / `Write` pair.

use std::io::{BufRead, Write};

use crate::error::{ShellError, ShellResult};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `label`, read one line, strip the line ending.
    ///
    /// End of input is `ShellError::InputClosed`. Bytes that are not UTF-8
    /// become U+FFFD, so the answer is rejected by whatever parses it.
    pub fn raw_line(&mut self, label: &str) -> ShellResult<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut bytes = Vec::new();
        if self.input.read_until(b'\n', &mut bytes)? == 0 {
            writeln!(self.output)?;
            return Err(ShellError::InputClosed);
        }
        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    /// Like `raw_line`, with surrounding whitespace removed.
    pub fn line(&mut self, label: &str) -> ShellResult<String> {
        Ok(self.raw_line(label)?.trim().to_string())
    }

    /// Read a password. Input is echoed; only the line ending is stripped.
    pub fn secret(&mut self, label: &str) -> ShellResult<String> {
        self.raw_line(label)
    }

    /// Ask until `parse` accepts the answer. A blank answer cancels (`None`).
    pub fn ask<T>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> ShellResult<Option<T>> {
        loop {
            let answer = self.line(label)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(msg) => self.error(&msg)?,
            }
        }
    }

    /// Ask until `parse` accepts the answer. A blank answer means `default`.
    pub fn ask_or<T>(
        &mut self,
        label: &str,
        default: T,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> ShellResult<T> {
        Ok(self.ask(label, parse)?.unwrap_or(default))
    }

    pub fn confirm(&mut self, label: &str) -> ShellResult<bool> {
        let answer = self.line(label)?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    pub fn say(&mut self, msg: &str) -> ShellResult<()> {
        writeln!(self.output, "{msg}")?;
        Ok(())
    }

    pub fn success(&mut self, msg: &str) -> ShellResult<()> {
        self.say(&format!("✅ {msg}"))
    }

    pub fn warning(&mut self, msg: &str) -> ShellResult<()> {
        self.say(&format!("⚠️  {msg}"))
    }

    pub fn error(&mut self, msg: &str) -> ShellResult<()> {
        self.say(&format!("❌ {msg}"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_count(raw: &str) -> Result<u64, String> {
    raw.parse::<u64>()
        .map_err(|_| format!("'{raw}' is not a whole number of 0 or more"))
}

pub fn parse_limit(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("'{raw}' is not a positive whole number")),
        Ok(n) => Ok(n),
    }
}

pub fn parse_delta(raw: &str) -> Result<i64, String> {
    match raw.parse::<i64>() {
        Ok(0) => Err("quantity change cannot be zero".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{raw}' is not a whole number (use + to add, - to deduct)")),
    }
}

pub fn parse_price(raw: &str) -> Result<f64, String> {
    let price = raw
        .trim_start_matches('$')
        .parse::<f64>()
        .map_err(|_| format!("'{raw}' is not a valid price"))?;
    if !price.is_finite() || price < 0.0 {
        return Err("price must be a non-negative number".to_string());
    }
    Ok(price)
}
