use crate::core::types::Date;
use crate::errors::{Error, Result};
use chrono::NaiveDate;

const HELP_FLAGS: [&str; 3] = ["--help", "-h", "?"];

/// Split a command line into tokens. Single or double quotes group words;
/// an unterminated quote is an error.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }
    if let Some(q) = quote {
        return Err(Error::parse(format!(
            "Unterminated {q} quote. Wrap names in matching quotes."
        )));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Positional arguments of one command with typed accessors. Errors name the
/// missing or malformed argument.
#[derive(Debug, Clone, Copy)]
pub struct ArgList<'a> {
    tokens: &'a [String],
}

impl<'a> ArgList<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn wants_help(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| HELP_FLAGS.iter().any(|f| t.eq_ignore_ascii_case(f)))
    }

    pub fn get(&self, idx: usize) -> Option<&'a str> {
        self.tokens.get(idx).map(String::as_str)
    }

    pub fn word(&self, idx: usize, what: &str) -> Result<&'a str> {
        self.get(idx)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::parse(format!("Missing {what}.")))
    }

    /// Positive 1-based number.
    pub fn index(&self, idx: usize, what: &str) -> Result<usize> {
        let raw = self.word(idx, what)?;
        match raw.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(Error::parse(format!(
                "Invalid {what}: '{raw}'. Expected a number from 1."
            ))),
        }
    }

    pub fn number<T: std::str::FromStr>(&self, idx: usize, what: &str) -> Result<T> {
        let raw = self.word(idx, what)?;
        raw.parse::<T>()
            .map_err(|_| Error::parse(format!("Invalid {what}: '{raw}'. Expected a number.")))
    }

    pub fn date(&self, idx: usize, what: &str) -> Result<NaiveDate> {
        let raw = self.word(idx, what)?;
        Date::try_from_str(raw).map(|d| d.0)
    }

    /// Tokens from `idx` on, joined by single spaces.
    pub fn rest(&self, idx: usize) -> String {
        self.tokens.get(idx..).unwrap_or(&[]).join(" ")
    }

    pub fn expect_at_most(&self, max: usize) -> Result<()> {
        if self.tokens.len() > max {
            return Err(Error::parse(format!(
                "Unexpected argument: '{}'.",
                self.tokens[max]
            )));
        }
        Ok(())
    }
}
