use regex::Regex;

use crate::error::{AdbiError, Result};

const VERSION_FIELD: &str = "{version}";

/// A schema file name template such as `schema-{version}.sql`.
///
/// Holds exactly one `{version}` field; `{{` and `}}` stand for literal braces.
#[derive(Debug, Clone)]
pub struct SchemaFileTemplate {
    raw: String,
    prefix: String,
    suffix: String,
    pattern: Regex,
}

impl SchemaFileTemplate {
    pub fn new(format: &str) -> Result<Self> {
        let invalid = || AdbiError::InvalidSchemaFileFormat(format.to_string());

        let mut pieces = format.split(VERSION_FIELD);
        let (Some(prefix), Some(suffix), None) = (pieces.next(), pieces.next(), pieces.next())
        else {
            return Err(invalid());
        };
        let prefix = unescape_braces(prefix).ok_or_else(invalid)?;
        let suffix = unescape_braces(suffix).ok_or_else(invalid)?;

        let pattern = Regex::new(&format!(
            "^{}(.*?){}$",
            regex::escape(&prefix),
            regex::escape(&suffix)
        ))
        .map_err(|_| invalid())?;

        Ok(Self {
            raw: format.to_string(),
            prefix,
            suffix,
            pattern,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The file name for a given version token.
    pub fn file_name(&self, version: &str) -> String {
        format!("{}{}{}", self.prefix, version, self.suffix)
    }

    /// The version token of a matching file name.
    pub fn match_version<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(file_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// `None` when a lone brace would open another field.
fn unescape_braces(piece: &str) -> Option<String> {
    let mut out = String::with_capacity(piece.len());
    let mut chars = piece.chars();
    while let Some(c) = chars.next() {
        match c {
            '{' | '}' => {
                if chars.next() != Some(c) {
                    return None;
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    Some(out)
}
