use std::str::Chars;

use crate::error::{AdbiError, Result};
use crate::types::Params;

/// An operation split into literal text and variable references.
///
/// Always holds one more literal than references: `literal, ref, literal,
/// ..., literal`. N references make 2N+1 parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationParts {
    literals: Vec<String>,
    references: Vec<String>,
    verbatim: bool,
}

impl OperationParts {
    /// The operation as one literal with no references.
    pub fn verbatim(operation: &str) -> Self {
        Self {
            literals: vec![operation.to_string()],
            references: Vec::new(),
            verbatim: true,
        }
    }

    /// True when the operation was taken as-is, with `%%` left undecoded.
    pub fn is_verbatim(&self) -> bool {
        self.verbatim
    }

    /// Literal segments, in order.
    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    /// Reference keys, one per occurrence, in order.
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// Total number of parts (literals plus references).
    pub fn len(&self) -> usize {
        self.literals.len() + self.references.len()
    }

    /// Never true: there is always at least one literal.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Walks the parts as `(literal, reference)` pairs; the last pair has no reference.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.literals
            .iter()
            .enumerate()
            .map(|(i, lit)| (lit.as_str(), self.references.get(i).map(String::as_str)))
    }

    /// Parts flattened in alternating order.
    pub fn to_vec(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.len());
        for (lit, reference) in self.pairs() {
            out.push(lit.to_string());
            if let Some(reference) = reference {
                out.push(reference.to_string());
            }
        }
        out
    }
}

/// Split an operation written in uniform notation into its parts.
///
/// `%s` takes the next positional parameter, `%(name)s` the named one and
/// `%%` is a literal percent sign. Without parameters the operation is
/// returned verbatim and nothing is interpreted.
pub fn parse(operation: &str, params: Option<&Params>) -> Result<OperationParts> {
    let params = match params {
        Some(p) if !p.is_empty() => p,
        _ => return Ok(OperationParts::verbatim(operation)),
    };

    let mut literals = Vec::new();
    let mut references = Vec::new();
    let mut current = String::with_capacity(operation.len());
    let mut next_index = 0usize;
    let mut chars = operation.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            current.push(c);
            continue;
        }
        let key = match chars.next() {
            Some('%') => {
                current.push('%');
                continue;
            }
            Some('s') => positional_key(params, &mut next_index)?,
            Some('(') => {
                let name = read_name(&mut chars)?;
                named_key(params, name)?
            }
            Some(other) => {
                return Err(AdbiError::InvalidOperation(format!(
                    "unsupported format character '{other}'"
                )))
            }
            None => {
                return Err(AdbiError::InvalidOperation(
                    "incomplete format at end of operation".to_string(),
                ))
            }
        };
        literals.push(std::mem::take(&mut current));
        references.push(key);
    }
    literals.push(current);

    if let Params::Positional(values) = params {
        if next_index < values.len() {
            return Err(AdbiError::InvalidOperation(format!(
                "not all parameters were used: {} supplied, {} referenced",
                values.len(),
                next_index
            )));
        }
    }

    Ok(OperationParts {
        literals,
        references,
        verbatim: false,
    })
}

fn positional_key(params: &Params, next_index: &mut usize) -> Result<String> {
    match params {
        Params::Positional(values) => {
            if *next_index >= values.len() {
                return Err(AdbiError::MissingParameter(next_index.to_string()));
            }
            let key = next_index.to_string();
            *next_index += 1;
            Ok(key)
        }
        Params::Named(_) => Err(AdbiError::InvalidOperation(
            "positional marker %s used with named parameters".to_string(),
        )),
    }
}

fn named_key(params: &Params, name: String) -> Result<String> {
    match params {
        Params::Named(values) if values.contains_key(&name) => Ok(name),
        Params::Named(_) => Err(AdbiError::MissingParameter(name)),
        Params::Positional(_) => Err(AdbiError::InvalidOperation(format!(
            "named marker %({name})s used with positional parameters"
        ))),
    }
}

/// Reads `name)s` after an opening `%(`.
fn read_name(chars: &mut Chars<'_>) -> Result<String> {
    let mut name = String::new();
    loop {
        match chars.next() {
            Some(')') => break,
            Some(c) => name.push(c),
            None => {
                return Err(AdbiError::InvalidOperation(format!(
                    "unterminated named marker %({name}"
                )))
            }
        }
    }
    match chars.next() {
        Some('s') => Ok(name),
        Some(other) => Err(AdbiError::InvalidOperation(format!(
            "unsupported format character '{other}' after %({name})"
        ))),
        None => Err(AdbiError::InvalidOperation(format!(
            "incomplete named marker %({name})"
        ))),
    }
}
