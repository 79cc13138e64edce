use crate::error::Result;
use crate::placeholders::parser::{parse, OperationParts};
use crate::types::{ParamStyle, Params};

/// How references in the original operation map onto the rewritten placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mapping {
    /// One original key per emitted placeholder, in emission order.
    /// Repeated references repeat their key.
    Positional(Vec<String>),
    /// Original key to assigned placeholder name, in first-seen order.
    Named(Vec<(String, String)>),
}

impl Mapping {
    /// Number of entries: occurrences for positional, distinct keys for named.
    pub fn len(&self) -> usize {
        match self {
            Mapping::Positional(keys) => keys.len(),
            Mapping::Named(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assigned placeholder name for an original key (named mappings only).
    pub fn target_of(&self, original: &str) -> Option<&str> {
        match self {
            Mapping::Named(pairs) => pairs
                .iter()
                .find(|(orig, _)| orig == original)
                .map(|(_, target)| target.as_str()),
            Mapping::Positional(_) => None,
        }
    }
}

/// Rewrite an operation from uniform notation into `style`.
///
/// `Pyformat` is the identity and returns no mapping. Every other style
/// parses the operation first and returns the mapping the parameter mapper
/// needs to reshape `params`.
pub fn convert(
    operation: &str,
    params: Option<&Params>,
    style: ParamStyle,
) -> Result<(String, Option<Mapping>)> {
    let (sql, mapping) = match style {
        ParamStyle::Pyformat => return Ok((operation.to_string(), None)),
        ParamStyle::Qmark => {
            format_with_marker(&parse(operation, params)?, |_| "?".to_string(), false)
        }
        ParamStyle::Numeric => {
            format_with_marker(&parse(operation, params)?, |i| format!(":{i}"), false)
        }
        ParamStyle::Format => {
            // decoded `%%` goes back out escaped
            let parts = parse(operation, params)?;
            format_with_marker(&parts, |_| "%s".to_string(), !parts.is_verbatim())
        }
        ParamStyle::Named => format_named(&parse(operation, params)?),
    };
    Ok((sql, Some(mapping)))
}

/// One marker per occurrence; `marker` receives the 0-based occurrence index.
fn format_with_marker(
    parts: &OperationParts,
    marker: impl Fn(usize) -> String,
    escape_percent: bool,
) -> (String, Mapping) {
    let mut sql = String::new();
    let mut lookups = Vec::with_capacity(parts.references().len());
    for (literal, reference) in parts.pairs() {
        if escape_percent {
            sql.push_str(&literal.replace('%', "%%"));
        } else {
            sql.push_str(literal);
        }
        if let Some(reference) = reference {
            sql.push_str(&marker(lookups.len()));
            lookups.push(reference.to_string());
        }
    }
    (sql, Mapping::Positional(lookups))
}

/// `:varK` per distinct key; repeats reuse the name assigned on first sight.
fn format_named(parts: &OperationParts) -> (String, Mapping) {
    let mut sql = String::new();
    let mut mappings: Vec<(String, String)> = Vec::new();
    for (literal, reference) in parts.pairs() {
        sql.push_str(literal);
        let Some(reference) = reference else {
            continue;
        };
        let existing = mappings
            .iter()
            .find(|(orig, _)| orig == reference)
            .map(|(_, name)| name.clone());
        let var_name = match existing {
            Some(name) => name,
            None => {
                let name = format!("var{}", mappings.len() + 1);
                mappings.push((reference.to_string(), name.clone()));
                name
            }
        };
        sql.push(':');
        sql.push_str(&var_name);
    }
    (sql, Mapping::Named(mappings))
}
