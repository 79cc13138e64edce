use std::collections::HashMap;

use crate::types::SqlValue;

/// Parameters supplied alongside an operation.
///
/// Positional parameters pair with `%s` markers in order, named parameters
/// pair with `%(name)s` markers by key. The two are never mixed in one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Positional(Vec<SqlValue>),
    Named(HashMap<String, SqlValue>),
}

impl Params {
    /// Build positional parameters from anything convertible to `SqlValue`.
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        Params::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Build named parameters from `(name, value)` pairs.
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        Params::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        match self {
            Params::Positional(values) => values.len(),
            Params::Named(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values keyed the way the parser names references: positional values
    /// by their decimal index, named values by name.
    pub(crate) fn keyed(&self) -> HashMap<String, &SqlValue> {
        match self {
            Params::Positional(values) => values
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            Params::Named(values) => values.iter().map(|(k, v)| (k.clone(), v)).collect(),
        }
    }
}
