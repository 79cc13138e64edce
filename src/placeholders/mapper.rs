use std::collections::HashMap;

use crate::error::{AdbiError, Result};
use crate::placeholders::converter::Mapping;
use crate::types::{Params, SqlValue};

/// Reshape caller parameters to line up with a rewritten operation.
///
/// Positional parameters are looked up by their decimal index. A named
/// mapping produces named parameters keyed by the assigned placeholder names;
/// a positional mapping produces one value per emitted placeholder.
pub fn remap(params: &Params, mapping: &Mapping) -> Result<Params> {
    let keyed = params.keyed();
    let lookup = |key: &str| -> Result<SqlValue> {
        keyed
            .get(key)
            .map(|v| (*v).clone())
            .ok_or_else(|| AdbiError::MissingParameter(key.to_string()))
    };

    match mapping {
        Mapping::Named(pairs) => {
            let mut out = HashMap::with_capacity(pairs.len());
            for (orig, target) in pairs {
                out.insert(target.clone(), lookup(orig)?);
            }
            Ok(Params::Named(out))
        }
        Mapping::Positional(keys) => {
            let values = keys
                .iter()
                .map(|key| lookup(key))
                .collect::<Result<Vec<_>>>()?;
            Ok(Params::Positional(values))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholders::convert;
    use crate::types::ParamStyle;

    #[test]
    fn test_positional_params_positional_mapping() {
        let params = Params::positional(["one", "two", "three"]);
        let mapping = Mapping::Positional(vec!["1".into(), "2".into(), "0".into()]);
        let mapped = remap(&params, &mapping).unwrap();
        assert_eq!(mapped, Params::positional(["two", "three", "one"]));
    }

    #[test]
    fn test_named_params_named_mapping() {
        let params = Params::named([("foo", "one"), ("bar", "two"), ("baz", "three")]);
        let mapping = Mapping::Named(vec![
            ("foo".into(), "var1".into()),
            ("bar".into(), "var2".into()),
            ("baz".into(), "var0".into()),
        ]);
        let mapped = remap(&params, &mapping).unwrap();
        assert_eq!(
            mapped,
            Params::named([("var2", "two"), ("var0", "three"), ("var1", "one")])
        );
    }

    #[test]
    fn test_named_params_positional_mapping() {
        let params = Params::named([("foo", "one"), ("bar", "two"), ("baz", "three")]);
        let mapping = Mapping::Positional(vec!["bar".into(), "baz".into(), "foo".into()]);
        let mapped = remap(&params, &mapping).unwrap();
        assert_eq!(mapped, Params::positional(["two", "three", "one"]));
    }

    #[test]
    fn test_repeated_keys_duplicate_values() {
        let params = Params::named([("a", 1), ("b", 2)]);
        let mapping = Mapping::Positional(vec!["a".into(), "b".into(), "a".into()]);
        let mapped = remap(&params, &mapping).unwrap();
        assert_eq!(mapped, Params::positional([1, 2, 1]));
    }

    #[test]
    fn test_missing_key() {
        let params = Params::positional([1]);
        let mapping = Mapping::Positional(vec!["0".into(), "3".into()]);
        let err = remap(&params, &mapping).unwrap_err();
        assert!(matches!(err, AdbiError::MissingParameter(ref k) if k == "3"));
    }

    #[test]
    fn test_round_trip_reconstructs_occurrences() {
        let params = Params::named([("x", "ex"), ("y", "why"), ("z", "zed")]);
        let op = "%(y)s %(x)s %(y)s %(z)s %(x)s";
        let occurrences = ["why", "ex", "why", "zed", "ex"];

        for style in [ParamStyle::Qmark, ParamStyle::Numeric, ParamStyle::Format] {
            let (_, mapping) = convert(op, Some(&params), style).unwrap();
            let mapped = remap(&params, &mapping.unwrap()).unwrap();
            assert_eq!(mapped, Params::positional(occurrences), "style {style}");
        }

        let (sql, mapping) = convert(op, Some(&params), ParamStyle::Named).unwrap();
        let Params::Named(mapped) = remap(&params, &mapping.unwrap()).unwrap() else {
            panic!("Expected named parameters");
        };
        let resolved: Vec<SqlValue> = sql
            .split(' ')
            .map(|marker| mapped[marker.trim_start_matches(':')].clone())
            .collect();
        assert_eq!(resolved, occurrences.map(SqlValue::from).to_vec());
    }
}
