use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::AdbiError;

/// Placeholder syntax a driver expects for bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ParamStyle {
    /// `%s` / `%(name)s`, the uniform notation itself.
    Pyformat,
    /// `?`
    Qmark,
    /// `:0`, `:1`, ...
    Numeric,
    /// `:var1`, `:var2`, ...
    Named,
    /// `%s`
    Format,
}

impl ParamStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamStyle::Pyformat => "pyformat",
            ParamStyle::Qmark => "qmark",
            ParamStyle::Numeric => "numeric",
            ParamStyle::Named => "named",
            ParamStyle::Format => "format",
        }
    }
}

impl fmt::Display for ParamStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamStyle {
    type Err = AdbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pyformat" => Ok(ParamStyle::Pyformat),
            "qmark" => Ok(ParamStyle::Qmark),
            "numeric" => Ok(ParamStyle::Numeric),
            "named" => Ok(ParamStyle::Named),
            "format" => Ok(ParamStyle::Format),
            other => Err(AdbiError::UnsupportedParamStyle(other.to_string())),
        }
    }
}

impl TryFrom<String> for ParamStyle {
    type Error = AdbiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
