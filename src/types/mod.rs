mod param_style;
mod params;
mod row;
mod sql_value;

pub use self::param_style::ParamStyle;
pub use self::params::Params;
pub use self::row::{ColumnDescription, ResultSet, Row};
pub use self::sql_value::SqlValue;
