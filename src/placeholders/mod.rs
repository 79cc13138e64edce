//! Translation from the uniform `%s` / `%(name)s` notation into a driver's
//! native placeholder style.

mod converter;
mod mapper;
mod parser;

pub use self::converter::{convert, Mapping};
pub use self::mapper::remap;
pub use self::parser::{parse, OperationParts};
