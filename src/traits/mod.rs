mod driver;

pub use driver::{Capabilities, DatabaseDriver, DriverCursor};
