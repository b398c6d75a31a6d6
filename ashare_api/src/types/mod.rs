mod table;
pub use self::table::{Cell, Table};
