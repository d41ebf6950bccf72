mod reference;
mod sqlite;

pub use self::reference::*;
pub use self::sqlite::*;
