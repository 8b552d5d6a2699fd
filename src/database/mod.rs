pub mod executor;
pub mod manager;
pub mod routine;

pub use executor::{PgRoutineExecutor, RoutineError, RoutineExecutor};
pub use manager::{DatabaseError, DatabaseManager};
pub use routine::{RoutineCall, RoutineKind, SqlParam};
