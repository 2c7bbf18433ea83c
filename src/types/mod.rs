mod dialect;
mod direction;
mod migration_status;

pub use dialect::{Dialect, parse_dialect};
pub use direction::Direction;
pub use migration_status::MigrationStatus;
