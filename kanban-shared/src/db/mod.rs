/// Database layer
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Embedded schema migrations
///
/// Models live in the `models` module at the crate root; the transactional
/// ordering logic lives in `position`.

pub mod migrations;
pub mod pool;
