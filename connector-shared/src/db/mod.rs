/// Database layer for Connector
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Embedded schema migrations

pub mod migrations;
pub mod pool;
