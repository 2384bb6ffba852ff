/// Database models for Connector
///
/// # Models
///
/// - `user`: Registered user accounts

pub mod user;
