/// API route handlers
///
/// - `health`: Health check endpoint
/// - `users`: User registration

pub mod health;
pub mod users;
