/// Database models for Tasklist
///
/// # Models
///
/// - `user`: Accounts and credentials
/// - `task`: Personal tasks, each owned by one user

pub mod task;
pub mod user;
