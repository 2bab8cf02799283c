pub mod notifier;
pub mod sqlx;
