pub mod dispatch;
mod health;
pub mod resource;
pub mod router;
