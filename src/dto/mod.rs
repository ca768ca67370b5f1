pub mod game;
pub mod health;
pub mod host;
pub mod sse;
