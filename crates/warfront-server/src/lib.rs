//! Warfront game server: turn scheduling, session wiring, and record
//! archiving for the deterministic lockstep engine in `warfront-core`.

pub mod archive;
pub mod config;
pub mod scheduler;
pub mod session;

pub use crate::config::ServerConfig;
pub use crate::scheduler::{SchedulerError, SchedulerState, TurnScheduler};
pub use crate::session::GameSession;
