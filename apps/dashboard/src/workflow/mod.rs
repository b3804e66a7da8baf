// Screen controllers and the session that mounts them.
//
// Flow per request: handler → session → controller → coordinator → backend.
// Controllers own every loading, error and notice state the user sees.

pub mod candidates;
pub mod dashboard;
pub mod jobs;
pub mod matching;
pub mod screen;
pub mod session;

pub use session::{ActiveScreen, DashboardSession, SessionStore};
