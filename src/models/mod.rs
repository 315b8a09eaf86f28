pub mod boundary;
pub mod health;
pub mod reference;
pub mod session;
pub mod user;
pub mod waypoint;
pub mod weather;
