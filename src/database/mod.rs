pub mod boundary;
pub mod postgres_repository;
pub mod session;
pub mod user;
pub mod waypoint;
