//! # Storage Module
//!
//! Persistence for users, attendance logs, public holidays and targets.
//!
//! The domain layer only sees the traits in [`traits`]; the SQLite
//! repositories implement them on top of a shared [`DbConnection`].
//!
//! - **connection** - pool setup and schema creation
//! - **errors** - unique-constraint failures surfaced as [`DuplicateEntry`]
//! - **traits** - storage abstractions used by the domain services
//! - **repositories** - SQLite implementations, one per table

pub mod connection;
pub mod errors;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use errors::DuplicateEntry;
pub use repositories::{AttendanceRepository, HolidayRepository, TargetRepository, UserRepository};
pub use traits::{
    AttendanceStorage, DateOrder, HolidayStorage, NewAttendanceLog, NewTarget, TargetStorage,
    UpsertedLog, UserStorage,
};
