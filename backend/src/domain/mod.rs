//! # Domain Module
//!
//! Business rules of the attendance tracker. Services here depend only on
//! the storage traits and on a [`Clock`], never on HTTP types.
//!
//! ## Module Organization
//!
//! - **user_service**: user creation and profile updates
//! - **attendance_service**: logging, quick logs, bulk saves and listings
//! - **holiday_service**: regional public holidays and the VIC FY26 seed
//! - **summary_service**: period summaries via [`shared::aggregate_period`]
//! - **target_service**: targets and progress toward the active one
//! - **export_service**: full JSON export of a user's data
//!
//! ## Business Rules
//!
//! - One attendance entry per user per date
//! - At most one active target per user
//! - Percentages are always within 0..=100
//! - Summaries use the holidays of the configured region

pub mod attendance_service;
pub mod clock;
pub mod errors;
pub mod export_service;
pub mod holiday_service;
pub mod summary_service;
pub mod target_service;
pub mod user_service;

pub use attendance_service::AttendanceService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{DomainError, DomainResult};
pub use export_service::ExportService;
pub use holiday_service::HolidayService;
pub use summary_service::SummaryService;
pub use target_service::TargetService;
pub use user_service::UserService;
