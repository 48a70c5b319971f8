pub mod attendance_repository;
pub mod holiday_repository;
pub mod target_repository;
pub mod user_repository;

pub use attendance_repository::AttendanceRepository;
pub use holiday_repository::HolidayRepository;
pub use target_repository::TargetRepository;
pub use user_repository::UserRepository;
