pub mod booking;
pub mod station;
pub mod user;
pub mod vehicle;

pub use booking::{Booking, BookingStatus, IdentityDocuments, UiStage, CONTRACTED_LABEL};
pub use station::{FleetSnapshot, Station, StationWithStaff};
pub use user::User;
pub use vehicle::Vehicle;
