pub mod bookings;
pub mod error;
pub mod token;

pub use self::{
    bookings::{Booking, BookingStatus, BookingStore, PgBookingStore},
    error::{ModelError, ModelResult},
    token::TokenPayload,
};
