#[cfg(feature = "ssr")]
pub mod api;
pub mod booking;
pub mod installation;
pub mod pricing;
pub mod reservation;
pub mod session;
pub mod shared_booking;
pub mod slots;
