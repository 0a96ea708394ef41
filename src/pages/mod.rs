pub mod home;
pub mod installations;
pub mod login;
pub mod profile;
pub mod register;
pub mod reservations;
pub mod server;
