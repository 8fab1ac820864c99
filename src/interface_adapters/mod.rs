pub mod api;
pub mod clients;
pub mod protocol;
