pub mod adaptors;
pub mod auth;
pub mod listing;
pub mod uploads;

#[cfg(test)]
pub mod testing;
