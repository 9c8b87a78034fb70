pub mod activity;
pub mod admins;
pub mod applications;
pub mod contacts;
pub mod dashboard;
pub mod jobs;
pub mod newsletter;
