pub mod activity;
pub mod authn;
