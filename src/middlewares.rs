pub mod jwt;
pub mod recover;
