pub mod common;
pub mod option;
pub mod question;
