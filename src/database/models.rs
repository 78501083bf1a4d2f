pub mod option;
pub mod question;
