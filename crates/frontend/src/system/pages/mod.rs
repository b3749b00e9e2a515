pub mod index;
pub mod login;
