pub mod partner;
pub mod shared;
pub mod user;
