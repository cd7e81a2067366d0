mod user;

pub use user::{Address, NewUser, User, UserId};
