//! Account models exchanged with the remote API.

pub mod user;

pub use user::{Credentials, NewUser, ProfileUpdate, UserProfile};
