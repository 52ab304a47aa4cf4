pub mod auth;
pub mod changesets;
pub mod repos;
pub mod request;
pub mod users;
