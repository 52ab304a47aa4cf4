//! Typed helpers for individual Beanstalk resource areas.
//!
//! Each module is a set of free functions over a shared [`Client`](crate::Client).
//! Beanstalk wraps every record in a single-key envelope such as
//! `{"repository": {...}}`; the helpers strip it so callers get the record.

pub mod changesets;
pub mod repositories;
pub mod users;

pub use changesets::Changeset;
pub use repositories::Repository;
pub use users::User;
