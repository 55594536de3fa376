//! Persistent object store with optimistic concurrency and a watch stream.

pub mod client;
pub mod watch;
