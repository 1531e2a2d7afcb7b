//! Use-case layer: configuring and running one exploration.

mod explorer;

pub use explorer::{Explorer, Walk};
