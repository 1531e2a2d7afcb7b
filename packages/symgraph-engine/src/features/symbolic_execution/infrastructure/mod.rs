//! Exploration machinery: transfer functions and the worklist driver.

pub mod driver;
pub mod transfer;

pub use driver::Driver;
pub use transfer::TransferContext;
