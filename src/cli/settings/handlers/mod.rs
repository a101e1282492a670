//! Setting handlers for the different configuration shapes.

pub mod number;
pub mod simple;
pub mod toggle;

pub use number::*;
pub use simple::*;
pub use toggle::*;
