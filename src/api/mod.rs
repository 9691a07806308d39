//! REST boundary: request description, transport seam, envelope decoding
//! and the endpoint table.

pub mod endpoints;
pub mod envelope;
pub mod transport;

pub use envelope::*;
pub use transport::*;
