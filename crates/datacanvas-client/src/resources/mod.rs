//! Resource facades over a shared [`Transport`](crate::Transport).
//!
//! Facades borrow the transport owned by [`DataCanvas`](crate::DataCanvas);
//! they hold no state of their own.

mod data;
mod devices;

pub use data::DataResource;
pub use devices::DevicesResource;
