//! Value objects representing immutable domain concepts.

pub mod delivery;

pub use delivery::{ChannelDeliveryResult, DeliveryOptions};
