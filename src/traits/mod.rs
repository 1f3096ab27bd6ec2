//! Capability traits
//!
//! The inbound contract the orchestrating client programs against.

pub mod api_handler;
pub mod model_listing;

pub use api_handler::ApiHandler;
pub use model_listing::ModelListingCapability;
