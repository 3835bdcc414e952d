//! Business objects of the fulfillment API.
//!
//! These are thin typed views over the raw JSON the API exchanges:
//! - Requests and their status
//! - Assets and tier configurations, with their parameters

pub mod object;
pub mod request;
pub mod resources;

pub use object::{BusinessObject, SubResource};
pub use request::{Request, RequestStatus};
pub use resources::{Asset, TierConfiguration};
