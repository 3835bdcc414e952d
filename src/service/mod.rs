//! The two request families: assets and tier configurations.
//!
//! Each is a [`RequestFamily`](crate::transition::RequestFamily) plugged into the
//! shared [`TransitionEngine`](crate::transition::TransitionEngine), plus the trait
//! naming its public operations.

pub mod asset;
pub mod tier_configuration;

pub use asset::{AssetManagementService, AssetRequests, AssetTransitionService};
pub use tier_configuration::{
    TierConfigRequests, TierConfigTransitionService, TierConfigurationManagementService,
};
