//! Request lifecycle facades over the CloudBlue Connect fulfillment API.
//!
//! This crate turns business actions on asset and tier-configuration requests
//! (approve, fail, inquire, update parameters) into the matching API calls and
//! wraps the responses into typed business objects. Every action accepts a
//! [`Continuation`] deciding what the caller gets back on success and on error.
//!
//! Start from [`ConnectFacade`], which exposes both request families through the
//! [`AssetManagementService`] and [`TierConfigurationManagementService`] traits.

pub mod client;
pub mod domain;
pub mod error;
pub mod facade;
pub mod http;
pub mod service;
pub mod transition;

// Re-export commonly used types
pub use client::{ClientConfig, ConnectClient};
pub use domain::{Asset, BusinessObject, Request, RequestStatus, SubResource, TierConfiguration};
pub use error::{ClientError, FacadeError, Result};
pub use facade::ConnectFacade;
pub use http::{HttpClient, HttpResponse, MockHttpClient, ReqwestHttpClient};
pub use service::{
    AssetManagementService, AssetTransitionService, TierConfigTransitionService,
    TierConfigurationManagementService,
};
pub use transition::{Continuation, StatusTransition, TransitionAction};
