#![forbid(unsafe_code)]

//! Client side of the RigidLabel transform service.
//!
//! The service fits transforms, stores labels, and renders previews. This
//! crate owns the wire format ([`wire`]), the [`TransformService`] trait the
//! rest of the application codes against, and a blocking reqwest
//! implementation ([`HttpTransformService`]).

pub mod error;
pub mod http;
pub mod service;
pub mod wire;

pub use error::{ErrorCode, Result, ServiceError};
pub use http::{DEFAULT_BASE_URL, HttpConfig, HttpTransformService};
pub use service::TransformService;
pub use wire::{
    CheckerboardPreview, CheckerboardRequest, ComputeRequest, Envelope, HealthInfo, Label,
    LabelListItem, LabelMeta, LabelSaveResult, TiePointDto,
};
