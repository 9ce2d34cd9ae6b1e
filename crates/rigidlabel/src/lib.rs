#![forbid(unsafe_code)]

//! RigidLabel: tie-point labeling for rigid image registration.
//!
//! This crate ties the workspace together. It re-exports the model
//! (`rigidlabel-core`), the service client (`rigidlabel-client`), and the
//! controller (`rigidlabel-runtime`), and adds what a program needs around
//! them: [`config`], [`logging`], and the `rigidlabel` command line.
//!
//! ```rust,ignore
//! use rigidlabel::{AppConfig, Labeler, HttpTransformService};
//!
//! let config = AppConfig::load_or_default(None)?;
//! let service = HttpTransformService::new(&config.http_config())?;
//! let mut labeler = Labeler::new(config.labeler_settings());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use cli::{Cli, Commands, run, run_from_env};
pub use config::{AppConfig, ConfigError};
pub use error::{CliError, Result};

pub use rigidlabel_client::{
    ErrorCode, HttpConfig, HttpTransformService, ServiceError, TransformService,
};
pub use rigidlabel_core::{
    CoordinateConverter, ImageSize, OriginMode, Point2, Side, TiePointModel, TiePointPair,
    TransformMode, TransformResult, TransformSession,
};
pub use rigidlabel_runtime::{
    HistoryOutcome, ImageInfo, Labeler, LabelerError, LabelerSettings, ServiceWorker,
};
