//! Deep copy engine for handing out entities without aliasing store state.
//!
//! # Responsibility
//! - Provide a structural copy strategy (`DeepCopy`) with depth and cycle
//!   guards.
//! - Provide a JSON round trip strategy for serializable types.
//! - Provide a type-identity registry for callers that only hold `dyn Any`.
//!
//! # Invariants
//! - Copying never mutates the source.
//! - Absent values (`None`) copy to absent values.
//! - Strategy preconditions that do not hold are errors, never silent
//!   fallbacks to another strategy.

use crate::config::CopyConfig;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::type_name;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json;
pub mod registry;
pub mod structural;

pub use json::{clone_json, clone_json_opt, copy_matching_fields};
pub use registry::CopierRegistry;
pub use structural::{CopyContext, DeepCopy, DEFAULT_MAX_DEPTH};

pub type CopyResult<T> = Result<T, CopyError>;

/// Deep copy failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyError {
    /// No copy path is registered for the runtime type.
    UnsupportedType { type_name: String },
    /// The JSON strategy could not encode or decode the value.
    NotSerializable { type_name: String, reason: String },
    RecursionLimitExceeded { limit: usize },
    /// A shared pointer was reached again while it was still being copied.
    CycleDetected { type_name: String },
    BorrowConflict { type_name: String },
}

impl Display for CopyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedType { type_name } => {
                write!(f, "no copy strategy registered for type `{type_name}`")
            }
            Self::NotSerializable { type_name, reason } => {
                write!(f, "type `{type_name}` is not serializable: {reason}")
            }
            Self::RecursionLimitExceeded { limit } => {
                write!(f, "object graph is deeper than the copy limit of {limit}")
            }
            Self::CycleDetected { type_name } => {
                write!(f, "cyclic reference detected while copying `{type_name}`")
            }
            Self::BorrowConflict { type_name } => {
                write!(f, "`RefCell<{type_name}>` is mutably borrowed during copy")
            }
        }
    }
}

impl Error for CopyError {}

/// How [`ObjectCopier::snapshot`] copies values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyStrategy {
    /// Field-by-field copy through `DeepCopy` implementations.
    #[default]
    Structural,
    /// Encode to JSON text and decode a fresh value.
    JsonRoundTrip,
}

impl CopyStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::JsonRoundTrip => "json_round_trip",
        }
    }
}

impl Display for CopyStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured entry point for every copy strategy.
#[derive(Debug)]
pub struct ObjectCopier {
    strategy: CopyStrategy,
    max_depth: usize,
    registry: CopierRegistry,
}

impl Default for ObjectCopier {
    fn default() -> Self {
        Self::new(&CopyConfig::default())
    }
}

impl ObjectCopier {
    pub fn new(config: &CopyConfig) -> Self {
        Self::with_registry(config, CopierRegistry::new())
    }

    pub fn with_registry(config: &CopyConfig, registry: CopierRegistry) -> Self {
        Self {
            strategy: config.strategy,
            max_depth: config.max_depth,
            registry,
        }
    }

    pub fn strategy(&self) -> CopyStrategy {
        self.strategy
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn registry(&self) -> &CopierRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CopierRegistry {
        &mut self.registry
    }

    /// Fresh traversal context bounded by the configured depth.
    pub fn context(&self) -> CopyContext {
        CopyContext::with_max_depth(self.max_depth)
    }

    /// Structural copy, regardless of the configured strategy.
    pub fn deep_copy<T: DeepCopy>(&self, source: &T) -> CopyResult<T> {
        source
            .deep_copy_in(&mut self.context())
            .inspect_err(|err| log_copy_failure::<T>(CopyStrategy::Structural, err))
    }

    pub fn deep_copy_opt<T: DeepCopy>(&self, source: Option<&T>) -> CopyResult<Option<T>> {
        source.map(|value| self.deep_copy(value)).transpose()
    }

    /// JSON round trip copy, regardless of the configured strategy.
    pub fn clone_json<T>(&self, source: &T) -> CopyResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        clone_json(source)
            .inspect_err(|err| log_copy_failure::<T>(CopyStrategy::JsonRoundTrip, err))
    }

    /// Copies with the configured strategy.
    pub fn snapshot<T>(&self, source: &T) -> CopyResult<T>
    where
        T: DeepCopy + Serialize + DeserializeOwned,
    {
        match self.strategy {
            CopyStrategy::Structural => self.deep_copy(source),
            CopyStrategy::JsonRoundTrip => self.clone_json(source),
        }
    }

    /// Copies through the registry entry for `T`.
    ///
    /// # Errors
    /// - `UnsupportedType` when `T` was never registered.
    pub fn copy<T: 'static>(&self, source: &T) -> CopyResult<T> {
        self.registry.copy(source, &mut self.context())
    }
}

fn log_copy_failure<T>(strategy: CopyStrategy, err: &CopyError) {
    warn!(
        "event=deep_copy module=copy status=error strategy={} type={} error={}",
        strategy,
        type_name::<T>(),
        err
    );
}
