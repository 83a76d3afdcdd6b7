//! Resolve the most recently pushed image tag of container repositories into
//! selectable `repository:tag` build parameter choices.

pub mod catalog;
pub mod diagnostics;
pub mod parameter;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod state;

pub use catalog::{CatalogError, ParameterCatalog, ParameterFactory};
pub use diagnostics::{DiagnosticSink, TracingSink};
pub use parameter::{
    EcrTagParameterDefinition, ParameterDefinition, ParameterError, ParameterSpec, ParameterValue,
};
pub use registry::{ImageRecord, RegistryClient, RegistryError};
pub use resolver::{OptionList, ResolutionError, TagResolver};
