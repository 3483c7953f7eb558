//! Core resolver implementation for Sanad DI.

pub mod binding;
pub mod block;
pub mod cache;
pub mod class;
pub mod container;
pub mod error;
pub mod overrides;
pub mod provider;
pub mod registry;
pub mod value;

pub use binding::{BindingBlock, BindingEntry, BindingTable};
pub use block::BlockKind;
pub use class::{Arguments, ClassDescriptor, Parameter};
pub use container::{Container, ContainerBuilder, prelude};
pub use error::{Result, SanadError};
pub use overrides::Overrides;
pub use value::{Instance, Value};
