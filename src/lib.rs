//! Docker Registry Credentials Library
//!
//! This file serves as the library root for the docker-registry-creds crate.
//! It models where a deployment pipeline's Docker images and credentials come
//! from and renders the shell commands that install those credentials on a
//! build machine before it runs Docker operations.

pub mod cli;
pub mod error;
pub mod iam;
pub mod output;
pub mod registry;

pub use error::{CredsError, Result};
pub use output::OutputManager;
pub use registry::{
    CredentialSource, DockerRegistry, EcrRegistryOptions, ExternalRegistryOptions,
    OperatingSystemType, RegistryUsage, docker_registries_install_commands,
};
