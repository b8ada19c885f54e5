//! Registry module for Docker registry credential sources
//!
//! This module models the three places a pipeline's Docker credentials can
//! come from and renders that model into the commands that install the
//! credentials on a build machine.

pub mod credentials;
pub mod install;

pub use credentials::{
    CredentialSource, DOCKER_HUB_DOMAIN, DockerRegistry, EcrRegistryOptions,
    ExternalRegistryOptions, RegistryUsage,
};
pub use install::{CREDS_CONFIG_VERSION, OperatingSystemType, docker_registries_install_commands};
