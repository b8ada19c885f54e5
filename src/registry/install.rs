//! Build-machine install command rendering
//!
//! Turns a set of registries into the shell commands that write the
//! credential config file read by the asset publishing tool
//! (`~/.cdk/cdk-docker-creds.json`).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::registry::credentials::DockerRegistry;

/// Version tag of the credential config file format
pub const CREDS_CONFIG_VERSION: &str = "1.0";

/// Login step for the build tool's own package feed; emitted ahead of the
/// credential file regardless of registry content
const PACKAGE_FEED_LOGIN: &str =
    "aws codeartifact login --tool npm --domain cdk1 --repository CDKPackageInjector";

/// Shell family of the build machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingSystemType {
    Linux,
    Windows,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredsConfigFile {
    version: &'static str,
    domain_credentials: Map<String, Value>,
}

/// Commands that install registry credentials on a build machine
///
/// Returns an empty sequence when no registries are given; no file is
/// written in that case. The credential map is keyed by registry domain and
/// built insertion-ordered; a later registry sharing a domain with an
/// earlier one overwrites its entry. An absent or unrecognized `os_type`
/// renders the POSIX form.
pub fn docker_registries_install_commands(
    registries: Option<&[DockerRegistry]>,
    os_type: Option<OperatingSystemType>,
) -> Result<Vec<String>> {
    let registries = match registries {
        Some(registries) if !registries.is_empty() => registries,
        _ => return Ok(Vec::new()),
    };

    let mut domain_credentials = Map::new();
    for registry in registries {
        domain_credentials.insert(
            registry.registry_domain().to_string(),
            serde_json::to_value(registry.render_credential_source())?,
        );
    }
    let config = serde_json::to_string(&CredsConfigFile {
        version: CREDS_CONFIG_VERSION,
        domain_credentials,
    })?;

    Ok(match os_type {
        Some(OperatingSystemType::Windows) => vec![
            PACKAGE_FEED_LOGIN.to_string(),
            r"if not exist %USERPROFILE%\.cdk mkdir %USERPROFILE%\.cdk".to_string(),
            format!(r"echo '{}' > %USERPROFILE%\.cdk\cdk-docker-creds.json", config),
        ],
        _ => vec![
            PACKAGE_FEED_LOGIN.to_string(),
            "mkdir -p $HOME/.cdk".to_string(),
            format!("echo '{}' > $HOME/.cdk/cdk-docker-creds.json", config),
        ],
    })
}
