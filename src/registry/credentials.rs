//! Docker registry credential sources
//!
//! Three ways a deployment pipeline can obtain Docker credentials: Docker Hub
//! behind a stored secret, a custom registry behind a stored secret, and ECR
//! through the build machine's ambient identity.

use std::sync::Arc;

use serde::Serialize;

use crate::error::{CredsError, Result};
use crate::iam::{Grantable, PolicyStatement, Repository, Role, Secret};

/// Domain under which Docker Hub credentials are looked up
pub const DOCKER_HUB_DOMAIN: &str = "index.docker.io";

/// Pipeline phases that may need registry credentials
///
/// Carried on the options but not consulted when rendering; reserved for
/// phase-scoped credential installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryUsage {
    Synth,
    SelfUpdate,
    AssetPublishing,
}

/// Options for a secret-backed registry (Docker Hub or a custom domain)
#[derive(Clone)]
pub struct ExternalRegistryOptions {
    /// Secret holding the registry username and password
    pub secret: Arc<dyn Secret>,
    /// Field inside the secret payload holding the username
    pub secret_username_field: Option<String>,
    /// Field inside the secret payload holding the password
    pub secret_password_field: Option<String>,
    /// Role to assume before reading the secret
    pub assume_role: Option<Arc<dyn Role>>,
    /// Pipeline phases that need this registry
    pub usages: Option<Vec<RegistryUsage>>,
}

impl ExternalRegistryOptions {
    pub fn new(secret: Arc<dyn Secret>) -> Self {
        Self {
            secret,
            secret_username_field: None,
            secret_password_field: None,
            assume_role: None,
            usages: None,
        }
    }

    pub fn with_username_field(mut self, field: impl Into<String>) -> Self {
        self.secret_username_field = Some(field.into());
        self
    }

    pub fn with_password_field(mut self, field: impl Into<String>) -> Self {
        self.secret_password_field = Some(field.into());
        self
    }

    pub fn with_assume_role(mut self, role: Arc<dyn Role>) -> Self {
        self.assume_role = Some(role);
        self
    }

    pub fn with_usages(mut self, usages: Vec<RegistryUsage>) -> Self {
        self.usages = Some(usages);
        self
    }
}

/// Options for an ECR-backed registry
#[derive(Clone, Default)]
pub struct EcrRegistryOptions {
    /// Role to assume before pulling
    pub assume_role: Option<Arc<dyn Role>>,
    /// Pipeline phases that need this registry
    pub usages: Option<Vec<RegistryUsage>>,
}

impl EcrRegistryOptions {
    pub fn with_assume_role(mut self, role: Arc<dyn Role>) -> Self {
        self.assume_role = Some(role);
        self
    }

    pub fn with_usages(mut self, usages: Vec<RegistryUsage>) -> Self {
        self.usages = Some(usages);
        self
    }
}

/// Where a pipeline's Docker images and credentials come from
pub enum DockerRegistry {
    /// Docker Hub behind a stored secret
    DockerHub(ExternalRegistryOptions),
    /// A custom registry domain behind a stored secret
    Custom {
        domain: String,
        opts: ExternalRegistryOptions,
    },
    /// One or more ECR repositories sharing a registry domain
    Ecr {
        domain: String,
        repositories: Vec<Arc<dyn Repository>>,
        opts: EcrRegistryOptions,
    },
}

impl std::fmt::Debug for DockerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DockerHub(_) => f.debug_tuple("DockerHub").finish_non_exhaustive(),
            Self::Custom { domain, .. } => f
                .debug_struct("Custom")
                .field("domain", domain)
                .finish_non_exhaustive(),
            Self::Ecr { domain, .. } => f
                .debug_struct("Ecr")
                .field("domain", domain)
                .finish_non_exhaustive(),
        }
    }
}

impl DockerRegistry {
    /// Registry backed by Docker Hub credentials stored in a secret
    pub fn from_docker_hub(opts: ExternalRegistryOptions) -> Self {
        Self::DockerHub(opts)
    }

    /// Registry at a caller-supplied domain, backed by a stored secret
    pub fn from_custom_registry(domain: impl Into<String>, opts: ExternalRegistryOptions) -> Self {
        Self::Custom {
            domain: domain.into(),
            opts,
        }
    }

    /// Registry serving one or more ECR repositories
    ///
    /// The registry domain is derived from the first repository's URI, so at
    /// least one repository is required. All repositories are expected to
    /// live under the same registry domain; this is not verified.
    pub fn from_ecr(
        repositories: Vec<Arc<dyn Repository>>,
        opts: EcrRegistryOptions,
    ) -> Result<Self> {
        let domain = derive_registry_domain(&repositories)?;
        Ok(Self::Ecr {
            domain,
            repositories,
            opts,
        })
    }

    /// Hostname used as the credential lookup key
    pub fn registry_domain(&self) -> &str {
        match self {
            Self::DockerHub(_) => DOCKER_HUB_DOMAIN,
            Self::Custom { domain, .. } => domain,
            Self::Ecr { domain, .. } => domain,
        }
    }

    /// Authorize `grantee` to fetch credentials and images from this registry
    ///
    /// When an assume-role is configured the grantee only receives the
    /// `sts:AssumeRole` grant; the data-access grant goes to the role. For
    /// ECR, every repository is granted, not just the one the domain was
    /// derived from.
    pub fn grant_read(&self, grantee: &dyn Grantable) {
        match self {
            Self::DockerHub(opts) => grant_external_read(opts, grantee),
            Self::Custom { opts, .. } => grant_external_read(opts, grantee),
            Self::Ecr {
                repositories, opts, ..
            } => {
                let effective = grant_assume_role(opts.assume_role.as_deref(), grantee);
                for repository in repositories {
                    repository.grant_pull(effective);
                }
            }
        }
    }

    /// Render this registry as a credential-source record
    ///
    /// Consumed by the installer when assembling the credential config file.
    pub fn render_credential_source(&self) -> CredentialSource {
        match self {
            Self::DockerHub(opts) => render_external(opts),
            Self::Custom { opts, .. } => render_external(opts),
            Self::Ecr { opts, .. } => CredentialSource {
                secrets_manager_secret_id: None,
                secrets_username_field: None,
                secrets_password_field: None,
                ecr_repository: Some(true),
                assume_role_arn: opts.assume_role.as_ref().map(|role| role.role_arn().to_string()),
            },
        }
    }
}

/// Credential-source record for one registry domain, in the shape the asset
/// publishing tool reads from the credential config file
///
/// Exactly one of the secret fields or `ecr_repository` is populated; absent
/// fields are omitted from the serialized form rather than written as null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets_manager_secret_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets_username_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets_password_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecr_repository: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assume_role_arn: Option<String>,
}

/// Grant `sts:AssumeRole` when a role is configured and return the effective
/// principal for the data-access grant
fn grant_assume_role<'a>(
    assume_role: Option<&'a dyn Role>,
    grantee: &'a dyn Grantable,
) -> &'a dyn Grantable {
    match assume_role {
        Some(role) => {
            grantee.grant_principal().add_to_principal_policy(PolicyStatement::new(
                &["sts:AssumeRole"],
                &[role.role_arn()],
            ));
            role
        }
        None => grantee,
    }
}

fn grant_external_read(opts: &ExternalRegistryOptions, grantee: &dyn Grantable) {
    let effective = grant_assume_role(opts.assume_role.as_deref(), grantee);
    opts.secret.grant_read(effective);
}

fn render_external(opts: &ExternalRegistryOptions) -> CredentialSource {
    CredentialSource {
        secrets_manager_secret_id: Some(opts.secret.secret_arn().to_string()),
        secrets_username_field: opts.secret_username_field.clone(),
        secrets_password_field: opts.secret_password_field.clone(),
        ecr_repository: None,
        assume_role_arn: opts.assume_role.as_ref().map(|role| role.role_arn().to_string()),
    }
}

/// First `/`-segment of the first repository's URI
fn derive_registry_domain(repositories: &[Arc<dyn Repository>]) -> Result<String> {
    let first = repositories.first().ok_or_else(|| {
        CredsError::Validation(
            "must supply at least one repository to create an ECR registry".to_string(),
        )
    })?;
    let uri = first.repository_uri();
    Ok(uri.split('/').next().unwrap_or(uri.as_str()).to_string())
}
