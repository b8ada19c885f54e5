//! Main workflow: assemble registries from arguments and render the
//! install commands

use std::sync::Arc;

use crate::cli::args::Args;
use crate::error::{CredsError, Result};
use crate::iam::{Repository, RepositoryHandle, Role, RoleHandle, SecretHandle};
use crate::output::OutputManager;
use crate::registry::{
    DockerRegistry, EcrRegistryOptions, ExternalRegistryOptions,
    docker_registries_install_commands,
};

pub fn run(args: &Args, output: &OutputManager) -> Result<Vec<String>> {
    let os_type = args.os_type()?;
    let assume_role: Option<Arc<dyn Role>> = args
        .assume_role
        .as_ref()
        .map(|arn| Arc::new(RoleHandle::from_arn(arn)) as Arc<dyn Role>);

    let mut registries = Vec::new();

    if let Some(arn) = &args.docker_hub_secret {
        output.verbose(&format!("Adding Docker Hub registry backed by {}", arn));
        let mut opts = ExternalRegistryOptions::new(Arc::new(SecretHandle::from_arn(arn)));
        opts.assume_role = assume_role.clone();
        registries.push(DockerRegistry::from_docker_hub(opts));
    }

    for pair in &args.custom {
        let (domain, arn) = pair.split_once('=').ok_or_else(|| {
            CredsError::Configuration(format!("Expected DOMAIN=SECRET-ARN, got: {}", pair))
        })?;
        if domain.is_empty() {
            return Err(CredsError::Configuration(
                "Registry domain cannot be empty".to_string(),
            ));
        }
        output.verbose(&format!("Adding custom registry {} backed by {}", domain, arn));
        let mut opts = ExternalRegistryOptions::new(Arc::new(SecretHandle::from_arn(arn)));
        opts.assume_role = assume_role.clone();
        registries.push(DockerRegistry::from_custom_registry(domain, opts));
    }

    for uri in &args.ecr {
        output.verbose(&format!("Adding ECR registry for {}", uri));
        let mut opts = EcrRegistryOptions::default();
        opts.assume_role = assume_role.clone();
        registries.push(DockerRegistry::from_ecr(
            vec![Arc::new(RepositoryHandle::from_uri(uri)) as Arc<dyn Repository>],
            opts,
        )?);
    }

    if registries.is_empty() {
        return Err(CredsError::Configuration(
            "No registries given; pass --docker-hub-secret, --custom or --ecr".to_string(),
        ));
    }

    output.verbose(&format!(
        "Rendering install commands for {} registries",
        registries.len()
    ));
    docker_registries_install_commands(Some(&registries), Some(os_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn render(argv: &[&str]) -> Result<Vec<String>> {
        let mut full = vec!["docker-registry-creds"];
        full.extend_from_slice(argv);
        run(&Args::parse_from(full), &OutputManager::new_quiet())
    }

    #[test]
    fn test_run_requires_at_least_one_registry() {
        assert!(matches!(render(&[]), Err(CredsError::Configuration(_))));
    }

    #[test]
    fn test_run_rejects_malformed_custom_pair() {
        let result = render(&["--custom", "registry.example.com"]);
        assert!(matches!(result, Err(CredsError::Configuration(_))));
    }

    #[test]
    fn test_run_renders_commands_for_mixed_registries() {
        let commands = render(&[
            "--docker-hub-secret",
            "arn:aws:secretsmanager:us-east-1:123:secret:hub",
            "--ecr",
            "123.dkr.ecr.us-east-1.amazonaws.com/app:latest",
            "--os",
            "windows",
        ])
        .expect("render");

        assert_eq!(commands.len(), 3);
        assert!(commands[2].contains("index.docker.io"));
        assert!(commands[2].contains("123.dkr.ecr.us-east-1.amazonaws.com"));
        assert!(commands[2].contains(r"%USERPROFILE%\.cdk"));
    }

    #[test]
    fn test_run_applies_assume_role_to_every_registry() {
        let commands = render(&[
            "--docker-hub-secret",
            "arn:aws:secretsmanager:us-east-1:123:secret:hub",
            "--ecr",
            "123.dkr.ecr.us-east-1.amazonaws.com/app:latest",
            "--assume-role",
            "arn:aws:iam::123:role/docker-creds",
        ])
        .expect("render");

        let occurrences = commands[2].matches("arn:aws:iam::123:role/docker-creds").count();
        assert_eq!(occurrences, 2);
    }
}
