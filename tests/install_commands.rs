//! End-to-end rendering: registries in, install commands out

use std::sync::Arc;

use docker_registry_creds::iam::{Repository, RepositoryHandle, RoleHandle, Secret, SecretHandle};
use docker_registry_creds::{
    DockerRegistry, EcrRegistryOptions, ExternalRegistryOptions, OperatingSystemType,
    docker_registries_install_commands,
};

const HUB_SECRET_ARN: &str = "arn:aws:secretsmanager:us-east-1:123:secret:dockerhub";
const REPO_URI: &str = "123.dkr.ecr.us-east-1.amazonaws.com/app:latest";

fn pipeline_registries() -> Vec<DockerRegistry> {
    let secret: Arc<dyn Secret> = Arc::new(SecretHandle::from_arn(HUB_SECRET_ARN));
    let repository: Arc<dyn Repository> = Arc::new(RepositoryHandle::from_uri(REPO_URI));
    vec![
        DockerRegistry::from_docker_hub(ExternalRegistryOptions::new(secret)),
        DockerRegistry::from_ecr(vec![repository], EcrRegistryOptions::default())
            .expect("one repository"),
    ]
}

fn payload(commands: &[String]) -> serde_json::Value {
    let echo = commands.last().expect("echo command");
    let start = echo.find('\'').expect("opening quote");
    let end = echo.rfind('\'').expect("closing quote");
    serde_json::from_str(&echo[start + 1..end]).expect("valid JSON payload")
}

#[test]
fn test_two_registry_pipeline_renders_both_domains() {
    let registries = pipeline_registries();
    let commands =
        docker_registries_install_commands(Some(&registries), Some(OperatingSystemType::Linux))
            .expect("render");

    let config = payload(&commands);
    assert_eq!(config["version"], "1.0");

    let domains = config["domainCredentials"].as_object().expect("object");
    assert_eq!(domains.len(), 2);

    let hub = domains["index.docker.io"].as_object().expect("hub entry");
    assert_eq!(hub.len(), 1);
    assert_eq!(hub["secretsManagerSecretId"], HUB_SECRET_ARN);

    let ecr = domains["123.dkr.ecr.us-east-1.amazonaws.com"]
        .as_object()
        .expect("ecr entry");
    assert_eq!(ecr.len(), 1);
    assert_eq!(ecr["ecrRepository"], true);
}

#[test]
fn test_os_families_share_the_same_payload() {
    let registries = pipeline_registries();
    let linux =
        docker_registries_install_commands(Some(&registries), Some(OperatingSystemType::Linux))
            .expect("render");
    let windows =
        docker_registries_install_commands(Some(&registries), Some(OperatingSystemType::Windows))
            .expect("render");

    assert_eq!(payload(&linux), payload(&windows));
    // Bootstrap login is identical; only paths and mkdir differ
    assert_eq!(linux[0], windows[0]);
    assert_ne!(linux[1], windows[1]);
}

#[test]
fn test_granting_then_rendering_leaves_descriptors_pure() {
    let registries = pipeline_registries();
    let build_role = RoleHandle::from_arn("arn:aws:iam::123:role/build");
    for registry in &registries {
        registry.grant_read(&build_role);
    }

    // One secret-read grant plus one repository-pull grant
    assert_eq!(build_role.statements().len(), 2);

    // Granting does not change what gets rendered
    let commands =
        docker_registries_install_commands(Some(&registries), Some(OperatingSystemType::Linux))
            .expect("render");
    let domains = payload(&commands)["domainCredentials"]
        .as_object()
        .expect("object")
        .len();
    assert_eq!(domains, 2);
}
