//! Grant primitives for registry credential access
//!
//! Contracts for the identity collaborators a registry depends on: stored
//! secrets, assumable roles, pull-able repositories, and the principals that
//! accumulate policy grants. The handle types give the CLI and tests a
//! working in-memory implementation of those contracts.

use std::sync::Mutex;

/// A single policy grant: a set of actions over a set of resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyStatement {
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

impl PolicyStatement {
    pub fn new(actions: &[&str], resources: &[&str]) -> Self {
        Self {
            actions: actions.iter().map(|a| a.to_string()).collect(),
            resources: resources.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Accumulates policy statements. Append-only: statements are added,
/// never removed.
pub trait Principal {
    fn add_to_principal_policy(&self, statement: PolicyStatement);
}

/// Anything that can receive grants through its principal
pub trait Grantable {
    fn grant_principal(&self) -> &dyn Principal;
}

/// An assumable role; grantable so it can act as the effective principal
/// for data-access grants
pub trait Role: Grantable {
    fn role_arn(&self) -> &str;
}

/// Externally stored credential material
pub trait Secret {
    fn secret_arn(&self) -> &str;
    fn grant_read(&self, grantee: &dyn Grantable);
}

/// A container repository that can authorize pulls
pub trait Repository {
    /// Repository URI in `domain/path:tag` form
    fn repository_uri(&self) -> String;
    fn grant_pull(&self, grantee: &dyn Grantable);
}

/// Secret referenced by ARN
#[derive(Debug)]
pub struct SecretHandle {
    arn: String,
}

impl SecretHandle {
    pub fn from_arn(arn: impl Into<String>) -> Self {
        Self { arn: arn.into() }
    }
}

impl Secret for SecretHandle {
    fn secret_arn(&self) -> &str {
        &self.arn
    }

    fn grant_read(&self, grantee: &dyn Grantable) {
        grantee.grant_principal().add_to_principal_policy(PolicyStatement::new(
            &[
                "secretsmanager:GetSecretValue",
                "secretsmanager:DescribeSecret",
            ],
            &[self.arn.as_str()],
        ));
    }
}

/// Repository referenced by URI
#[derive(Debug)]
pub struct RepositoryHandle {
    uri: String,
}

impl RepositoryHandle {
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

impl Repository for RepositoryHandle {
    fn repository_uri(&self) -> String {
        self.uri.clone()
    }

    fn grant_pull(&self, grantee: &dyn Grantable) {
        grantee.grant_principal().add_to_principal_policy(PolicyStatement::new(
            &[
                "ecr:BatchCheckLayerAvailability",
                "ecr:GetDownloadUrlForLayer",
                "ecr:BatchGetImage",
            ],
            &[self.uri.as_str()],
        ));
    }
}

/// Role referenced by ARN, with an in-memory principal policy
#[derive(Debug)]
pub struct RoleHandle {
    arn: String,
    statements: Mutex<Vec<PolicyStatement>>,
}

impl RoleHandle {
    pub fn from_arn(arn: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            statements: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the statements accumulated so far
    pub fn statements(&self) -> Vec<PolicyStatement> {
        self.statements.lock().expect("policy lock poisoned").clone()
    }
}

impl Principal for RoleHandle {
    fn add_to_principal_policy(&self, statement: PolicyStatement) {
        self.statements
            .lock()
            .expect("policy lock poisoned")
            .push(statement);
    }
}

impl Grantable for RoleHandle {
    fn grant_principal(&self) -> &dyn Principal {
        self
    }
}

impl Role for RoleHandle {
    fn role_arn(&self) -> &str {
        &self.arn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_grant_read_adds_read_actions() {
        let secret = SecretHandle::from_arn("arn:aws:secretsmanager:us-east-1:123:secret:hub");
        let grantee = RoleHandle::from_arn("arn:aws:iam::123:role/build");

        secret.grant_read(&grantee);

        let statements = grantee.statements();
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0],
            PolicyStatement::new(
                &[
                    "secretsmanager:GetSecretValue",
                    "secretsmanager:DescribeSecret"
                ],
                &["arn:aws:secretsmanager:us-east-1:123:secret:hub"],
            )
        );
    }

    #[test]
    fn test_repository_grant_pull_adds_pull_actions() {
        let repo = RepositoryHandle::from_uri("123.dkr.ecr.us-east-1.amazonaws.com/app:latest");
        let grantee = RoleHandle::from_arn("arn:aws:iam::123:role/build");

        repo.grant_pull(&grantee);

        let statements = grantee.statements();
        assert_eq!(statements.len(), 1);
        assert!(statements[0].actions.contains(&"ecr:BatchGetImage".to_string()));
        assert_eq!(
            statements[0].resources,
            vec!["123.dkr.ecr.us-east-1.amazonaws.com/app:latest"]
        );
    }

    #[test]
    fn test_role_handle_accumulates_statements_in_order() {
        let role = RoleHandle::from_arn("arn:aws:iam::123:role/publish");

        role.add_to_principal_policy(PolicyStatement::new(&["sts:AssumeRole"], &["a"]));
        role.add_to_principal_policy(PolicyStatement::new(&["ecr:BatchGetImage"], &["b"]));

        let statements = role.statements();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].actions, vec!["sts:AssumeRole"]);
        assert_eq!(statements[1].actions, vec!["ecr:BatchGetImage"]);
    }
}
