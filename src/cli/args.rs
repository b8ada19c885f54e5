//! Command-line argument parsing

use clap::Parser;

use crate::error::{CredsError, Result};
use crate::registry::OperatingSystemType;

#[derive(Parser)]
#[command(name = "docker-registry-creds")]
#[command(about = "Renders the commands that install Docker registry credentials on a build machine")]
#[command(version)]
pub struct Args {
    /// Docker Hub credential secret
    #[arg(
        long = "docker-hub-secret",
        help = "ARN of the secret holding Docker Hub credentials"
    )]
    pub docker_hub_secret: Option<String>,

    /// Custom registries
    #[arg(
        long = "custom",
        value_name = "DOMAIN=SECRET-ARN",
        help = "Custom registry domain and the ARN of its credential secret"
    )]
    pub custom: Vec<String>,

    /// ECR repositories
    #[arg(
        long = "ecr",
        value_name = "REPOSITORY-URI",
        help = "ECR repository URI; the registry domain is derived from it"
    )]
    pub ecr: Vec<String>,

    /// Role assumed before credentials are fetched
    #[arg(
        long = "assume-role",
        help = "ARN of a role to assume for every registry"
    )]
    pub assume_role: Option<String>,

    /// Target shell family
    #[arg(
        long = "os",
        default_value = "linux",
        help = "Build machine OS family: linux or windows"
    )]
    pub os: String,

    /// Verbose output
    #[arg(long = "verbose", short = 'v', help = "Enable verbose output")]
    pub verbose: bool,

    /// Quiet output
    #[arg(long = "quiet", short = 'q', help = "Only print the rendered commands")]
    pub quiet: bool,
}

impl Args {
    pub fn os_type(&self) -> Result<OperatingSystemType> {
        match self.os.as_str() {
            "linux" => Ok(OperatingSystemType::Linux),
            "windows" => Ok(OperatingSystemType::Windows),
            other => Err(CredsError::Configuration(format!(
                "Unknown OS family: {}. Must be linux or windows",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_type_parses_known_families() {
        let mut args = Args::parse_from(["docker-registry-creds", "--os", "windows"]);
        assert_eq!(args.os_type().expect("windows"), OperatingSystemType::Windows);
        args.os = "linux".to_string();
        assert_eq!(args.os_type().expect("linux"), OperatingSystemType::Linux);
    }

    #[test]
    fn test_os_type_rejects_unknown_family() {
        let args = Args::parse_from(["docker-registry-creds", "--os", "plan9"]);
        assert!(matches!(args.os_type(), Err(CredsError::Configuration(_))));
    }
}
