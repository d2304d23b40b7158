//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject duplicate or empty cluster names
//! - Reject empty identifiers that would never match
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ShimConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::ShimConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("router.shim_id must not be empty")]
    EmptyShimId,

    #[error("router.cluster_parameter must not be empty")]
    EmptyClusterParameter,

    #[error("cluster #{0} has an empty name")]
    EmptyClusterName(usize),

    #[error("cluster '{0}' is defined more than once")]
    DuplicateCluster(String),

    #[error("cluster '{0}' has an empty shim_identifier")]
    EmptyShimIdentifier(String),

    #[error("cluster '{0}' has hive_port 0")]
    InvalidPort(String),
}

pub fn validate_config(config: &ShimConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.router.shim_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
        errors.push(ValidationError::EmptyShimId);
    }
    if config.router.cluster_parameter.trim().is_empty() {
        errors.push(ValidationError::EmptyClusterParameter);
    }

    let mut seen = HashSet::new();
    for (idx, cluster) in config.clusters.iter().enumerate() {
        if cluster.name.trim().is_empty() {
            errors.push(ValidationError::EmptyClusterName(idx));
            continue;
        }
        if !seen.insert(cluster.name.as_str()) {
            errors.push(ValidationError::DuplicateCluster(cluster.name.clone()));
        }
        if cluster.shim_identifier.as_deref().is_some_and(|id| id.trim().is_empty()) {
            errors.push(ValidationError::EmptyShimIdentifier(cluster.name.clone()));
        }
        if cluster.hive_port == Some(0) {
            errors.push(ValidationError::InvalidPort(cluster.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ClusterConfig;

    fn cluster(name: &str, shim: Option<&str>) -> ClusterConfig {
        ClusterConfig {
            name: name.into(),
            shim_identifier: shim.map(String::from),
            hive_host: None,
            hive_port: None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ShimConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ShimConfig::default();
        config.router.shim_id = Some(" ".into());
        config.router.cluster_parameter = String::new();
        config.clusters = vec![
            cluster("prod", Some("cdh514")),
            cluster("prod", Some("")),
            cluster("", None),
        ];
        config.clusters[0].hive_port = Some(0);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyShimId,
                ValidationError::EmptyClusterParameter,
                ValidationError::InvalidPort("prod".into()),
                ValidationError::DuplicateCluster("prod".into()),
                ValidationError::EmptyShimIdentifier("prod".into()),
                ValidationError::EmptyClusterName(2),
            ]
        );
    }
}
