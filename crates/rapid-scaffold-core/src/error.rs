//! Error taxonomy for a scaffolding run
//!
//! Every fatal failure is a [`ScaffoldError`]. Soft-missing conditions are not
//! errors; they live in the run report (see [`crate::scaffold::SoftMissing`]).

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result alias used throughout the core
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Engine step during which a filesystem failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    PrepareDestination,
    CopySkeleton,
    Relocate,
    CopyManifest,
    PruneVariants,
    RemoveGeneratorFiles,
}

impl Step {
    pub fn number(&self) -> u8 {
        match self {
            Step::PrepareDestination => 1,
            Step::CopySkeleton => 2,
            Step::Relocate => 3,
            Step::CopyManifest => 4,
            Step::PruneVariants => 5,
            Step::RemoveGeneratorFiles => 6,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Step::PrepareDestination => "prepare destination",
            Step::CopySkeleton => "copy shared skeleton",
            Step::Relocate => "relocate variant subtrees",
            Step::CopyManifest => "copy variant package.json",
            Step::PruneVariants => "prune variant folders",
            Step::RemoveGeneratorFiles => "remove generator files",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "step {} ({})", self.number(), self.description())
    }
}

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Bad project name, unknown variant, unusable template manifest or skeleton
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Failed to fetch template from {reference}: {message}")]
    Fetch {
        reference: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Destination conflict at {}: {reason}", path.display())]
    DestinationConflict { path: PathBuf, reason: String },

    /// Unexpected filesystem failure while assembling the destination
    #[error("Scaffolding failed during {step} at {}: {source}", path.display())]
    Relocation {
        step: Step,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed: {status}")]
    Bootstrap { command: String, status: String },
}

impl ScaffoldError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn fetch(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            reference: reference.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn fetch_with_source<E>(
        reference: impl Into<String>,
        message: impl Into<String>,
        source: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Fetch {
            reference: reference.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn relocation(step: Step, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Relocation {
            step,
            path: path.into(),
            source,
        }
    }

    pub fn bootstrap_status(command: impl Into<String>, status: ExitStatus) -> Self {
        let status = match status.code() {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        Self::Bootstrap {
            command: command.into(),
            status,
        }
    }

    /// True for failures raised before the destination was touched
    pub fn is_pre_flight(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::Fetch { .. } | Self::DestinationConflict { .. }
        )
    }

    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput { .. } => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocation_message_names_step_and_path() {
        let err = ScaffoldError::relocation(
            Step::Relocate,
            "/tmp/app/src/hooks",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("step 3"));
        assert!(msg.contains("/tmp/app/src/hooks"));
        assert!(msg.contains("denied"));
        assert!(!err.is_pre_flight());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ScaffoldError::invalid_input("bad").exit_code(), 2);
        assert_eq!(ScaffoldError::fetch("ref", "down").exit_code(), 1);
    }

    #[test]
    fn test_pre_flight_classification() {
        assert!(ScaffoldError::invalid_input("bad").is_pre_flight());
        assert!(ScaffoldError::fetch("ref", "down").is_pre_flight());
        let conflict = ScaffoldError::DestinationConflict {
            path: PathBuf::from("/x"),
            reason: "not a directory".into(),
        };
        assert!(conflict.is_pre_flight());
        let bootstrap = ScaffoldError::Bootstrap {
            command: "pnpm install".into(),
            status: "exit code 1".into(),
        };
        assert!(!bootstrap.is_pre_flight());
    }
}
