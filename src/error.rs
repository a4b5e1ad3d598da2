//! Failure taxonomy surfaced to the user, plus configuration errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed cause carried by a failure. `anyhow::Error` converts into this
/// directly, which keeps the original chain available for logging.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The store operation a mutation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    /// Past-tense verb for success notifications ("created").
    pub fn past_tense(self) -> &'static str {
        match self {
            Mutation::Create => "created",
            Mutation::Update => "updated",
            Mutation::Delete => "deleted",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Mutation::Create => "create",
            Mutation::Update => "update",
            Mutation::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Everything that can go wrong while a view talks to the store. Each variant
/// is recovered at the view boundary: it becomes a notification and the view
/// keeps running.
#[derive(Debug, Error)]
pub enum Failure {
    /// A list fetch failed. The view shows an empty list.
    #[error("Failed to load {what}")]
    Load {
        what: &'static str,
        #[source]
        cause: Cause,
    },

    /// A create/update/delete failed. Local state is left untouched.
    #[error("Failed to {action} {what}")]
    Mutation {
        action: Mutation,
        what: &'static str,
        #[source]
        cause: Cause,
    },

    /// A required field was blank; the store was never called.
    #[error("{0}")]
    Invalid(String),
}

impl Failure {
    pub fn load(what: &'static str, cause: impl Into<Cause>) -> Self {
        Failure::Load {
            what,
            cause: cause.into(),
        }
    }

    pub fn mutation(action: Mutation, what: &'static str, cause: impl Into<Cause>) -> Self {
        Failure::Mutation {
            action,
            what,
            cause: cause.into(),
        }
    }

    /// Innermost cause message, used for the log line that accompanies the
    /// generic notification.
    pub fn root_cause(&self) -> String {
        let mut current: &dyn std::error::Error = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current.to_string()
    }
}

/// Problems loading the optional TOML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not determine a data directory for course-manager")]
    NoDataDir,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn load_failure_uses_generic_text() {
        let failure = Failure::load("course types", anyhow!("no such table: course_types"));
        assert_eq!(failure.to_string(), "Failed to load course types");
    }

    #[test]
    fn mutation_failure_names_action_and_entity() {
        let failure = Failure::mutation(
            Mutation::Delete,
            "course offering",
            anyhow!("FOREIGN KEY constraint failed"),
        );
        assert_eq!(failure.to_string(), "Failed to delete course offering");
    }

    #[test]
    fn root_cause_walks_the_whole_chain() {
        let cause = anyhow!("FOREIGN KEY constraint failed").context("failed to delete course");
        let failure = Failure::mutation(Mutation::Delete, "course", cause);
        assert_eq!(failure.root_cause(), "FOREIGN KEY constraint failed");
    }

    #[test]
    fn invalid_displays_its_message() {
        let failure = Failure::Invalid("Course name is required.".to_string());
        assert_eq!(failure.to_string(), "Course name is required.");
        assert_eq!(failure.root_cause(), "Course name is required.");
    }

    #[test]
    fn mutation_verbs() {
        assert_eq!(Mutation::Create.to_string(), "create");
        assert_eq!(Mutation::Update.past_tense(), "updated");
    }
}
