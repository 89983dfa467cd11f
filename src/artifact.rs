// src/artifact.rs

//! Value-equality identity of a resolved dependency artifact.

use std::fmt;
use std::path::PathBuf;

/// Structural artifact key: two identities are equal iff all three fields
/// are equal. Hashable by value, so it can key the link cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ArtifactId {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// The `group:artifact` pair used to match url overrides.
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Directory of this artifact inside a Maven-layout repository,
    /// relative to the repository root.
    pub fn repo_dir(&self) -> PathBuf {
        let mut dir = PathBuf::new();
        for part in self.group_id.split('.') {
            dir.push(part);
        }
        dir.push(&self.artifact_id);
        dir.push(&self.version);
        dir
    }

    /// Path of this artifact's pom inside a Maven-layout repository.
    pub fn pom_path(&self) -> PathBuf {
        self.repo_dir()
            .join(format!("{}-{}.pom", self.artifact_id, self.version))
    }

    /// Path of this artifact's javadoc jar inside a Maven-layout repository.
    pub fn javadoc_jar_path(&self) -> PathBuf {
        self.repo_dir()
            .join(format!("{}-{}-javadoc.jar", self.artifact_id, self.version))
    }

    /// Conventional javadoc.io URL for this artifact, with any `-SNAPSHOT`
    /// suffix stripped from the version.
    pub fn javadoc_io_url(&self) -> String {
        format!(
            "https://www.javadoc.io/doc/{}/{}/{}",
            self.group_id,
            self.artifact_id,
            self.version.trim_end_matches("-SNAPSHOT")
        )
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
