#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use docdag::links::{LinkRecord, LinkSet};
use docdag::reactor::ModuleAction;

/// Shared log of module fire order, pushed to by recording actions.
pub type FireLog = Arc<Mutex<Vec<String>>>;

pub fn fire_log() -> FireLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn link(url: &str, location: &str) -> LinkRecord {
    LinkRecord::new(url, location)
}

/// An action that records its firing and passes the inherited links
/// through unchanged.
pub fn recording_action(log: &FireLog, name: &str) -> ModuleAction {
    recording_action_with_links(log, name, Vec::new())
}

/// An action that records its firing and contributes its own records ahead
/// of the inherited ones.
pub fn recording_action_with_links(
    log: &FireLog,
    name: &str,
    records: Vec<LinkRecord>,
) -> ModuleAction {
    let log = Arc::clone(log);
    let name = name.to_string();
    Box::new(move |inherited: LinkSet| {
        log.lock().unwrap().push(name);
        let mut links: LinkSet = records.into_iter().collect();
        links.merge(inherited);
        Ok(links)
    })
}

/// An action that records its firing and then fails.
pub fn failing_action(log: &FireLog, name: &str, message: &str) -> ModuleAction {
    let log = Arc::clone(log);
    let name = name.to_string();
    let message = message.to_string();
    Box::new(move |_inherited: LinkSet| {
        log.lock().unwrap().push(name);
        Err(anyhow::anyhow!(message))
    })
}

/// Builder for manifest (pom) text used in discovery and metadata tests.
pub struct PomBuilder {
    group_id: String,
    artifact_id: String,
    version: String,
    packaging: Option<String>,
    url: Option<String>,
    parent: Option<(String, String, String)>,
    modules: Vec<String>,
    dependencies: Vec<(String, String, Option<String>)>,
}

impl PomBuilder {
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            packaging: None,
            url: None,
            parent: None,
            modules: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn packaging(mut self, packaging: &str) -> Self {
        self.packaging = Some(packaging.to_string());
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn parent(mut self, group_id: &str, artifact_id: &str, version: &str) -> Self {
        self.parent = Some((
            group_id.to_string(),
            artifact_id.to_string(),
            version.to_string(),
        ));
        self
    }

    pub fn module(mut self, module: &str) -> Self {
        self.modules.push(module.to_string());
        self
    }

    pub fn dependency(mut self, group_id: &str, artifact_id: &str, version: &str) -> Self {
        self.dependencies.push((
            group_id.to_string(),
            artifact_id.to_string(),
            Some(version.to_string()),
        ));
        self
    }

    pub fn dependency_unversioned(mut self, group_id: &str, artifact_id: &str) -> Self {
        self.dependencies
            .push((group_id.to_string(), artifact_id.to_string(), None));
        self
    }

    pub fn build(self) -> String {
        let mut out = String::from("<project>\n");
        if let Some((g, a, v)) = &self.parent {
            out.push_str(&format!(
                "  <parent>\n    <groupId>{g}</groupId>\n    <artifactId>{a}</artifactId>\n    <version>{v}</version>\n  </parent>\n"
            ));
        }
        out.push_str(&format!("  <groupId>{}</groupId>\n", self.group_id));
        out.push_str(&format!("  <artifactId>{}</artifactId>\n", self.artifact_id));
        out.push_str(&format!("  <version>{}</version>\n", self.version));
        if let Some(packaging) = &self.packaging {
            out.push_str(&format!("  <packaging>{packaging}</packaging>\n"));
        }
        if let Some(url) = &self.url {
            out.push_str(&format!("  <url>{url}</url>\n"));
        }
        if !self.modules.is_empty() {
            out.push_str("  <modules>\n");
            for module in &self.modules {
                out.push_str(&format!("    <module>{module}</module>\n"));
            }
            out.push_str("  </modules>\n");
        }
        if !self.dependencies.is_empty() {
            out.push_str("  <dependencies>\n");
            for (g, a, v) in &self.dependencies {
                out.push_str("    <dependency>\n");
                out.push_str(&format!("      <groupId>{g}</groupId>\n"));
                out.push_str(&format!("      <artifactId>{a}</artifactId>\n"));
                if let Some(v) = v {
                    out.push_str(&format!("      <version>{v}</version>\n"));
                }
                out.push_str("    </dependency>\n");
            }
            out.push_str("  </dependencies>\n");
        }
        out.push_str("</project>\n");
        out
    }
}
