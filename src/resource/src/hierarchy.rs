//! Scope hierarchy index
//!
//! Maintains the domain and project trees and answers the
//! ancestor/descendant/enabled queries the resolution engine depends on.
//!
//! All mutation happens under a single coarse write lock, which serializes
//! hierarchy edits so a concurrent read never observes a half-updated tree.
//! Read queries take the shared lock only for the duration of the walk.
//!
//! Unknown ids degrade to empty results (`ancestors`/`descendants`) or
//! `false` (`is_*_enabled`) rather than raising, so dangling references left
//! behind by a non-cascading assignment store never break a read path.

use crate::error::{ResourceError, Result};
use crate::types::{Domain, DomainId, Project, ProjectId};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

#[derive(Default)]
struct IndexInner {
    domains: HashMap<DomainId, Domain>,
    projects: HashMap<ProjectId, Project>,
    /// Child links, maintained on creation and never re-parented
    children: HashMap<ProjectId, HashSet<ProjectId>>,
}

/// In-memory scope hierarchy index
#[derive(Default)]
pub struct ResourceIndex {
    inner: RwLock<IndexInner>,
}

impl ResourceIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Domains
    // ------------------------------------------------------------------

    /// Register a new domain
    pub fn create_domain(&self, domain: Domain) -> Result<()> {
        if domain.id.is_empty() {
            return Err(ResourceError::Validation("empty domain id".to_string()));
        }
        let mut inner = self.inner.write();
        if inner.domains.contains_key(&domain.id) {
            return Err(ResourceError::Conflict(format!(
                "domain {} already exists",
                domain.id
            )));
        }
        debug!(domain_id = %domain.id, "domain created");
        inner.domains.insert(domain.id.clone(), domain);
        Ok(())
    }

    /// Look up a domain by id
    pub fn get_domain(&self, id: &str) -> Option<Domain> {
        self.inner.read().domains.get(id).cloned()
    }

    /// Whether a domain with this id exists
    pub fn has_domain(&self, id: &str) -> bool {
        self.inner.read().domains.contains_key(id)
    }

    /// Flip a domain's enabled flag
    pub fn set_domain_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        let mut inner = self.inner.write();
        let domain = inner
            .domains
            .get_mut(id)
            .ok_or_else(|| ResourceError::NotFound(format!("domain {}", id)))?;
        domain.enabled = enabled;
        debug!(domain_id = %id, enabled, "domain enabled flag changed");
        Ok(())
    }

    /// Delete a domain and its whole project tree
    ///
    /// The domain must be disabled first. Returns the ids of the projects
    /// that were removed so callers can purge dependent records.
    pub fn delete_domain(&self, id: &str) -> Result<Vec<ProjectId>> {
        let mut inner = self.inner.write();
        let domain = inner
            .domains
            .get(id)
            .ok_or_else(|| ResourceError::NotFound(format!("domain {}", id)))?;
        if domain.enabled {
            return Err(ResourceError::ForbiddenAction(format!(
                "cannot delete enabled domain {}",
                id
            )));
        }
        let removed: Vec<ProjectId> = inner
            .projects
            .values()
            .filter(|p| p.domain_id == id)
            .map(|p| p.id.clone())
            .collect();
        for pid in &removed {
            inner.projects.remove(pid);
            inner.children.remove(pid);
        }
        inner.domains.remove(id);
        debug!(domain_id = %id, projects = removed.len(), "domain deleted");
        Ok(removed)
    }

    /// List all registered domains
    pub fn list_domains(&self) -> Vec<Domain> {
        self.inner.read().domains.values().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------

    /// Register a new project
    ///
    /// The owning domain must exist. A parent, if given, must exist and
    /// belong to the same domain; a domain may have only one parentless
    /// (root) project.
    pub fn create_project(&self, project: Project) -> Result<()> {
        if project.id.is_empty() {
            return Err(ResourceError::Validation("empty project id".to_string()));
        }
        let mut inner = self.inner.write();
        if !inner.domains.contains_key(&project.domain_id) {
            return Err(ResourceError::NotFound(format!(
                "domain {}",
                project.domain_id
            )));
        }
        if inner.projects.contains_key(&project.id) {
            return Err(ResourceError::Conflict(format!(
                "project {} already exists",
                project.id
            )));
        }
        match &project.parent_id {
            Some(parent_id) => {
                let parent = inner
                    .projects
                    .get(parent_id)
                    .ok_or_else(|| ResourceError::NotFound(format!("project {}", parent_id)))?;
                if parent.domain_id != project.domain_id {
                    return Err(ResourceError::Validation(format!(
                        "parent {} belongs to domain {}, not {}",
                        parent_id, parent.domain_id, project.domain_id
                    )));
                }
            }
            None => {
                let has_root = inner
                    .projects
                    .values()
                    .any(|p| p.domain_id == project.domain_id && p.parent_id.is_none());
                if has_root {
                    return Err(ResourceError::Validation(format!(
                        "domain {} already has a root project",
                        project.domain_id
                    )));
                }
            }
        }
        if let Some(parent_id) = &project.parent_id {
            inner
                .children
                .entry(parent_id.clone())
                .or_default()
                .insert(project.id.clone());
        }
        debug!(project_id = %project.id, domain_id = %project.domain_id, "project created");
        inner.projects.insert(project.id.clone(), project);
        Ok(())
    }

    /// Look up a project by id
    pub fn get_project(&self, id: &str) -> Option<Project> {
        self.inner.read().projects.get(id).cloned()
    }

    /// Whether a project with this id exists
    pub fn has_project(&self, id: &str) -> bool {
        self.inner.read().projects.contains_key(id)
    }

    /// Flip a project's enabled flag
    pub fn set_project_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        let mut inner = self.inner.write();
        let project = inner
            .projects
            .get_mut(id)
            .ok_or_else(|| ResourceError::NotFound(format!("project {}", id)))?;
        project.enabled = enabled;
        debug!(project_id = %id, enabled, "project enabled flag changed");
        Ok(())
    }

    /// Delete a leaf project
    ///
    /// Fails with `ProjectNotEmpty` if the project still has children.
    pub fn delete_project(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let project = inner
            .projects
            .get(id)
            .ok_or_else(|| ResourceError::NotFound(format!("project {}", id)))?;
        if inner.children.get(id).is_some_and(|c| !c.is_empty()) {
            return Err(ResourceError::ProjectNotEmpty(id.to_string()));
        }
        let parent_id = project.parent_id.clone();
        inner.projects.remove(id);
        inner.children.remove(id);
        if let Some(parent_id) = parent_id {
            if let Some(siblings) = inner.children.get_mut(&parent_id) {
                siblings.remove(id);
            }
        }
        debug!(project_id = %id, "project deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Walks
    // ------------------------------------------------------------------

    /// Ancestors of a project, ordered root first, immediate parent last
    ///
    /// Unknown ids yield an empty sequence.
    pub fn ancestors(&self, id: &str) -> Vec<ProjectId> {
        let inner = self.inner.read();
        let mut chain = Vec::new();
        let mut current = inner.projects.get(id).and_then(|p| p.parent_id.clone());
        while let Some(pid) = current {
            current = inner.projects.get(&pid).and_then(|p| p.parent_id.clone());
            chain.push(pid);
        }
        chain.reverse();
        chain
    }

    /// All proper descendants of a project, at any depth, unordered
    ///
    /// Unknown ids yield an empty set.
    pub fn descendants(&self, id: &str) -> HashSet<ProjectId> {
        let inner = self.inner.read();
        let mut found = HashSet::new();
        let mut queue: VecDeque<ProjectId> = VecDeque::new();
        queue.push_back(id.to_string());
        while let Some(pid) = queue.pop_front() {
            if let Some(children) = inner.children.get(&pid) {
                for child in children {
                    if found.insert(child.clone()) {
                        queue.push_back(child.clone());
                    }
                }
            }
        }
        found
    }

    /// Every project belonging to a domain, at any depth
    pub fn projects_in_domain(&self, domain_id: &str) -> Vec<ProjectId> {
        self.inner
            .read()
            .projects
            .values()
            .filter(|p| p.domain_id == domain_id)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Whether a project and its whole enabled chain are usable
    ///
    /// Checks the project itself, every ancestor, and the owning domain.
    /// Unknown ids are reported as not enabled, never as an error.
    pub fn is_project_enabled(&self, id: &str) -> bool {
        let inner = self.inner.read();
        let Some(project) = inner.projects.get(id) else {
            return false;
        };
        if !project.enabled {
            return false;
        }
        let mut current = project.parent_id.clone();
        while let Some(pid) = current {
            let Some(ancestor) = inner.projects.get(&pid) else {
                return false;
            };
            if !ancestor.enabled {
                return false;
            }
            current = ancestor.parent_id.clone();
        }
        inner
            .domains
            .get(&project.domain_id)
            .is_some_and(|d| d.enabled)
    }

    /// Whether a domain exists and is enabled
    pub fn is_domain_enabled(&self, id: &str) -> bool {
        self.inner.read().domains.get(id).is_some_and(|d| d.enabled)
    }
}
