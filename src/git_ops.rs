use anyhow::{Context, Result};
use git2::{Repository, Signature, Time};
use std::path::{Path, PathBuf};

/// Git snapshots of the planner wiki
pub struct GitOps {
    repo: Option<Repository>,
}

impl GitOps {
    /// Create a new GitOps instance by detecting if the path is in a git repository
    pub fn new(path: &Path) -> Self {
        let dir = if path.is_file() {
            path.parent().unwrap_or(path).to_path_buf()
        } else {
            path.to_path_buf()
        };

        Self {
            repo: Repository::discover(&dir).ok(),
        }
    }

    /// Check if the wiki is under git version control
    pub fn is_git_managed(&self) -> bool {
        self.repo.is_some()
    }

    /// Commit the given files in one commit
    ///
    /// # Arguments
    /// * `paths` - Files to stage, absolute or relative to the working directory
    /// * `message` - Commit message
    pub fn commit(&self, paths: &[PathBuf], message: &str) -> Result<()> {
        let repo = match &self.repo {
            Some(r) => r,
            None => return Ok(()), // Not a git repo, skip
        };

        let workdir = repo
            .workdir()
            .context("Repository has no working directory")?;
        // Canonicalize so symlinked temp dirs still strip cleanly
        let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());

        let mut index = repo.index()?;
        for path in paths {
            let absolute = path.canonicalize().unwrap_or_else(|_| path.clone());
            let relative = absolute
                .strip_prefix(&workdir)
                .with_context(|| format!("{} is not in the repository", path.display()))?;
            index.add_path(relative)?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let parent_commit = match repo.head() {
            Ok(head) => {
                let oid = head.target().context("HEAD has no target")?;
                Some(repo.find_commit(oid)?)
            }
            Err(_) => None, // Initial commit
        };

        let signature = Self::get_signature(repo)?;
        let parents: Vec<_> = parent_commit.iter().collect();

        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        Ok(())
    }

    /// Get or create a git signature for commits
    fn get_signature(repo: &Repository) -> Result<Signature<'_>> {
        let config = repo.config()?;

        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| "Wiki Planner".to_string());

        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| "planner@localhost".to_string());

        match Signature::now(&name, &email) {
            Ok(sig) => Ok(sig),
            Err(_) => {
                // Fallback to a fixed time if now() fails (e.g., on some CI systems)
                let time = Time::new(1_700_000_000, 0);
                Signature::new(&name, &email, &time)
                    .context("Failed to create signature with fixed time")
            }
        }
    }

    /// Commit the files written by one invocation, if the wiki is tracked
    pub fn snapshot(&self, paths: &[PathBuf], message: &str) -> Result<()> {
        if !self.is_git_managed() || paths.is_empty() {
            return Ok(());
        }
        self.commit(paths, message)
            .context("Failed to commit planner snapshot")?;
        tracing::info!(files = paths.len(), message, "committed planner snapshot");
        Ok(())
    }
}
