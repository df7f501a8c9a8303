//! Operations on one project's working copy

use super::{GitInvocation, GitRunner};
use crate::error::GitCommandError;
use crate::types::Identity;
use std::path::{Path, PathBuf};

type GitResult<T> = std::result::Result<T, GitCommandError>;

/// A branch as seen through a remote (e.g. `origin/feature`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    /// Remote name
    pub remote: String,
    /// Branch name on the remote
    pub branch: String,
}

impl RemoteRef {
    /// Create a new remote ref
    pub fn new(remote: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            branch: branch.into(),
        }
    }

    /// Fully qualified ref name (`refs/remotes/<remote>/<branch>`)
    pub fn full_name(&self) -> String {
        format!("refs/remotes/{}/{}", self.remote, self.branch)
    }
}

impl std::fmt::Display for RemoteRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.remote, self.branch)
    }
}

/// A project's local clone
pub struct ProjectRepo<'a> {
    git: &'a dyn GitRunner,
    root: PathBuf,
    remote: String,
}

impl<'a> ProjectRepo<'a> {
    /// Wrap the working copy at `root`
    pub fn new(git: &'a dyn GitRunner, root: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            git,
            root: root.into(),
            remote: remote.into(),
        }
    }

    /// Working copy path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remote-tracking ref for a branch on this repo's remote
    pub fn remote_ref(&self, branch: &str) -> RemoteRef {
        RemoteRef::new(&self.remote, branch)
    }

    async fn run<I, S>(&self, args: I) -> GitResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.git.run(GitInvocation::new(&self.root, args)).await
    }

    /// Check if the working copy has been cloned
    pub fn is_cloned(&self) -> bool {
        self.root.join(".git").exists()
    }

    /// Clone `url` into the working copy path
    ///
    /// The parent directory must exist.
    pub async fn clone_from(&self, url: &str) -> GitResult<()> {
        let parent = self.root.parent().unwrap_or_else(|| Path::new("."));
        let target = self.root.to_string_lossy().into_owned();
        let invocation = GitInvocation::new(
            parent,
            [
                "clone".to_string(),
                "--origin".to_string(),
                self.remote.clone(),
                "--".to_string(),
                url.to_string(),
                target,
            ],
        );
        self.git.run(invocation).await?;
        Ok(())
    }

    /// Fetch every ref from the remote, pruning deleted branches
    pub async fn fetch(&self) -> GitResult<()> {
        self.run(["fetch", "--prune", self.remote.as_str()]).await?;
        Ok(())
    }

    /// Point the local `branch` at the remote tip and check it out
    pub async fn checkout_from_remote(&self, branch: &str) -> GitResult<()> {
        let start = self.remote_ref(branch).to_string();
        self.run(["checkout", "-B", branch, start.as_str()]).await?;
        Ok(())
    }

    /// Resolve a revision to a commit id
    pub async fn resolve(&self, rev: &str) -> GitResult<String> {
        let spec = format!("{rev}^{{commit}}");
        self.run(["rev-parse", "--verify", "--quiet", spec.as_str()])
            .await
    }

    /// Check if a ref exists
    pub async fn ref_exists(&self, name: &str) -> bool {
        self.resolve(name).await.is_ok()
    }

    /// Author of the most recent commit on `rev`
    pub async fn last_commit_author(&self, rev: &str) -> GitResult<Identity> {
        let output = self.run(["log", "-1", "--format=%an%n%ae", rev]).await?;
        let mut lines = output.lines();
        let name = lines.next().unwrap_or_default().trim().to_string();
        let email = lines.next().unwrap_or_default().trim().to_string();
        Ok(Identity { name, email })
    }

    /// Merge `rev` into the current branch without committing
    ///
    /// Always a true merge (`--no-ff`) so the commit can be authored and signed.
    pub async fn merge_no_commit(&self, rev: &str, committer: &Identity) -> GitResult<()> {
        let args = identity_args(committer)
            .into_iter()
            .chain(["merge", "--no-ff", "--no-commit", rev].map(String::from));
        self.run(args).await?;
        Ok(())
    }

    /// Check if a merge is waiting to be committed
    pub async fn merge_in_progress(&self) -> bool {
        self.run(["rev-parse", "--verify", "--quiet", "MERGE_HEAD"])
            .await
            .is_ok()
    }

    /// Abandon an uncommitted merge, restoring the pre-merge state
    pub async fn abort_merge(&self) -> GitResult<()> {
        self.run(["merge", "--abort"]).await?;
        Ok(())
    }

    /// Throw away uncommitted state, including a half-finished merge
    pub async fn reset_hard(&self) -> GitResult<()> {
        self.run(["reset", "--hard", "--quiet"]).await?;
        Ok(())
    }

    /// Commit the pending merge
    ///
    /// With a signing key the commit is signed or not created at all.
    /// Repository hooks run as usual.
    pub async fn commit_merge(
        &self,
        message: &str,
        author: &Identity,
        committer: &Identity,
        signing_key: Option<&str>,
    ) -> GitResult<()> {
        let sign = signing_key.map_or_else(|| "--no-gpg-sign".to_string(), |key| format!("--gpg-sign={key}"));
        let args: Vec<String> = identity_args(committer)
            .into_iter()
            .chain(["commit", "-m", message].map(String::from))
            .chain([sign])
            .collect();
        let invocation = GitInvocation::new(&self.root, args)
            .env("GIT_AUTHOR_NAME", &author.name)
            .env("GIT_AUTHOR_EMAIL", &author.email)
            .env("GIT_COMMITTER_NAME", &committer.name)
            .env("GIT_COMMITTER_EMAIL", &committer.email);
        self.git.run(invocation).await?;
        Ok(())
    }

    /// Commit id of `HEAD`
    pub async fn head(&self) -> GitResult<String> {
        self.run(["rev-parse", "HEAD"]).await
    }

    /// Push a local branch to the same name on the remote
    pub async fn push(&self, branch: &str) -> GitResult<()> {
        self.run(["push", self.remote.as_str(), branch]).await?;
        Ok(())
    }

    /// Delete a branch on the remote
    pub async fn delete_remote_branch(&self, branch: &str) -> GitResult<()> {
        self.run(["push", self.remote.as_str(), "--delete", branch])
            .await?;
        Ok(())
    }

    /// Check if a local branch exists
    pub async fn local_branch_exists(&self, branch: &str) -> bool {
        self.ref_exists(&format!("refs/heads/{branch}")).await
    }

    /// Force-delete a local branch
    pub async fn delete_local_branch(&self, branch: &str) -> GitResult<()> {
        self.run(["branch", "-D", branch]).await?;
        Ok(())
    }
}

fn identity_args(identity: &Identity) -> Vec<String> {
    vec![
        "-c".to_string(),
        format!("user.name={}", identity.name),
        "-c".to_string(),
        format!("user.email={}", identity.email),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_ref_names() {
        let r = RemoteRef::new("origin", "feature/x");
        assert_eq!(r.to_string(), "origin/feature/x");
        assert_eq!(r.full_name(), "refs/remotes/origin/feature/x");
    }

    #[test]
    fn test_identity_args() {
        let args = identity_args(&Identity::new("Merge Bot", "bot@example.com"));
        assert_eq!(
            args,
            vec!["-c", "user.name=Merge Bot", "-c", "user.email=bot@example.com"]
        );
    }
}
