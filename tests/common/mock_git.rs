//! Mock git runner for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use merge_bot::error::GitCommandError;
use merge_bot::git::{GitInvocation, GitRunner};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// Commit id returned for `rev-parse HEAD`
pub const HEAD_SHA: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Commit id returned when resolving other revisions
pub const SOURCE_SHA: &str = "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391";

/// Recording git runner
///
/// This manually implements `GitRunner` rather than using mockall, so the
/// merge state (`MERGE_HEAD`) can be simulated across calls.
///
/// Features:
/// - Call tracking for verification
/// - Canned output for `rev-parse` and `log`
/// - Error injection by argument prefix (leading `-c` pairs ignored)
/// - Optional per-call delay with overlap tracking
pub struct MockGit {
    calls: Mutex<Vec<GitInvocation>>,
    failures: Mutex<Vec<(Vec<String>, GitCommandError)>>,
    author: Mutex<(String, String)>,
    merge_pending: AtomicBool,
    merge_is_noop: AtomicBool,
    delay: Mutex<Option<Duration>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl Default for MockGit {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGit {
    /// Create a mock where every command succeeds
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
            author: Mutex::new(("Alice Author".to_string(), "alice@example.com".to_string())),
            merge_pending: AtomicBool::new(false),
            merge_is_noop: AtomicBool::new(false),
            delay: Mutex::new(None),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    // === Configuration ===

    /// Make commands whose arguments start with `prefix` fail
    pub fn fail_on(&self, prefix: &[&str], output: &str) {
        self.failures.lock().unwrap().push((
            prefix.iter().map(ToString::to_string).collect(),
            GitCommandError {
                command: prefix.join(" "),
                code: Some(1),
                output: output.to_string(),
            },
        ));
    }

    /// Set the author reported for the source branch
    pub fn set_author(&self, name: &str, email: &str) {
        *self.author.lock().unwrap() = (name.to_string(), email.to_string());
    }

    /// Make `merge` succeed without leaving a merge to commit
    pub fn merge_as_noop(&self) {
        self.merge_is_noop.store(true, Ordering::SeqCst);
    }

    /// Start with a merge left over from an interrupted run
    pub fn leave_merge_pending(&self) {
        self.merge_pending.store(true, Ordering::SeqCst);
    }

    /// Sleep this long inside every call
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    // === Inspection ===

    /// Every invocation, in order
    pub fn calls(&self) -> Vec<GitInvocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Every invocation as a command line without `-c` pairs
    pub fn commands(&self) -> Vec<String> {
        self.calls().iter().map(|c| stripped(c).join(" ")).collect()
    }

    /// Check if any command started with `prefix`
    pub fn called(&self, prefix: &[&str]) -> bool {
        self.find(prefix).is_some()
    }

    /// First invocation starting with `prefix`
    pub fn find(&self, prefix: &[&str]) -> Option<GitInvocation> {
        self.calls()
            .into_iter()
            .find(|c| starts_with(&stripped(c), prefix))
    }

    /// Position of the first invocation starting with `prefix`
    pub fn position(&self, prefix: &[&str]) -> Option<usize> {
        self.calls()
            .iter()
            .position(|c| starts_with(&stripped(c), prefix))
    }

    /// Highest number of calls that were in flight at once
    pub fn max_concurrent(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    fn injected_failure(&self, args: &[String]) -> Option<GitCommandError> {
        self.failures
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| {
                starts_with(args, &prefix.iter().map(String::as_str).collect::<Vec<_>>())
            })
            .map(|(_, err)| err.clone())
    }

    fn respond(&self, args: &[String]) -> Result<String, GitCommandError> {
        let failure = self.injected_failure(args);
        let sub = args.first().map_or("", String::as_str);

        match sub {
            "merge" if args.get(1).map(String::as_str) == Some("--abort") => {
                if let Some(err) = failure {
                    return Err(err);
                }
                self.merge_pending.store(false, Ordering::SeqCst);
                Ok(String::new())
            }
            "merge" => {
                if let Some(err) = failure {
                    // a conflicted merge leaves MERGE_HEAD behind
                    self.merge_pending.store(true, Ordering::SeqCst);
                    return Err(err);
                }
                let pending = !self.merge_is_noop.load(Ordering::SeqCst);
                self.merge_pending.store(pending, Ordering::SeqCst);
                Ok(String::new())
            }
            "reset" => {
                if let Some(err) = failure {
                    return Err(err);
                }
                self.merge_pending.store(false, Ordering::SeqCst);
                Ok(String::new())
            }
            "commit" => {
                if let Some(err) = failure {
                    return Err(err);
                }
                self.merge_pending.store(false, Ordering::SeqCst);
                Ok(String::new())
            }
            "rev-parse" if args.iter().any(|a| a == "MERGE_HEAD") => {
                if self.merge_pending.load(Ordering::SeqCst) {
                    Ok(SOURCE_SHA.to_string())
                } else {
                    Err(GitCommandError {
                        command: args.join(" "),
                        code: Some(1),
                        output: String::new(),
                    })
                }
            }
            _ => {
                if let Some(err) = failure {
                    return Err(err);
                }
                Ok(match sub {
                    "rev-parse" if args.last().map(String::as_str) == Some("HEAD") => {
                        HEAD_SHA.to_string()
                    }
                    "rev-parse" => SOURCE_SHA.to_string(),
                    "log" => {
                        let (name, email) = self.author.lock().unwrap().clone();
                        format!("{name}\n{email}")
                    }
                    _ => String::new(),
                })
            }
        }
    }
}

#[async_trait]
impl GitRunner for MockGit {
    async fn run(&self, invocation: GitInvocation) -> Result<String, GitCommandError> {
        let args = stripped(&invocation);
        self.calls.lock().unwrap().push(invocation);

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.respond(&args);
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Arguments with leading `-c key=value` pairs removed
pub fn stripped(invocation: &GitInvocation) -> Vec<String> {
    let mut args = invocation.args.as_slice();
    while args.first().map(String::as_str) == Some("-c") && args.len() >= 2 {
        args = &args[2..];
    }
    args.to_vec()
}

fn starts_with(args: &[String], prefix: &[&str]) -> bool {
    args.len() >= prefix.len() && args.iter().zip(prefix).all(|(a, p)| a == p)
}
