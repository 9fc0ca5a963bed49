//! Credential Rotator - round-robin distribution over completion-service
//! credentials.
//!
//! The external service rate-limits per credential, so calls are spread
//! across every successfully initialized credential in strict round-robin
//! order: call i receives handle i mod N. The cursor is a single atomic
//! counter; `fetch_add` makes read-then-advance one step, so concurrent
//! callers can neither observe the same slot twice nor skip one.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::ports::AiProvider;

/// Round-robin pool of completion-service credentials.
pub struct CredentialRotator {
    /// Successfully initialized providers, one per credential.
    providers: Vec<Arc<dyn AiProvider>>,
    /// Next slot to issue. Only ever advanced with `fetch_add`.
    cursor: AtomicUsize,
    /// Credentials that failed initialization and were excluded.
    failed: usize,
}

impl CredentialRotator {
    /// Builds a rotator from already-initialized providers.
    pub fn new(providers: Vec<Arc<dyn AiProvider>>) -> Self {
        Self {
            providers,
            cursor: AtomicUsize::new(0),
            failed: 0,
        }
    }

    /// Builds a rotator from initialization results, excluding failures.
    ///
    /// An empty active pool is allowed; callers degrade to deterministic
    /// heuristics when `next()` returns `None`.
    pub fn from_results<E: std::fmt::Display>(
        results: Vec<Result<Arc<dyn AiProvider>, E>>,
    ) -> Self {
        let mut providers = Vec::with_capacity(results.len());
        let mut failed = 0;
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(provider) => providers.push(provider),
                Err(err) => {
                    failed += 1;
                    tracing::error!(credential = index, %err, "credential failed initialization");
                }
            }
        }
        if providers.is_empty() {
            tracing::error!("no completion-service credentials available; falling back to heuristics");
        } else {
            tracing::info!(active = providers.len(), failed, "credential rotator initialized");
        }
        Self {
            providers,
            cursor: AtomicUsize::new(0),
            failed,
        }
    }

    /// Issues the next credential's provider, or `None` when the pool is
    /// empty. Never blocks.
    pub fn next(&self) -> Option<Arc<dyn AiProvider>> {
        if self.providers.is_empty() {
            return None;
        }
        let slot = self.cursor.fetch_add(1, Ordering::Relaxed) % self.providers.len();
        Some(Arc::clone(&self.providers[slot]))
    }

    /// Issues a provider, retrying up to `max_attempts` slots.
    ///
    /// With the current pool this returns on the first attempt whenever the
    /// pool is non-empty; the loop exists so a per-handle health check can
    /// be added without changing callers.
    pub fn next_with_retry(&self, max_attempts: Option<usize>) -> Option<Arc<dyn AiProvider>> {
        let attempts = max_attempts
            .unwrap_or(self.providers.len())
            .min(self.providers.len());
        for _ in 0..attempts {
            if let Some(provider) = self.next() {
                return Some(provider);
            }
        }
        None
    }

    /// Number of active (successfully initialized) credentials.
    pub fn active(&self) -> usize {
        self.providers.len()
    }

    /// Number of credentials excluded at initialization.
    pub fn failed(&self) -> usize {
        self.failed
    }
}

impl std::fmt::Debug for CredentialRotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRotator")
            .field("active", &self.providers.len())
            .field("failed", &self.failed)
            .field("cursor", &self.cursor.load(Ordering::Relaxed))
            .finish()
    }
}
