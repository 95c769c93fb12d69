use std::sync::Arc;

use crate::store::Store;
use crate::types::{AccessMode, AccessModeOptions};

/// AccessOracle answers whether a user holds at least a given access level on
/// a repository. Owner and visibility are supplied by the caller.
pub trait AccessOracle: Send + Sync {
    fn access_mode(&self, user_id: i64, repo_id: i64, opts: AccessModeOptions) -> AccessMode;

    fn authorize(
        &self,
        user_id: i64,
        repo_id: i64,
        desired: AccessMode,
        opts: AccessModeOptions,
    ) -> bool {
        self.access_mode(user_id, repo_id, opts) >= desired
    }
}

/// Access oracle backed by the `access` grant table.
pub struct PermsStore {
    store: Arc<dyn Store>,
}

impl PermsStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl AccessOracle for PermsStore {
    fn access_mode(&self, user_id: i64, repo_id: i64, opts: AccessModeOptions) -> AccessMode {
        // Everyone has read access to a public repository.
        let baseline = if opts.private {
            AccessMode::None
        } else {
            AccessMode::Read
        };

        // Anonymous users get the baseline.
        if user_id <= 0 {
            return baseline;
        }

        if user_id == opts.owner_id {
            return AccessMode::Owner;
        }

        match self.store.get_access(user_id, repo_id) {
            Ok(Some(mode)) => mode.max(baseline),
            Ok(None) => baseline,
            Err(e) => {
                tracing::error!(user_id, repo_id, "Failed to get access mode: {e}");
                baseline
            }
        }
    }
}
