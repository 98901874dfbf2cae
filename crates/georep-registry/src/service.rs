use std::time::Duration;

use georep_config::{FeatureFlags, ReplicationConfig, flags};
use tracing::{error, info, instrument, warn};

use crate::client::RegistryClient;
use crate::error::DeleteError;
use crate::response::DeleteTagsResponse;
use crate::strategy::{DeleteStrategy, FastDelete, SlowDelete, Strategy};

/// Removes tags from one container repository at a time.
pub struct DeleteTagsService<C> {
    client:  C,
    flags:   FeatureFlags,
    timeout: Duration,
}

impl<C: RegistryClient> DeleteTagsService<C> {
    pub fn new(client: C, flags: FeatureFlags, timeout: Duration) -> Self {
        Self {
            client,
            flags,
            timeout,
        }
    }

    pub fn from_config(client: C, config: &ReplicationConfig) -> Self {
        Self::new(
            client,
            config.features.clone(),
            Duration::from_secs(config.registry.delete_tags_service_timeout_secs),
        )
    }

    pub fn client(&self) -> &C { &self.client }

    /// Fast deletion when it is enabled and the registry supports it,
    /// manifest substitution otherwise. The registry is only asked when fast
    /// deletion is enabled.
    pub async fn select_strategy(&self) -> Strategy {
        if !self.flags.enabled(flags::CONTAINER_REGISTRY_FAST_TAG_DELETE, true) {
            return Strategy::Slow(SlowDelete);
        }

        match self.client.supports_tag_delete().await {
            Ok(true) => Strategy::Fast(self.fast_delete()),
            Ok(false) => Strategy::Slow(SlowDelete),
            Err(err) => {
                warn!(error = %err, "registry capability check failed, using slow delete");
                Strategy::Slow(SlowDelete)
            }
        }
    }

    fn fast_delete(&self) -> FastDelete {
        if self
            .flags
            .enabled(flags::CONTAINER_REGISTRY_EXPIRATION_POLICIES_THROTTLING, false)
        {
            FastDelete::with_timeout(self.timeout)
        } else {
            FastDelete::new()
        }
    }

    #[instrument(skip(self, tags), fields(tags_count = tags.len()))]
    pub async fn execute(&self, repository_path: &str, tags: &[String]) -> DeleteTagsResponse {
        if tags.is_empty() {
            return DeleteTagsResponse::from(Err(DeleteError::NoTags));
        }

        let strategy = self.select_strategy().await;
        let result = strategy.delete(&self.client, repository_path, tags).await;

        match &result {
            Ok(deleted) => info!(?strategy, deleted = deleted.len(), "tags deleted"),
            Err(DeleteError::Timeout { tags_count }) => {
                error!(tags_count, timeout = ?self.timeout, "timeout while deleting tags")
            }
            Err(err) => warn!(?strategy, error = %err, "tag deletion failed"),
        }

        DeleteTagsResponse::from(result)
    }
}
