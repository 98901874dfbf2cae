use std::sync::Mutex;
use std::time::Duration;

use georep_config::{FeatureFlags, ReplicationConfig, flags};
use georep_registry::{
    DeleteStrategy, DeleteTagsResponse, DeleteTagsService, FastDelete, RegistryClient, SlowDelete, Strategy,
};

const REPO: &str = "group/project/app";

#[derive(Debug, thiserror::Error)]
#[error("registry unavailable")]
struct RegistryDown;

#[derive(Debug, Clone, PartialEq, Eq)]
struct EmptyManifest;

/// In-memory registry recording every call made against it.
struct MockRegistry {
    supports_tag_delete: Result<bool, ()>,
    manifest:            bool,
    /// Tags the registry refuses for both delete-by-name and put.
    refused:             Vec<&'static str>,
    /// Tags whose requests fail outright.
    unreachable:         Vec<&'static str>,
    digest_delete_ok:    bool,
    delay:               Option<Duration>,
    calls:               Mutex<Vec<String>>,
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self {
            supports_tag_delete: Ok(true),
            manifest:            true,
            refused:             Vec::new(),
            unreachable:         Vec::new(),
            digest_delete_ok:    true,
            delay:               None,
            calls:               Mutex::new(Vec::new()),
        }
    }
}

impl MockRegistry {
    fn record(&self, call: String) { self.calls.lock().unwrap().push(call); }

    fn calls(&self) -> Vec<String> { self.calls.lock().unwrap().clone() }

    fn answer(&self, tag: &str) -> Result<bool, RegistryDown> {
        if self.unreachable.contains(&tag) {
            return Err(RegistryDown);
        }
        Ok(!self.refused.contains(&tag))
    }
}

impl RegistryClient for MockRegistry {
    type Error = RegistryDown;
    type Manifest = EmptyManifest;

    async fn supports_tag_delete(&self) -> Result<bool, RegistryDown> {
        self.record("supports_tag_delete".into());
        self.supports_tag_delete.map_err(|_| RegistryDown)
    }

    async fn delete_tag_by_name(&self, path: &str, tag: &str) -> Result<bool, RegistryDown> {
        assert_eq!(path, REPO);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.record(format!("delete_by_name {tag}"));
        self.answer(tag)
    }

    async fn generate_empty_manifest(&self, path: &str) -> Result<Option<EmptyManifest>, RegistryDown> {
        assert_eq!(path, REPO);
        self.record("generate_manifest".into());
        Ok(self.manifest.then_some(EmptyManifest))
    }

    async fn put_tag(&self, path: &str, tag: &str, manifest: &EmptyManifest) -> Result<Option<String>, RegistryDown> {
        assert_eq!(path, REPO);
        assert_eq!(manifest, &EmptyManifest);
        self.record(format!("put {tag}"));
        Ok(self.answer(tag)?.then(|| "sha256:empty".to_string()))
    }

    async fn delete_tag_by_digest(&self, path: &str, digest: &str) -> Result<bool, RegistryDown> {
        assert_eq!(path, REPO);
        self.record(format!("delete_by_digest {digest}"));
        Ok(self.digest_delete_ok)
    }
}

fn tags(names: &[&str]) -> Vec<String> { names.iter().map(|s| s.to_string()).collect() }

fn service(registry: MockRegistry, flags: FeatureFlags) -> DeleteTagsService<MockRegistry> {
    DeleteTagsService::new(registry, flags, Duration::from_secs(250))
}

#[tokio::test]
async fn test_empty_tag_list() {
    let service = service(MockRegistry::default(), FeatureFlags::new());

    let response = service.execute(REPO, &[]).await;

    assert_eq!(response, DeleteTagsResponse::error("not tags specified"));
    assert!(service.client().calls().is_empty());
}

#[tokio::test]
async fn test_fast_delete_when_supported() {
    let service = service(MockRegistry::default(), FeatureFlags::new());

    let response = service.execute(REPO, &tags(&["v1", "v2"])).await;

    assert_eq!(response, DeleteTagsResponse::success(tags(&["v1", "v2"])));
    assert_eq!(
        service.client().calls(),
        vec!["supports_tag_delete", "delete_by_name v1", "delete_by_name v2"]
    );
}

#[tokio::test]
async fn test_fast_delete_reports_only_deleted_tags() {
    let registry = MockRegistry {
        refused: vec!["v2"],
        unreachable: vec!["v3"],
        ..Default::default()
    };
    let service = service(registry, FeatureFlags::new());

    let response = service.execute(REPO, &tags(&["v1", "v2", "v3"])).await;

    assert_eq!(response.deleted(), tags(&["v1"]).as_slice());
}

#[tokio::test]
async fn test_fast_delete_nothing_deleted() {
    let registry = MockRegistry {
        refused: vec!["v1"],
        ..Default::default()
    };
    let service = service(registry, FeatureFlags::new());

    let response = service.execute(REPO, &tags(&["v1"])).await;

    assert_eq!(response.message(), Some("could not delete tags"));
}

#[tokio::test]
async fn test_slow_delete_when_unsupported() {
    let registry = MockRegistry {
        supports_tag_delete: Ok(false),
        ..Default::default()
    };
    let service = service(registry, FeatureFlags::new());

    let response = service.execute(REPO, &tags(&["a", "b"])).await;

    assert_eq!(response, DeleteTagsResponse::success(tags(&["a", "b"])));
    assert_eq!(
        service.client().calls(),
        vec![
            "supports_tag_delete",
            "generate_manifest",
            "put a",
            "put b",
            "delete_by_digest sha256:empty"
        ]
    );
}

#[tokio::test]
async fn test_slow_delete_when_flag_disabled_skips_capability_check() {
    let flags = FeatureFlags::new().with(flags::CONTAINER_REGISTRY_FAST_TAG_DELETE, false);
    let service = service(MockRegistry::default(), flags);

    assert_eq!(service.select_strategy().await, Strategy::Slow(SlowDelete));
    assert!(service.client().calls().is_empty());
}

#[tokio::test]
async fn test_failed_capability_check_falls_back_to_slow_delete() {
    let registry = MockRegistry {
        supports_tag_delete: Err(()),
        ..Default::default()
    };
    let service = service(registry, FeatureFlags::new());

    assert_eq!(service.select_strategy().await, Strategy::Slow(SlowDelete));
}

#[tokio::test]
async fn test_slow_delete_without_manifest() {
    let registry = MockRegistry {
        supports_tag_delete: Ok(false),
        manifest: false,
        ..Default::default()
    };
    let service = service(registry, FeatureFlags::new());

    let response = service.execute(REPO, &tags(&["a"])).await;

    assert_eq!(response.message(), Some("could not generate manifest"));
    assert!(!service.client().calls().iter().any(|c| c.starts_with("put")));
}

#[tokio::test]
async fn test_slow_delete_skips_unreplaced_tags() {
    let registry = MockRegistry {
        supports_tag_delete: Ok(false),
        refused: vec!["b"],
        ..Default::default()
    };
    let service = service(registry, FeatureFlags::new());

    let response = service.execute(REPO, &tags(&["a", "b", "c"])).await;

    assert_eq!(response.deleted(), tags(&["a", "c"]).as_slice());
}

#[tokio::test]
async fn test_slow_delete_digest_delete_fails() {
    let registry = MockRegistry {
        supports_tag_delete: Ok(false),
        digest_delete_ok: false,
        ..Default::default()
    };
    let service = service(registry, FeatureFlags::new());

    let response = service.execute(REPO, &tags(&["a"])).await;

    assert_eq!(response.message(), Some("could not delete tags"));
}

#[tokio::test]
async fn test_slow_delete_nothing_replaced_skips_digest_delete() {
    let registry = MockRegistry {
        supports_tag_delete: Ok(false),
        refused: vec!["a"],
        ..Default::default()
    };
    let service = service(registry, FeatureFlags::new());

    let response = service.execute(REPO, &tags(&["a"])).await;

    assert_eq!(response.message(), Some("could not delete tags"));
    assert!(
        !service
            .client()
            .calls()
            .iter()
            .any(|c| c.starts_with("delete_by_digest"))
    );
}

#[tokio::test]
async fn test_throttling_times_out_fast_delete() {
    let registry = MockRegistry {
        delay: Some(Duration::from_secs(5)),
        ..Default::default()
    };
    let flags = FeatureFlags::new().with(flags::CONTAINER_REGISTRY_EXPIRATION_POLICIES_THROTTLING, true);
    let service = DeleteTagsService::new(registry, flags, Duration::from_millis(20));

    let response = service.execute(REPO, &tags(&["v1", "v2"])).await;

    assert_eq!(response.message(), Some("Timeout while deleting tags"));
}

#[tokio::test]
async fn test_timeout_only_applies_with_throttling() {
    let service = DeleteTagsService::new(MockRegistry::default(), FeatureFlags::new(), Duration::from_millis(20));
    assert_eq!(service.select_strategy().await, Strategy::Fast(FastDelete::new()));

    let flags = FeatureFlags::new().with(flags::CONTAINER_REGISTRY_EXPIRATION_POLICIES_THROTTLING, true);
    let service = DeleteTagsService::new(MockRegistry::default(), flags, Duration::from_millis(20));
    assert_eq!(
        service.select_strategy().await,
        Strategy::Fast(FastDelete::with_timeout(Duration::from_millis(20)))
    );
}

#[tokio::test]
async fn test_timeout_from_config() {
    let mut config = ReplicationConfig::default();
    config.registry.delete_tags_service_timeout_secs = 7;
    config
        .features
        .set(flags::CONTAINER_REGISTRY_EXPIRATION_POLICIES_THROTTLING, true);

    let service = DeleteTagsService::from_config(MockRegistry::default(), &config);

    let Strategy::Fast(fast) = service.select_strategy().await else {
        panic!("expected fast delete");
    };
    assert_eq!(fast.timeout(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn test_strategies_are_usable_directly() {
    let registry = MockRegistry::default();

    let deleted = SlowDelete.delete(&registry, REPO, &tags(&["x"])).await.unwrap();
    assert_eq!(deleted, tags(&["x"]));

    let deleted = FastDelete::new().delete(&registry, REPO, &tags(&["y"])).await.unwrap();
    assert_eq!(deleted, tags(&["y"]));
}
