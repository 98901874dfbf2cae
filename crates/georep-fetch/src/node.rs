use georep_config::{NodeConfig, NodeRole};

use crate::data::TransferRequest;

/// The primary node a secondary pulls blobs from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryNode {
    url: String,
}

impl PrimaryNode {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> &str { &self.url }

    /// Absolute URL on the primary serving `request`.
    pub fn retrieve_url(&self, request: &TransferRequest) -> String {
        format!(
            "{}/api/v4/geo/retrieve/{}/{}",
            self.url,
            request.replicable_name(),
            request.model_record_id()
        )
    }
}

/// Role of the current node and the primary it knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStatus {
    role:    NodeRole,
    primary: Option<PrimaryNode>,
}

impl NodeStatus {
    pub fn new(role: NodeRole, primary: Option<PrimaryNode>) -> Self { Self { role, primary } }

    pub fn secondary(primary: PrimaryNode) -> Self { Self::new(NodeRole::Secondary, Some(primary)) }

    pub fn from_config(config: &NodeConfig) -> Self {
        Self::new(config.role, config.primary_url.as_deref().map(PrimaryNode::new))
    }

    pub fn role(&self) -> NodeRole { self.role }

    pub fn is_secondary(&self) -> bool { self.role == NodeRole::Secondary }

    pub fn primary(&self) -> Option<&PrimaryNode> { self.primary.as_ref() }
}
