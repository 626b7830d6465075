use serde::{Deserialize, Serialize};

/// Placeholder used wherever the provider had no value for a field.
pub const NOT_AVAILABLE: &str = "N/A";

/// One discovered running instance together with its derived connection
/// metadata. Field names serialize to the fixed cache header:
/// `InstanceId, Name, PrivateIpAddress, KeyName, TargetUser,
/// PlatformDetails, ImageId, ImageName`.
///
/// All fields are plain strings; absent provider values are stored as
/// `N/A` (or an empty private address) so a record loaded from the cache
/// is structurally identical to a freshly fetched one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    #[serde(rename = "InstanceId")]
    pub instance_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PrivateIpAddress")]
    pub private_ip: String,
    #[serde(rename = "KeyName")]
    pub key_name: String,
    /// Best-guess login user. Never empty: the heuristic falls back to a
    /// platform-based default when nothing matches.
    #[serde(rename = "TargetUser")]
    pub target_user: String,
    #[serde(rename = "PlatformDetails")]
    pub platform_details: String,
    #[serde(rename = "ImageId")]
    pub image_id: String,
    /// AMI name, `N/A` until the batched image lookup resolves it.
    #[serde(rename = "ImageName")]
    pub image_name: String,
}

impl InstanceRecord {
    /// Label shown in the selector for this record, e.g.
    /// `[3] web-frontend (i-0abc123)`.
    pub fn label(&self, index: usize) -> String {
        format!("[{}] {} ({})", index + 1, self.name, self.instance_id)
    }

    /// Whether a string field carries a usable value.
    pub fn is_present(value: &str) -> bool {
        !value.trim().is_empty() && value != NOT_AVAILABLE
    }
}
