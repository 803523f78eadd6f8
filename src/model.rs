use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString, VariantNames};

fn is_zero(size: &i64) -> bool {
    *size == 0
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

/// The service sends `null` for attributes it never set.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload of the mutating volume calls. Empty strings, a zero size and a
/// false flag are the "unset" values and never reach the wire.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub size: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub availability_zone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub profile_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pool_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub snapshot_id: String,
    #[serde(skip_serializing_if = "is_false")]
    pub snapshot_from_cloud: bool,
}

/// Body of the resize call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendRequest {
    pub new_size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
    Id,
    Name,
    Status,
    AvailabilityZone,
    ProfileId,
    TenantId,
    Size,
    PoolId,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum SortDir {
    Asc,
    Desc,
}

/// Query of the list call.
///
/// Serializes to the flat string mapping the service expects. All keys are
/// always present; an empty value means "no constraint".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeFilter {
    pub limit: u32,
    pub offset: u32,
    pub sort_key: SortKey,
    pub sort_dir: SortDir,
    pub id: String,
    pub name: String,
    pub description: String,
    pub tenant_id: String,
    pub user_id: String,
    pub status: String,
    pub pool_id: String,
    pub availability_zone: String,
    pub profile_id: String,
    pub group_id: String,
}

impl VolumeFilter {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("sortDir", self.sort_dir.to_string()),
            ("sortKey", self.sort_key.to_string()),
            ("Id", self.id.clone()),
            ("Name", self.name.clone()),
            ("Description", self.description.clone()),
            ("TenantId", self.tenant_id.clone()),
            ("UserId", self.user_id.clone()),
            ("Status", self.status.clone()),
            ("PoolId", self.pool_id.clone()),
            ("AvailabilityZone", self.availability_zone.clone()),
            ("ProfileId", self.profile_id.clone()),
            ("GroupId", self.group_id.clone()),
        ]
    }
}

/// A volume as returned by the control plane.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tenant_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub availability_zone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pool_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub profile_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub snapshot_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub snapshot_from_cloud: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub group_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub multi_attach: bool,
    /// Attributes this client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
