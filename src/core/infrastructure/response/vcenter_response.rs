//! Wire types of the vCenter REST and VI/JSON endpoints used by the inventory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An item of `GET /api/vcenter/datacenter`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatacenterSummary {
    pub datacenter: String,
    pub name: String,
}

/// An item of `GET /api/vcenter/vm`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VmSummary {
    pub vm: String,
    pub name: String,
}

/// An item of `GET /api/vcenter/host`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostSummary {
    pub host: String,
    pub name: String,
}

/// The subset of `VirtualMachineConfigInfo` the filters read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VmConfigInfo {
    #[serde(default)]
    pub template: bool,
    #[serde(rename = "createDate", default)]
    pub create_date: Option<DateTime<Utc>>,
}

/// Body of `POST /api/cis/tagging/tag-association?action=list-attached-tags`.
#[derive(Debug, Clone, Serialize)]
pub struct ListAttachedTagsRequest<'a> {
    pub object_id: DynamicId<'a>,
}

/// A reference to an inventory object for the tagging service.
#[derive(Debug, Clone, Serialize)]
pub struct DynamicId<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
}

/// `GET /api/cis/tagging/tag/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TagModel {
    pub id: String,
    pub name: String,
    pub category_id: String,
}

/// `GET /api/cis/tagging/category/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryModel {
    pub name: String,
}
