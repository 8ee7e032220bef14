//! Azure resource group data model.

use super::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

/// Output of `az group create`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResourceGroup {
    pub id: ResourceId,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub properties: ResourceGroupProperties,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
}
