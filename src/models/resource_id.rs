//! Azure Resource Manager identifiers.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Parsed ARM resource id, e.g.
/// `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Network/virtualNetworks/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    raw: String,
    subscription_id: String,
    resource_group: Option<String>,
    name: String,
}

impl ResourceId {
    /// Id of the resource group `name` in `subscription_id`.
    pub fn for_resource_group(subscription_id: &str, name: &str) -> Result<Self, Box<dyn Error>> {
        format!("/subscriptions/{subscription_id}/resourceGroups/{name}").parse()
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    pub fn resource_group(&self) -> Option<&str> {
        self.resource_group.as_deref()
    }

    /// Last segment of the id (the resource's own name).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for ResourceId {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().trim_matches('/').split('/').collect();
        if parts.len() < 2 || !parts[0].eq_ignore_ascii_case("subscriptions") || parts[1].is_empty()
        {
            return Err(format!("Not an ARM resource id: '{s}'").into());
        }
        if parts.len() % 2 != 0 {
            return Err(format!("Unbalanced ARM resource id: '{s}'").into());
        }
        let resource_group = parts
            .iter()
            .position(|p| p.eq_ignore_ascii_case("resourceGroups"))
            .and_then(|i| parts.get(i + 1))
            .map(|rg| rg.to_string());
        let name = parts
            .last()
            .map(|n| n.to_string())
            .ok_or_else(|| format!("Empty ARM resource id: '{s}'"))?;

        Ok(ResourceId {
            raw: s.trim().to_string(),
            subscription_id: parts[1].to_string(),
            resource_group,
            name,
        })
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<ResourceId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e| serde::de::Error::custom(format!("{e}")))
    }
}
