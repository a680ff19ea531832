//! Directory user and license assignment models

use serde::Deserialize;

/// Directory user as returned by the Graph users endpoint
///
/// `userPrincipalName` is the source-of-truth identity; a user object without
/// one is an upstream data error and fails deserialization. Everything else
/// is optional upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryUser {
    pub id: String,

    #[serde(rename = "displayName")]
    pub display_name: Option<String>,

    #[serde(rename = "userPrincipalName")]
    pub user_principal_name: String,

    #[serde(rename = "assignedLicenses", default)]
    pub assigned_licenses: Vec<AssignedLicense>,
}

/// One license assignment on a user
#[derive(Debug, Clone, Deserialize)]
pub struct AssignedLicense {
    #[serde(rename = "skuId")]
    pub sku_id: String,
}
