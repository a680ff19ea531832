//! User and license assignment endpoints

use super::GraphClient;
use crate::models::{DirectoryUser, GraphCollection, UserLicenseRecord};
use anyhow::Result;
use tracing::{info, warn};

impl GraphClient {
    /// Get all users with their license assignments
    ///
    /// Issues a single GET. When the directory holds more users than one
    /// response page, the overflow is logged and left out of the result.
    pub async fn list_users(&self) -> Result<Vec<DirectoryUser>> {
        let response: GraphCollection<DirectoryUser> = self
            .get_json("users?$select=id,displayName,userPrincipalName,assignedLicenses")
            .await?;

        if response.next_link.is_some() {
            warn!("directory has more users than one page; the report covers the first page only");
        }

        Ok(response.value)
    }

    /// Fetch users and flatten them into report rows
    ///
    /// Row order follows the API response order.
    pub async fn license_report(&self) -> Result<Vec<UserLicenseRecord>> {
        let users = self.list_users().await?;
        info!(count = users.len(), "fetched users");
        Ok(users.iter().map(UserLicenseRecord::from_user).collect())
    }
}
