//! Flattened report rows

use serde::{Deserialize, Serialize};

use super::DirectoryUser;

/// Placeholder written to the Licenses column for users with no assignments
pub const NO_LICENSES: &str = "None";

/// One report row per directory user
///
/// Field order here is the report's column order: UserPrincipalName,
/// DisplayName, Licenses. Rows are built once from the API response and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLicenseRecord {
    #[serde(rename = "UserPrincipalName")]
    pub user_principal_name: String,

    #[serde(rename = "DisplayName")]
    pub display_name: String,

    #[serde(rename = "Licenses")]
    pub licenses: String,
}

impl UserLicenseRecord {
    /// Flatten a directory user into a report row
    ///
    /// License SKU ids are joined with `", "` in assignment order; an empty
    /// assignment list becomes the `"None"` placeholder. A missing display
    /// name becomes the empty string.
    pub fn from_user(user: &DirectoryUser) -> Self {
        let skus: Vec<&str> = user
            .assigned_licenses
            .iter()
            .map(|license| license.sku_id.as_str())
            .collect();

        Self {
            user_principal_name: user.user_principal_name.clone(),
            display_name: user.display_name.clone().unwrap_or_default(),
            licenses: if skus.is_empty() {
                NO_LICENSES.to_string()
            } else {
                skus.join(", ")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_from(body: serde_json::Value) -> DirectoryUser {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn joins_sku_ids_in_assignment_order() {
        let user = user_from(json!({
            "id": "u1",
            "displayName": "Ann",
            "userPrincipalName": "a@b.com",
            "assignedLicenses": [{ "skuId": "SKU1" }, { "skuId": "SKU2" }]
        }));

        let record = UserLicenseRecord::from_user(&user);
        assert_eq!(record.user_principal_name, "a@b.com");
        assert_eq!(record.display_name, "Ann");
        assert_eq!(record.licenses, "SKU1, SKU2");
    }

    #[test]
    fn empty_assignment_list_becomes_placeholder() {
        let user = user_from(json!({
            "id": "u2",
            "userPrincipalName": "bare@b.com",
            "assignedLicenses": []
        }));

        let record = UserLicenseRecord::from_user(&user);
        assert_eq!(record.licenses, NO_LICENSES);
    }

    #[test]
    fn absent_assignment_list_becomes_placeholder() {
        let user = user_from(json!({
            "id": "u3",
            "userPrincipalName": "absent@b.com"
        }));

        let record = UserLicenseRecord::from_user(&user);
        assert_eq!(record.licenses, NO_LICENSES);
    }

    #[test]
    fn missing_display_name_becomes_empty_string() {
        let user = user_from(json!({
            "id": "u4",
            "userPrincipalName": "anon@b.com",
            "assignedLicenses": [{ "skuId": "SKU9" }]
        }));

        let record = UserLicenseRecord::from_user(&user);
        assert_eq!(record.display_name, "");
        assert_eq!(record.licenses, "SKU9");
    }

    #[test]
    fn serializes_with_report_column_names() {
        let record = UserLicenseRecord {
            user_principal_name: "a@b.com".to_string(),
            display_name: "Ann".to_string(),
            licenses: "SKU1, SKU2".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "UserPrincipalName": "a@b.com",
                "DisplayName": "Ann",
                "Licenses": "SKU1, SKU2"
            })
        );
    }
}
