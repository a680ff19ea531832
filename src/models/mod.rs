//! Data models for Microsoft Graph responses and report rows

mod odata;
mod report;
mod user;

pub use odata::GraphCollection;
pub use report::{NO_LICENSES, UserLicenseRecord};
pub use user::{AssignedLicense, DirectoryUser};
