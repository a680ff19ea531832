//! Auth module for Microsoft Entra ID sign-in
//!
//! Provides token acquisition through the OAuth 2.0 device-code grant for
//! Microsoft Graph API access.

mod device_code;

pub use device_code::DeviceCodeAuthenticator;
