//! Common AWS type definitions shared across the workspace.

use std::fmt;

/// AWS Account ID (12-digit string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID from a string.
    ///
    /// # Errors
    /// Returns an error if the account ID is not a 12-digit numeric string.
    pub fn new(id: impl Into<String>) -> Result<Self, crate::CoreError> {
        let id = id.into();
        if id.len() != 12 || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(crate::CoreError::InvalidAccountId(id));
        }
        Ok(Self(id))
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ARN of the account's root principal.
    ///
    /// ```
    /// use s3migrate_core::AccountId;
    ///
    /// let id = AccountId::new("999999999999").unwrap();
    /// assert_eq!(id.root_arn(), "arn:aws:iam::999999999999:root");
    /// ```
    #[must_use]
    pub fn root_arn(&self) -> String {
        format!("arn:aws:iam::{}:root", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a credential profile from the shared AWS config files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ProfileName(String);

impl ProfileName {
    /// Create a new profile name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the profile name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProfileName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_valid_account_id() {
        let id = AccountId::new("123456789012").unwrap();
        assert_eq!(id.as_str(), "123456789012");
    }

    #[test]
    fn test_should_reject_invalid_account_id() {
        assert!(AccountId::new("12345").is_err());
        assert!(AccountId::new("abcdefghijkl").is_err());
        assert!(AccountId::new("1234567890123").is_err());
        assert!(AccountId::new("").is_err());
    }

    #[test]
    fn test_should_format_root_arn() {
        let id = AccountId::new("000000000000").unwrap();
        assert_eq!(id.root_arn(), "arn:aws:iam::000000000000:root");
        assert_eq!(id.to_string(), "000000000000");
    }

    #[test]
    fn test_should_create_profile_name() {
        let profile = ProfileName::from("legacy-account");
        assert_eq!(profile.as_str(), "legacy-account");
        assert_eq!(profile.to_string(), "legacy-account");
    }
}
