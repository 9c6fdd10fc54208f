use serde::{Deserialize, Serialize};

/// Column names a run reads and writes for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    pub company_name: String,
    pub website_url: String,
    pub profile_url: String,
    pub follower_count: String,
}

/// Typed view of one dataset row for a single platform.
///
/// `follower_count` is only ever `Some` together with `profile_url`; the
/// dataset layer enforces this on every write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyRecord {
    pub company_name: String,
    pub website_url: Option<String>,
    pub profile_url: Option<String>,
    pub follower_count: Option<u64>,
}

impl CompanyRecord {
    /// A record without a usable company name is never processed.
    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.company_name.trim().is_empty()
    }

    #[must_use]
    pub fn has_profile(&self) -> bool {
        self.profile_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}
