//! Client-side persistence (the credential store).

pub mod store;

pub use store::CredentialStore;

/// Persisted key names.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const DEVICE_ID: &str = "device_id";
    /// Suffix of the validation-tag slot of a synchronized resource
    pub const ETAG_SUFFIX: &str = "_etag";
    /// Suffix of the cached-value slot of a synchronized resource
    pub const CACHE_SUFFIX: &str = "_cache";
}
