use std::time::Duration;

/// Connection settings for the hosted Firebase project.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub project_id: String,
    /// Public web API key sent as `?key=` on REST calls.
    pub api_key: Option<String>,
    pub storage_bucket: String,
    pub functions_region: String,
    pub timeout: Duration,
}

impl FirebaseConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        Self {
            storage_bucket: format!("{project_id}.appspot.com"),
            project_id,
            api_key: None,
            functions_region: "us-central1".into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Load from environment variables. Returns `None` when
    /// `FIREBASE_PROJECT_ID` is unset, meaning no hosted backend is configured.
    ///
    /// | Env Var                     | Default                |
    /// |-----------------------------|------------------------|
    /// | `FIREBASE_PROJECT_ID`       | (none)                 |
    /// | `FIREBASE_API_KEY`          | (none)                 |
    /// | `FIREBASE_STORAGE_BUCKET`   | `{project}.appspot.com`|
    /// | `FIREBASE_FUNCTIONS_REGION` | `us-central1`          |
    /// | `FIREBASE_TIMEOUT_SECS`     | `10`                   |
    pub fn from_env() -> Option<Self> {
        let project_id = std::env::var("FIREBASE_PROJECT_ID")
            .ok()
            .filter(|s| !s.trim().is_empty())?;
        let mut config = Self::new(project_id);

        config.api_key = std::env::var("FIREBASE_API_KEY").ok().filter(|s| !s.is_empty());
        if let Ok(bucket) = std::env::var("FIREBASE_STORAGE_BUCKET") {
            config.storage_bucket = bucket;
        }
        if let Ok(region) = std::env::var("FIREBASE_FUNCTIONS_REGION") {
            config.functions_region = region;
        }
        let timeout_secs: u64 = std::env::var("FIREBASE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("FIREBASE_TIMEOUT_SECS must be a valid u64");
        config.timeout = Duration::from_secs(timeout_secs);

        Some(config)
    }

    /// Root of the document tree in the default database.
    pub fn documents_url(&self) -> String {
        format!(
            "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
            self.project_id
        )
    }

    pub fn function_url(&self, name: &str) -> String {
        format!(
            "https://{}-{}.cloudfunctions.net/{name}",
            self.functions_region, self.project_id
        )
    }

    pub fn storage_objects_url(&self) -> String {
        format!(
            "https://firebasestorage.googleapis.com/v0/b/{}/o",
            self.storage_bucket
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_urls_from_project() {
        let config = FirebaseConfig::new("mhc-site");
        assert_eq!(config.storage_bucket, "mhc-site.appspot.com");
        assert_eq!(
            config.documents_url(),
            "https://firestore.googleapis.com/v1/projects/mhc-site/databases/(default)/documents"
        );
        assert_eq!(
            config.function_url("sendContactEmail"),
            "https://us-central1-mhc-site.cloudfunctions.net/sendContactEmail"
        );
    }
}
