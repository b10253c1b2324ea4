//! Local stash for contact submissions that could not be stored remotely.
//!
//! Each failed submission is written as pretty JSON to
//! `contact_submission_{millis}.json` so it can be recovered by hand.

use std::io;
use std::path::{Path, PathBuf};

use mhc_core::contact::ContactSubmission;

#[derive(Debug, Clone)]
pub struct ContactFallback {
    dir: PathBuf,
}

impl ContactFallback {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the submission and return the file it landed in. Never
    /// overwrites an earlier stash from the same millisecond.
    pub async fn stash(&self, submission: &ContactSubmission) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let body = serde_json::to_vec_pretty(submission)?;
        let millis = submission.timestamp.timestamp_millis();

        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("contact_submission_{millis}.json")
            } else {
                format!("contact_submission_{millis}_{attempt}.json")
            };
            let path = self.dir.join(name);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    use tokio::io::AsyncWriteExt;
                    file.write_all(&body).await?;
                    file.flush().await?;
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mhc_core::contact::ContactForm;

    use super::*;

    fn submission() -> ContactSubmission {
        let form = ContactForm {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            ..Default::default()
        };
        ContactSubmission::new(form, None, None)
    }

    #[tokio::test]
    async fn stash_writes_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = ContactFallback::new(dir.path().join("nested"));
        let sub = submission();

        let path = fallback.stash(&sub).await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, format!("contact_submission_{}.json", sub.timestamp.timestamp_millis()));

        let stored: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(stored["name"], "Sam");
        assert_eq!(stored["source"], "contact_page");
    }

    #[tokio::test]
    async fn same_millisecond_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = ContactFallback::new(dir.path());
        let sub = submission();

        let first = fallback.stash(&sub).await.unwrap();
        let second = fallback.stash(&sub).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
