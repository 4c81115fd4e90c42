//! Static page content (home, about)
//!
//! Page payloads live as JSON files under the pages directory so the admin
//! dashboard can edit them. A missing or corrupt file falls back to the
//! compiled-in defaults rather than failing the page.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub name: String,
    pub role: String,
    pub resume_link: String,
    pub linkedin_link: String,
    pub github_link: String,
}

impl Default for HomeContent {
    fn default() -> Self {
        Self {
            title: "Hi!".to_string(),
            subtitle: "Welcome to my corner of the internet".to_string(),
            description: "I write about the things I build and learn along the way.".to_string(),
            name: "John Doe".to_string(),
            role: "Full Stack Developer".to_string(),
            resume_link: String::new(),
            linkedin_link: String::new(),
            github_link: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutContent {
    pub title: String,
    pub name: String,
    pub content: String,
    pub tech_stack: Vec<String>,
    pub certifications: Vec<Certification>,
}

impl Default for AboutContent {
    fn default() -> Self {
        Self {
            title: "About".to_string(),
            name: "John Doe".to_string(),
            content: "A few words about who I am and what I do.".to_string(),
            tech_stack: Vec::new(),
            certifications: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: String,
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Reads and writes page content files
pub struct PageStore {
    pages_dir: PathBuf,
}

impl PageStore {
    pub fn new<P: Into<PathBuf>>(pages_dir: P) -> Self {
        Self {
            pages_dir: pages_dir.into(),
        }
    }

    pub fn home(&self) -> HomeContent {
        read_or_default(&self.pages_dir.join("home.json"))
    }

    pub fn about(&self) -> AboutContent {
        read_or_default(&self.pages_dir.join("about.json"))
    }

    pub fn set_home(&self, content: &HomeContent) -> Result<()> {
        self.write("home.json", content)
    }

    pub fn set_about(&self, content: &AboutContent) -> Result<()> {
        self.write("about.json", content)
    }

    fn write<T: Serialize>(&self, file: &str, content: &T) -> Result<()> {
        fs::create_dir_all(&self.pages_dir)?;
        let json = serde_json::to_string_pretty(content)
            .map_err(|e| crate::error::Error::Validation(e.to_string()))?;
        fs::write(self.pages_dir.join(file), json)?;
        Ok(())
    }
}

fn read_or_default<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {:?}, using defaults: {}", path, e);
            T::default()
        }),
        Err(_) => T::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_yield_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = PageStore::new(tmp.path());
        assert_eq!(store.home(), HomeContent::default());
        assert_eq!(store.about(), AboutContent::default());
    }

    #[test]
    fn test_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = PageStore::new(tmp.path());

        let mut home = HomeContent::default();
        home.name = "Jane".to_string();
        home.github_link = "https://github.com/jane".to_string();
        store.set_home(&home).unwrap();
        assert_eq!(store.home(), home);

        let mut about = AboutContent::default();
        about.tech_stack = vec!["Rust".to_string(), "Axum".to_string()];
        store.set_about(&about).unwrap();
        assert_eq!(store.about(), about);
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("home.json"), "{not json").unwrap();
        let store = PageStore::new(tmp.path());
        assert_eq!(store.home(), HomeContent::default());
    }
}
