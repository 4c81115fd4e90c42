//! MDX content loader
//!
//! Discovers `.mdx` files under the content directory and turns them into
//! [`Post`] records. A file that fails front-matter extraction is skipped
//! with a warning; one bad file never fails the batch.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::content::frontmatter::FrontMatter;
use crate::content::post::{read_time, Banner, ContentType, Origin, Post};
use crate::content::slug::strip_extension;
use crate::error::{Error, Result};

/// Marker separating the metadata preamble from the post body
pub const BODY_MARKER: &str = "{/* content start */}";

/// Loads posts from the on-disk MDX origin
pub struct MdxLoader {
    content_dir: PathBuf,
}

impl MdxLoader {
    pub fn new<P: Into<PathBuf>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// Directory holding one content type
    pub fn type_dir(&self, content_type: ContentType) -> PathBuf {
        self.content_dir.join(content_type.as_str())
    }

    /// Path of a single content file
    pub fn file_path(&self, content_type: ContentType, slug: &str) -> PathBuf {
        self.type_dir(content_type).join(format!("{slug}.mdx"))
    }

    /// List candidate slugs (filenames minus extension), sorted for
    /// deterministic batch order.
    pub fn list_slugs(&self, content_type: ContentType) -> Result<Vec<String>> {
        let dir = self.type_dir(content_type);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut slugs = Vec::new();
        for entry in WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_mdx_file(path) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    slugs.push(strip_extension(name).to_string());
                }
            }
        }
        slugs.sort();
        Ok(slugs)
    }

    /// Load all posts of a content type. Malformed files are skipped.
    pub fn load_all(&self, content_type: ContentType) -> Result<Vec<Post>> {
        let mut posts = Vec::new();
        for slug in self.list_slugs(content_type)? {
            match self.load(content_type, &slug) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Skipping {slug}: {e}");
                }
            }
        }
        Ok(posts)
    }

    /// Load a single post by slug
    pub fn load(&self, content_type: ContentType, slug: &str) -> Result<Post> {
        let path = self.file_path(content_type, slug);
        if !path.exists() {
            return Err(Error::NotFound(format!("{content_type}/{slug}")));
        }
        let raw = fs::read_to_string(&path)?;
        self.parse(content_type, slug, &raw)
    }

    /// Raw post body, the text after the content marker
    pub fn body(&self, content_type: ContentType, slug: &str) -> Result<String> {
        let path = self.file_path(content_type, slug);
        if !path.exists() {
            return Err(Error::NotFound(format!("{content_type}/{slug}")));
        }
        let raw = fs::read_to_string(&path)?;
        match raw.split_once(BODY_MARKER) {
            Some((_, body)) => Ok(body.trim().to_string()),
            None => Err(Error::MalformedContent {
                path: path.display().to_string(),
                reason: "content marker not found".to_string(),
            }),
        }
    }

    fn parse(&self, content_type: ContentType, slug: &str, raw: &str) -> Result<Post> {
        let fm = FrontMatter::extract(slug, raw)?;

        let title = if fm.title.is_empty() {
            slug.to_string()
        } else {
            fm.title
        };

        let banner = if fm.banner_link.is_empty() {
            Banner::placeholder(content_type, slug)
        } else {
            Banner::from_link(&fm.banner_link)
        };

        let body = raw
            .split_once(BODY_MARKER)
            .map(|(_, body)| body)
            .unwrap_or(raw);

        Ok(Post {
            slug: slug.to_string(),
            title,
            description: fm.description,
            tags: fm.tags,
            published_at: fm.published_at,
            banner,
            banner_alt: none_if_empty(fm.banner_alt),
            banner_link: none_if_empty(fm.banner_link),
            read_time: read_time(body),
            origin: Origin::Mdx,
            last_updated_at: None,
        })
    }
}

/// Fields accepted by the admin write path
#[derive(Debug, Clone, Default)]
pub struct MdxPostInput {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub published_at: String,
    pub banner_alt: String,
    pub banner_link: String,
    pub content: String,
}

impl MdxLoader {
    /// Create a new content file from the admin scaffold template.
    pub fn create(
        &self,
        content_type: ContentType,
        slug: &str,
        input: &MdxPostInput,
    ) -> Result<Post> {
        let path = self.file_path(content_type, slug);
        if path.exists() {
            return Err(Error::Validation(format!(
                "a post with slug '{slug}' already exists"
            )));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, scaffold(content_type, slug, input))?;
        self.load(content_type, slug)
    }

    /// Rewrite an existing content file with updated fields.
    pub fn update(
        &self,
        content_type: ContentType,
        slug: &str,
        input: &MdxPostInput,
    ) -> Result<Post> {
        let path = self.file_path(content_type, slug);
        if !path.exists() {
            return Err(Error::NotFound(format!("{content_type}/{slug}")));
        }
        fs::write(&path, scaffold(content_type, slug, input))?;
        self.load(content_type, slug)
    }

    /// Remove a content file. The slug's counter record is left alone.
    pub fn delete(&self, content_type: ContentType, slug: &str) -> Result<()> {
        let path = self.file_path(content_type, slug);
        if !path.exists() {
            return Err(Error::NotFound(format!("{content_type}/{slug}")));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

/// Render the MDX scaffold the admin editor produces
fn scaffold(content_type: ContentType, slug: &str, input: &MdxPostInput) -> String {
    let banner_src = if input.banner_link.is_empty() {
        format!("/assets/{content_type}/{slug}/banner.jpg")
    } else {
        input.banner_link.clone()
    };
    let tags = input
        .tags
        .iter()
        .map(|t| format!("'{t}'"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"import {{ ContentLayout }} from '@components/layout/content-layout';

export const meta = {{
  title: '{title}',
  publishedAt: '{published_at}',
  banner: {{
    src: '{banner_src}',
    height: 400,
    width: 800
  }},
  bannerAlt: '{banner_alt}',
  bannerLink: '{banner_link}',
  description: '{description}',
  tags: [{tags}]
}};

export default ({{ children }}) => (
  <ContentLayout meta={{meta}}>{{children}}</ContentLayout>
);

{BODY_MARKER}

{content}
"#,
        title = input.title,
        published_at = input.published_at,
        banner_alt = input.banner_alt,
        banner_link = input.banner_link,
        description = input.description,
        content = input.content,
    )
}

fn none_if_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn is_mdx_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "mdx")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_post(dir: &Path, slug: &str, meta: &str, body: &str) {
        let blog_dir = dir.join("blog");
        fs::create_dir_all(&blog_dir).unwrap();
        let content = format!("export const meta = {{{meta}}};\n\n{BODY_MARKER}\n\n{body}\n");
        fs::write(blog_dir.join(format!("{slug}.mdx")), content).unwrap();
    }

    #[test]
    fn test_load_all_skips_malformed() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "good-post",
            "title: 'Good', publishedAt: '2024-01-01', tags: ['a']",
            "Body.",
        );
        let blog_dir = tmp.path().join("blog");
        fs::write(blog_dir.join("broken.mdx"), "# no meta block").unwrap();

        let loader = MdxLoader::new(tmp.path());
        let posts = loader.load_all(ContentType::Blog).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "good-post");
        assert_eq!(posts[0].title, "Good");
        assert_eq!(posts[0].origin, Origin::Mdx);
    }

    #[test]
    fn test_list_slugs_sorted() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "zebra", "title: 'Z'", "");
        write_post(tmp.path(), "apple", "title: 'A'", "");

        let loader = MdxLoader::new(tmp.path());
        assert_eq!(
            loader.list_slugs(ContentType::Blog).unwrap(),
            vec!["apple", "zebra"]
        );
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let loader = MdxLoader::new(tmp.path());
        assert!(loader.load_all(ContentType::Projects).unwrap().is_empty());
    }

    #[test]
    fn test_body_extraction() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "post", "title: 'P'", "The body text.");

        let loader = MdxLoader::new(tmp.path());
        assert_eq!(
            loader.body(ContentType::Blog, "post").unwrap(),
            "The body text."
        );
    }

    #[test]
    fn test_banner_from_link() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "linked",
            "title: 'L', bannerLink: 'https://cdn.example.com/b.jpg'",
            "",
        );

        let loader = MdxLoader::new(tmp.path());
        let post = loader.load(ContentType::Blog, "linked").unwrap();
        assert_eq!(post.banner.src, "https://cdn.example.com/b.jpg");
        assert_eq!(
            post.banner_link.as_deref(),
            Some("https://cdn.example.com/b.jpg")
        );
    }

    #[test]
    fn test_create_update_delete_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let loader = MdxLoader::new(tmp.path());

        let input = MdxPostInput {
            title: "Fresh Post".to_string(),
            description: "about things".to_string(),
            tags: vec!["rust".to_string(), "web".to_string()],
            published_at: "2024-03-01".to_string(),
            content: "The body.".to_string(),
            ..Default::default()
        };

        let post = loader
            .create(ContentType::Blog, "fresh-post", &input)
            .unwrap();
        assert_eq!(post.title, "Fresh Post");
        assert_eq!(post.tags, vec!["rust", "web"]);
        assert_eq!(
            loader.body(ContentType::Blog, "fresh-post").unwrap(),
            "The body."
        );

        // Creating the same slug twice is a validation error
        assert!(matches!(
            loader.create(ContentType::Blog, "fresh-post", &input),
            Err(Error::Validation(_))
        ));

        let mut updated = input.clone();
        updated.title = "Fresh Post, Revised".to_string();
        let post = loader
            .update(ContentType::Blog, "fresh-post", &updated)
            .unwrap();
        assert_eq!(post.title, "Fresh Post, Revised");

        loader.delete(ContentType::Blog, "fresh-post").unwrap();
        assert!(matches!(
            loader.delete(ContentType::Blog, "fresh-post"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let loader = MdxLoader::new(tmp.path());
        assert!(matches!(
            loader.load(ContentType::Blog, "nope"),
            Err(Error::NotFound(_))
        ));
    }
}
