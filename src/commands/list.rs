//! List site content

use anyhow::Result;

use crate::content::{ContentType, MdxLoader};
use crate::Folio;

/// List on-disk content of one type
pub fn run(folio: &Folio, content_type: ContentType) -> Result<()> {
    let loader = MdxLoader::new(&folio.content_dir);
    let posts = loader.load_all(content_type)?;

    println!("{} ({}):", content_type, posts.len());
    for post in posts {
        let date = if post.published_at.is_empty() {
            "unpublished".to_string()
        } else {
            post.published_at.clone()
        };
        println!("  {} - {} [{}]", date, post.title, post.slug);
    }

    Ok(())
}
