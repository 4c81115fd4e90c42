//! Create a new content file

use anyhow::Result;

use crate::content::{slug, ContentType, MdxLoader, MdxPostInput};
use crate::Folio;

/// Create a new MDX post from the admin scaffold
pub fn run(folio: &Folio, title: &str, content_type: ContentType) -> Result<()> {
    let loader = MdxLoader::new(&folio.content_dir);
    let slug = slug::normalize(title);

    let input = MdxPostInput {
        title: title.to_string(),
        published_at: chrono::Local::now().format("%Y-%m-%d").to_string(),
        ..Default::default()
    };

    let post = loader.create(content_type, &slug, &input)?;
    println!(
        "Created {}",
        loader.file_path(content_type, &post.slug).display()
    );

    Ok(())
}
