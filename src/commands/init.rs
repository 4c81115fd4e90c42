//! Initialize engagement counters
//!
//! Ensures a counter record exists in the document store for every
//! on-disk slug. Run once after deploying new content; existing counters
//! are left untouched.

use anyhow::Result;

use crate::content::aggregate::ContentAggregator;
use crate::content::MdxLoader;
use crate::Folio;

pub async fn run(folio: &Folio) -> Result<()> {
    let store = folio.document_store();
    let aggregator = ContentAggregator::new(MdxLoader::new(&folio.content_dir), store);

    let initialized = aggregator.init_counters().await?;
    println!("Initialized counters for {} slugs", initialized);

    Ok(())
}
