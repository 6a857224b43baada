//! Built-in category and tag vocabularies.

use async_trait::async_trait;
use storefront_core::{Category, CategoryId, Tag, TagId};

use crate::error::ClientError;
use crate::source::ReferenceDataSource;

const CATEGORIES: &[(&str, &str)] = &[
    ("1", "Handcrafts"),
    ("2", "Food & Drinks"),
    ("3", "Clothing & Fashion"),
    ("4", "Home & Decor"),
    ("5", "Art & Collectibles"),
    ("6", "Agriculture"),
];

const TAGS: &[(&str, &str)] = &[
    ("1", "Handmade"),
    ("2", "Organic"),
    ("3", "Fair Trade"),
    ("4", "Traditional"),
    ("5", "Sustainable"),
    ("6", "Eco-friendly"),
    ("7", "Vegan"),
    ("8", "Natural"),
];

/// Reference data that never touches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticReferenceData {
    categories: Vec<Category>,
    tags: Vec<Tag>,
}

impl StaticReferenceData {
    pub fn new(categories: Vec<Category>, tags: Vec<Tag>) -> Self {
        Self { categories, tags }
    }

    /// The marketplace's standard vocabularies.
    pub fn marketplace() -> Self {
        Self::new(build(CATEGORIES, category), build(TAGS, tag))
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

impl Default for StaticReferenceData {
    fn default() -> Self {
        Self::marketplace()
    }
}

fn build<T>(entries: &[(&str, &str)], make: fn(&str, &str) -> Option<T>) -> Vec<T> {
    entries.iter().filter_map(|(id, name)| make(id, name)).collect()
}

fn category(id: &str, name: &str) -> Option<Category> {
    CategoryId::new(id).ok().map(|id| Category { id, name: name.to_string() })
}

fn tag(id: &str, name: &str) -> Option<Tag> {
    TagId::new(id).ok().map(|id| Tag { id, name: name.to_string() })
}

#[async_trait]
impl ReferenceDataSource for StaticReferenceData {
    async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        Ok(self.categories.clone())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        Ok(self.tags.clone())
    }
}
