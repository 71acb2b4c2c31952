//! Resource URI templates and fixed resources.

use crate::types::ResourceEntry;

pub fn list_templates() -> Vec<ResourceEntry> {
    vec![
        ResourceEntry::template(
            "shop://product/{name}",
            "Product",
            "A catalog product by exact, percent-encoded name",
        ),
        ResourceEntry::template(
            "shop://recommendations/{name}",
            "Recommendations",
            "Top 10 products with the most similar tags",
        ),
    ]
}

pub fn list_resources() -> Vec<ResourceEntry> {
    vec![
        ResourceEntry::fixed(
            "shop://stats",
            "Shop Statistics",
            "Catalog sizes and user record counts",
        ),
        ResourceEntry::fixed("shop://trending", "Trending Products", "The landing page listing"),
    ]
}
