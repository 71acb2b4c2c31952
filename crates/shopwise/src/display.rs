//! Storefront display decorations: truncated names, placeholder images, prices.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Number of trending products shown on the landing page.
pub const TRENDING_LIMIT: usize = 8;

/// Placeholder product images served from the static directory.
pub const PLACEHOLDER_IMAGES: &[&str] = &[
    "static/img_1.png",
    "static/img_2.png",
    "static/img_3.png",
    "static/img_4.png",
    "static/img_5.png",
    "static/img_6.png",
    "static/img_7.png",
    "static/img_8.png",
];

/// Display prices a page may show.
pub const PRICE_CHOICES: &[u32] = &[40, 50, 60, 70, 100, 122, 106, 50, 30, 50];

/// Keep the first `length` characters of `text`, appending `...` when anything was cut.
pub fn truncate(text: &str, length: usize) -> String {
    match text.char_indices().nth(length) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Chooses the image shown for a product card.
pub trait ImageProvider: Send + Sync {
    fn image_url(&self) -> String;
}

/// Chooses the price shown on a page.
pub trait PriceProvider: Send + Sync {
    fn price(&self) -> u32;
}

/// Uniform choice among [`PLACEHOLDER_IMAGES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomImageProvider;

impl ImageProvider for RandomImageProvider {
    fn image_url(&self) -> String {
        PLACEHOLDER_IMAGES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default()
            .to_string()
    }
}

/// Uniform choice among [`PRICE_CHOICES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPriceProvider;

impl PriceProvider for RandomPriceProvider {
    fn price(&self) -> u32 {
        PRICE_CHOICES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default()
    }
}

/// Always the same image.
#[derive(Debug, Clone)]
pub struct FixedImageProvider(pub String);

impl ImageProvider for FixedImageProvider {
    fn image_url(&self) -> String {
        self.0.clone()
    }
}

/// Always the same price.
#[derive(Debug, Clone, Copy)]
pub struct FixedPriceProvider(pub u32);

impl PriceProvider for FixedPriceProvider {
    fn price(&self) -> u32 {
        self.0
    }
}

/// A product card on the landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingProduct {
    pub name: String,
    pub short_name: String,
    pub brand: String,
    pub review_count: Option<f64>,
    pub rating: Option<f64>,
    pub image_url: String,
}

/// The landing page listing. One price is drawn for the whole page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingListing {
    pub products: Vec<TrendingProduct>,
    pub price: u32,
}

/// Maximum characters of a product name shown on a card.
pub const CARD_NAME_LENGTH: usize = 12;

/// First `limit` rows of the trending catalog, decorated for display.
pub fn trending_listing(
    catalog: &Catalog,
    limit: usize,
    images: &dyn ImageProvider,
    prices: &dyn PriceProvider,
) -> TrendingListing {
    let products = catalog
        .head(limit)
        .iter()
        .map(|item| TrendingProduct {
            name: item.name.clone(),
            short_name: truncate(&item.name, CARD_NAME_LENGTH),
            brand: item.brand.clone(),
            review_count: item.review_count,
            rating: item.rating,
            image_url: images.image_url(),
        })
        .collect();

    TrendingListing {
        products,
        price: prices.price(),
    }
}
