//! Storefront session: the loaded catalogs, the user store, and display providers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use shopwise::{
    trending_listing, Catalog, CatalogItem, ImageProvider, PriceProvider, RandomImageProvider,
    RandomPriceProvider, RecommendOutcome, RecommendationResult, Recommender, ShopError,
    SigninRecord, SignupRecord, SqliteUserStore, TrendingListing, UserStore,
};

use crate::types::{McpError, McpResult};

/// Shown when a recommendation query has nothing to return.
pub const NO_RECOMMENDATIONS_MESSAGE: &str = "No recommendations available for this product.";

/// Summary counters for the stats resource and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct ShopStats {
    pub catalog_products: usize,
    pub trending_products: usize,
    pub signups: usize,
    pub signins: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
}

/// Owns everything a request handler needs.
pub struct ShopSession {
    recommender: Recommender,
    trending: Arc<Catalog>,
    users: Box<dyn UserStore>,
    images: Box<dyn ImageProvider>,
    prices: Box<dyn PriceProvider>,
    catalog_path: Option<PathBuf>,
}

impl ShopSession {
    /// Load the catalogs and open the user database.
    ///
    /// The training catalog must exist. A missing trending catalog leaves the
    /// landing listing empty.
    pub fn open(catalog_path: &str, trending_path: &str, db_path: &str) -> McpResult<Self> {
        let catalog = Catalog::from_path(catalog_path)?;

        let trending = match Catalog::from_path(trending_path) {
            Ok(c) => c,
            Err(ShopError::CatalogNotFound(path)) => {
                tracing::warn!("Trending catalog not found at {path}; landing listing is empty");
                Catalog::default()
            }
            Err(e) => return Err(e.into()),
        };

        let users = SqliteUserStore::open(db_path)?;

        tracing::info!(
            "Session ready: {} catalog products, {} trending, user store {}",
            catalog.len(),
            trending.len(),
            db_path
        );

        let mut session = Self::new(catalog, trending, Box::new(users));
        session.catalog_path = Some(PathBuf::from(catalog_path));
        Ok(session)
    }

    /// Build a session from already-loaded parts, with random display providers.
    pub fn new(catalog: Catalog, trending: Catalog, users: Box<dyn UserStore>) -> Self {
        Self {
            recommender: Recommender::new(Arc::new(catalog)),
            trending: Arc::new(trending),
            users,
            images: Box::new(RandomImageProvider),
            prices: Box::new(RandomPriceProvider),
            catalog_path: None,
        }
    }

    pub fn with_providers(
        mut self,
        images: Box<dyn ImageProvider>,
        prices: Box<dyn PriceProvider>,
    ) -> Self {
        self.images = images;
        self.prices = prices;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.recommender.catalog()
    }

    pub fn trending(&self) -> &Arc<Catalog> {
        &self.trending
    }

    /// A handle that can rank without holding the session lock.
    pub fn recommender(&self) -> Recommender {
        self.recommender.clone()
    }

    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_path.as_deref()
    }

    pub fn recommend(
        &self,
        product_name: &str,
        top_n: usize,
    ) -> (RecommendOutcome, RecommendationResult) {
        let results = self.recommender.recommend(product_name, top_n);
        (self.recommender.outcome(product_name), results)
    }

    pub fn lookup(&self, product_name: &str) -> McpResult<&CatalogItem> {
        self.catalog()
            .find(product_name)
            .ok_or_else(|| McpError::ProductNotFound(product_name.to_string()))
    }

    pub fn trending_listing(&self, limit: usize) -> TrendingListing {
        trending_listing(&self.trending, limit, self.images.as_ref(), self.prices.as_ref())
    }

    pub fn signup(&mut self, record: &SignupRecord) -> McpResult<i64> {
        let id = self.users.record_signup(record)?;
        tracing::info!("New signup '{}' (id {id})", record.username);
        Ok(id)
    }

    pub fn signin(&mut self, record: &SigninRecord) -> McpResult<i64> {
        let id = self.users.record_signin(record)?;
        tracing::info!("Signin recorded for '{}'", record.username);
        Ok(id)
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    pub fn stats(&self) -> McpResult<ShopStats> {
        Ok(ShopStats {
            catalog_products: self.catalog().len(),
            trending_products: self.trending.len(),
            signups: self.users.signup_count()?,
            signins: self.users.signin_count()?,
            catalog_path: self.catalog_path.as_ref().map(|p| p.display().to_string()),
        })
    }
}
