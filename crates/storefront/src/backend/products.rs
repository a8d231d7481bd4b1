//! Product catalog operations.
//!
//! Reads follow a cache-or-fetch pattern; successful writes patch both
//! caches so later reads observe the mutation without another round trip.

use tracing::{debug, instrument};

use vesta_core::{Gender, ProductId};

use super::cache::{ListKey, patch_page};
use super::types::{ImageFile, Product, ProductPayload, ProductsResponse};
use super::{BackendClient, BackendError};

/// Default page size for list requests.
pub const DEFAULT_LIMIT: u32 = 9;

impl BackendClient {
    /// Fetch a page of products.
    ///
    /// Responses are memoized by the exact `(limit, offset, gender)` triple;
    /// a repeated request is served from the cache without a network call.
    /// Two concurrent first-time requests for the same triple both hit the
    /// network and the last response wins the cache slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; the cache is left untouched.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        gender: Option<Gender>,
    ) -> Result<ProductsResponse, BackendError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let offset = offset.unwrap_or(0);
        let key = ListKey::new(limit, offset, gender);

        if let Some(page) = self.inner.lists.get(&key).await {
            debug!("cache hit for product list");
            return Ok(page);
        }

        let response = self
            .inner
            .client
            .get(self.url("/products"))
            .query(&[
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
                ("gender", gender.map_or("", Gender::as_str).to_string()),
            ])
            .send()
            .await?;
        let page: ProductsResponse = Self::read_json(response).await?;

        self.inner.lists.insert(key, page.clone()).await;
        Ok(page)
    }

    /// Fetch a single product by id.
    ///
    /// The sentinel id `new` short-circuits to the unsaved template product
    /// without touching the cache or the network.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product_by_id(&self, id: &ProductId) -> Result<Product, BackendError> {
        if id.is_draft() {
            return Ok(Product::template());
        }
        self.fetch_product(id.as_str()).await
    }

    /// Fetch a single product by slug (the backend accepts an id here too).
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(slug = %id_slug))]
    pub async fn get_product_by_slug(&self, id_slug: &str) -> Result<Product, BackendError> {
        self.fetch_product(id_slug).await
    }

    async fn fetch_product(&self, term: &str) -> Result<Product, BackendError> {
        if let Some(product) = self.inner.products.get(term).await {
            debug!("cache hit for product");
            return Ok(product);
        }

        let response = self
            .inner
            .client
            .get(self.url(&format!("/products/{term}")))
            .send()
            .await?;
        let product: Product = Self::read_json(response).await?;

        self.inner
            .products
            .insert(term.to_owned(), product.clone())
            .await;
        Ok(product)
    }

    /// Create a product, uploading any pending images first.
    ///
    /// Uploaded file names are appended to the images already on the
    /// payload, and the create request is only issued once every upload has
    /// succeeded. Images are not retried or cleaned up if the create itself
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns the first upload error, or the create error, unmodified.
    #[instrument(skip(self, payload, images), fields(slug = %payload.slug))]
    pub async fn create_product(
        &self,
        payload: ProductPayload,
        images: Vec<ImageFile>,
    ) -> Result<Product, BackendError> {
        let payload = self.with_uploaded_images(payload, images).await?;

        let response = self
            .inner
            .client
            .post(self.url("/products"))
            .json(&payload)
            .send()
            .await?;
        let product: Product = Self::read_json(response).await?;

        self.refresh_caches(&product).await;
        Ok(product)
    }

    /// Update an existing product, uploading any pending images first.
    ///
    /// # Errors
    ///
    /// Returns the first upload error, or the update error, unmodified.
    #[instrument(skip(self, payload, images), fields(id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        payload: ProductPayload,
        images: Vec<ImageFile>,
    ) -> Result<Product, BackendError> {
        let payload = self.with_uploaded_images(payload, images).await?;

        let response = self
            .inner
            .client
            .patch(self.url(&format!("/products/{id}")))
            .json(&payload)
            .send()
            .await?;
        let product: Product = Self::read_json(response).await?;

        self.refresh_caches(&product).await;
        Ok(product)
    }

    /// Merge freshly uploaded image names into the payload.
    ///
    /// The upload batch must fully succeed before the payload is returned,
    /// so a product write can never reference a failed upload.
    async fn with_uploaded_images(
        &self,
        mut payload: ProductPayload,
        images: Vec<ImageFile>,
    ) -> Result<ProductPayload, BackendError> {
        let uploaded = self.upload_images(images).await?;
        payload.images.extend(uploaded);
        Ok(payload)
    }

    /// Propagate a mutated product into both caches.
    ///
    /// Overwrites the single-product entry under the product's id and
    /// rewrites matching entries inside every memoized list response,
    /// preserving list order and leaving non-matching products untouched.
    async fn refresh_caches(&self, product: &Product) {
        self.inner
            .products
            .insert(product.id.as_str().to_owned(), product.clone())
            .await;

        let patched: Vec<(ListKey, ProductsResponse)> = self
            .inner
            .lists
            .iter()
            .filter_map(|(key, page)| {
                patch_page(&page, product).map(|page| ((*key).clone(), page))
            })
            .collect();

        for (key, page) in patched {
            self.inner.lists.insert(key, page).await;
        }
    }
}
