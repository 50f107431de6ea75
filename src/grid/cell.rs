//! Cell view-model and the image loading boundary.

use crate::catalog::SearchResultsProduct;
use serde::Serialize;

/// Loads an image from a URL string into whatever view the renderer owns.
///
/// Caching and decoding belong to the implementor.
pub trait ImageLoader {
    fn load_image(&mut self, url: &str);
}

/// Values a grid cell displays for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCellModel {
    pub product_id: String,
    pub title: String,
    /// Price with currency symbol
    pub price: String,
    /// https image URL, if the product has one
    pub image_url: Option<String>,
}

impl ProductCellModel {
    /// Binds a search result to its cell values.
    pub fn from_product(product: &SearchResultsProduct) -> Self {
        Self {
            product_id: product.product_id.clone(),
            title: product.title.clone(),
            price: product.formatted_price(),
            image_url: product.secure_image_url(),
        }
    }

    /// Hands the image URL to the loader. Returns false when there is nothing to load.
    pub fn load_image(&self, loader: &mut impl ImageLoader) -> bool {
        match &self.image_url {
            Some(url) => {
                loader.load_image(url);
                true
            }
            None => false,
        }
    }
}
