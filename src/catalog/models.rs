//! Data models for catalog search results and product details.

use serde::{Deserialize, Deserializer, Serialize};

/// Currency symbol prefixed to display prices.
pub const CURRENCY_SYMBOL: &str = "£";

/// Lightweight product record returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultsProduct {
    /// Catalog key, never empty
    pub product_id: String,
    /// Product title
    pub title: String,
    /// Display price as sent by the API (e.g. "1450.00")
    pub price: String,
    /// Raw image URL, usually protocol-relative ("//host/path")
    pub image_url: String,
}

impl SearchResultsProduct {
    /// Creates a new search result product.
    pub fn new(
        product_id: impl Into<String>,
        title: impl Into<String>,
        price: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            title: title.into(),
            price: price.into(),
            image_url: image_url.into(),
        }
    }

    /// Returns the price prefixed with the currency symbol.
    pub fn formatted_price(&self) -> String {
        format!("{}{}", CURRENCY_SYMBOL, self.price)
    }

    /// Returns the image URL upgraded to https, or None when there is no image.
    pub fn secure_image_url(&self) -> Option<String> {
        secure_url(&self.image_url)
    }
}

/// Full product record returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog key
    pub product_id: String,
    /// Product code printed on the product page
    pub code: String,
    /// Product title
    pub title: String,
    /// Display price as sent by the API
    pub price: String,
    /// Long-form HTML description
    pub details: String,
    /// Gallery image URLs
    pub image_urls: Vec<String>,
    /// Services bundled with the product (guarantees, delivery)
    pub included_services: Vec<String>,
    /// Special offer text, empty when there is none
    pub display_special_offer: String,
}

impl Product {
    /// Returns the price prefixed with the currency symbol.
    pub fn formatted_price(&self) -> String {
        format!("{}{}", CURRENCY_SYMBOL, self.price)
    }

    /// Returns the gallery URLs upgraded to https, dropping empty entries.
    pub fn secure_image_urls(&self) -> Vec<String> {
        self.image_urls.iter().filter_map(|url| secure_url(url)).collect()
    }

    /// Returns true if the product carries a special offer.
    pub fn has_special_offer(&self) -> bool {
        !self.display_special_offer.trim().is_empty()
    }
}

/// Upgrades a protocol-relative or plain http URL to https.
pub fn secure_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    if let Some(rest) = url.strip_prefix("//") {
        Some(format!("https://{}", rest))
    } else if let Some(rest) = url.strip_prefix("http://") {
        Some(format!("https://{}", rest))
    } else {
        Some(url.to_string())
    }
}

// Wire format

/// Search response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub products: Option<Vec<SearchProductDto>>,
    #[serde(default)]
    pub results: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchProductDto {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: PriceDto,
    #[serde(default)]
    pub image: String,
}

impl From<SearchProductDto> for SearchResultsProduct {
    fn from(dto: SearchProductDto) -> Self {
        Self {
            product_id: dto.product_id,
            title: dto.title,
            price: dto.price.now,
            image_url: dto.image,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PriceDto {
    #[serde(default, deserialize_with = "string_or_number")]
    pub now: String,
}

/// Detail response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductDto {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: PriceDto,
    #[serde(default)]
    pub details: DetailsDto,
    #[serde(default)]
    pub media: MediaDto,
    #[serde(default)]
    pub additional_services: AdditionalServicesDto,
    #[serde(default)]
    pub display_special_offer: String,
}

impl ProductDto {
    /// Converts into the domain record, using `requested_id` when the body has no id.
    pub fn into_product(self, requested_id: &str) -> Product {
        let product_id =
            if self.product_id.is_empty() { requested_id.to_string() } else { self.product_id };

        Product {
            product_id,
            code: self.code,
            title: self.title,
            price: self.price.now,
            details: self.details.product_information,
            image_urls: self.media.images.urls,
            included_services: self.additional_services.included_services,
            display_special_offer: self.display_special_offer,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DetailsDto {
    #[serde(default)]
    pub product_information: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MediaDto {
    #[serde(default)]
    pub images: ImagesDto,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ImagesDto {
    #[serde(default)]
    pub urls: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AdditionalServicesDto {
    #[serde(default)]
    pub included_services: Vec<String>,
}

/// Prices come back as strings, but some listings send bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}
