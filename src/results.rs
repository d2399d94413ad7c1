use serde::{Deserialize, Serialize};

/// A top-level catalog category as listed in the site menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Menu label
    pub name: String,

    /// Absolute link to the category page
    pub link: String,
}

/// One row of a product listing table, optionally enriched with extra info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub sku: String,
    pub price: String,
    pub in_stock: bool,
    pub unit: String,
    pub stock_count: String,

    /// Product detail page, built from the SKU
    pub link: String,
    pub brand: String,

    /// Only present after extra-info enrichment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Overwrite this product's fields with those fetched from its detail page
    pub fn merge_extra(&mut self, extra: ExtraInfo) {
        self.description = Some(extra.description);
    }
}

/// Fields that only exist on a product's detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraInfo {
    pub description: String,
}

/// Products extracted from one listing page plus the pagination cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub products: Vec<Product>,

    /// Absolute link to the following page, if the page has one
    pub next: Option<String>,
}

/// Everything extracted from a product detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPage {
    pub info: ExtraInfo,

    /// Text of allergen entries flagged with a red icon
    pub red_allergens: Vec<String>,
}
