//! Every selector and extraction rule the scraper depends on.
//!
//! Markup changes on the target site should only ever require edits here
//! (or a `selectors` override in the config file), never in the crawl logic.

use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};

/// How to turn the elements matched by a selector into a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extract {
    /// Text of the first match
    First,
    /// Concatenated text of every match
    All,
}

/// A field selector plus its extraction rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub selector: String,
    #[serde(default = "default_extract")]
    pub extract: Extract,
}

fn default_extract() -> Extract {
    Extract::First
}

impl FieldRule {
    pub fn first(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            extract: Extract::First,
        }
    }

    pub fn all(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            extract: Extract::All,
        }
    }

    /// Parse the selector once so the rule can be applied to many elements
    pub fn compile(&self) -> Result<CompiledRule> {
        Ok(CompiledRule {
            selector: compile(&self.selector)?,
            extract: self.extract,
        })
    }
}

/// A [`FieldRule`] with its selector already parsed
#[derive(Debug, Clone)]
pub struct CompiledRule {
    selector: Selector,
    extract: Extract,
}

impl CompiledRule {
    /// Apply the rule below `scope`, returning untrimmed text (empty on no match)
    pub fn raw_text(&self, scope: ElementRef<'_>) -> String {
        let mut matches = scope.select(&self.selector);
        match self.extract {
            Extract::First => matches
                .next()
                .map(|el| el.text().collect::<String>())
                .unwrap_or_default(),
            Extract::All => matches.flat_map(|el| el.text()).collect::<String>(),
        }
    }

    /// Apply the rule below `scope` and trim the result
    pub fn text(&self, scope: ElementRef<'_>) -> String {
        self.raw_text(scope).trim().to_string()
    }
}

/// Selectors for one row of the product listing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductFields {
    pub name: FieldRule,
    pub sku: FieldRule,
    pub price: FieldRule,
    pub unit: FieldRule,
    pub stock: FieldRule,
    pub brand: FieldRule,
}

impl Default for ProductFields {
    fn default() -> Self {
        Self {
            name: FieldRule::first(".pl_name"),
            sku: FieldRule::first(".pl_code"),
            price: FieldRule::first(".pl_incvat"),
            unit: FieldRule::all(".pl_units"),
            stock: FieldRule::all(".pl_instock"),
            brand: FieldRule::first(".pl_brand"),
        }
    }
}

/// [`ProductFields`] with every selector parsed
#[derive(Debug, Clone)]
pub struct CompiledProductFields {
    pub name: CompiledRule,
    pub sku: CompiledRule,
    pub price: CompiledRule,
    pub unit: CompiledRule,
    pub stock: CompiledRule,
    pub brand: CompiledRule,
}

impl ProductFields {
    pub fn compile(&self) -> Result<CompiledProductFields> {
        Ok(CompiledProductFields {
            name: self.name.compile()?,
            sku: self.sku.compile()?,
            price: self.price.compile()?,
            unit: self.unit.compile()?,
            stock: self.stock.compile()?,
            brand: self.brand.compile()?,
        })
    }
}

/// Site markup mapping used by every parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteSelectors {
    /// Container whose children are the top-level categories
    pub category_menu: String,

    /// Sub-category cards on a category page
    pub subcategory_card: String,

    /// Rows of the listing table, header rows included
    pub listing_row: String,

    /// Leading rows of every listing table that carry no product
    pub header_rows: usize,

    /// The "next page" control; the title must match exactly, spaces included
    pub next_page: String,

    pub product: ProductFields,

    pub description: FieldRule,

    /// Rows of the detail table that hosts the allergen block
    pub allergen_row: String,

    /// Position of the allergen row among `allergen_row` matches
    pub allergen_row_index: usize,

    pub allergen_class: String,
    pub allergen_icon: String,

    /// Substring of the icon URL that marks a warning
    pub allergen_warning: String,
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            category_menu: ".cat-menu".to_string(),
            subcategory_card: ".category-card-item".to_string(),
            listing_row: "#product_listing_table_in_form tr".to_string(),
            header_rows: 2,
            next_page: r#".prods[title=" Next Page "]"#.to_string(),
            product: ProductFields::default(),
            description: FieldRule::first(".product_info_description"),
            allergen_row: ".middle_column_div > table > tbody > tr".to_string(),
            allergen_row_index: 2,
            allergen_class: "allergens".to_string(),
            allergen_icon: "img".to_string(),
            allergen_warning: "red".to_string(),
        }
    }
}

/// Parse a CSS selector, mapping the borrowed parser error into ours
pub fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| ScrapeError::InvalidSelector(selector.to_string()))
}
