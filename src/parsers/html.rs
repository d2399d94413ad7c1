use crate::error::{Result, ScrapeError};
use crate::results::{Category, ExtraInfo, ListingPage, Product, ProductPage};
use crate::selectors::{SiteSelectors, compile};
use crate::utils::{product_link, resolve_link};
use scraper::{ElementRef, Html};

/// Extracts the top-level categories from the catalog home page
///
/// Each direct child of the category menu contributes its first child
/// element's text, untouched, and link, in document order.
pub fn parse_categories(
    html: &str,
    page_url: &str,
    selectors: &SiteSelectors,
) -> Result<Vec<Category>> {
    let doc = Html::parse_document(html);
    let menu_selector = compile(&selectors.category_menu)?;
    let menu = doc
        .select(&menu_selector)
        .next()
        .ok_or_else(|| missing(&selectors.category_menu, page_url))?;

    let categories = menu
        .children()
        .filter_map(ElementRef::wrap)
        .map(|item| -> Result<Category> {
            let entry = first_child_element(item)
                .ok_or_else(|| missing(&format!("{} > * > *", selectors.category_menu), page_url))?;
            Ok(Category {
                name: entry.text().collect::<String>(),
                link: href(entry, page_url)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    ::log::debug!("Found {} categories on {}", categories.len(), page_url);
    Ok(categories)
}

/// Extracts the sub-category links from a category page
///
/// A page without any sub-category card yields an empty list.
pub fn parse_subcategory_links(
    html: &str,
    page_url: &str,
    selectors: &SiteSelectors,
) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let card_selector = compile(&selectors.subcategory_card)?;

    doc.select(&card_selector)
        .map(|card| {
            let anchor = first_child_element(card)
                .ok_or_else(|| missing(&format!("{} > *", selectors.subcategory_card), page_url))?;
            href(anchor, page_url)
        })
        .collect()
}

/// Extracts the products and the next page link from a listing page
///
/// The first `header_rows` rows are skipped by position, whatever they hold.
pub fn parse_listing(
    html: &str,
    page_url: &str,
    site_url: &str,
    selectors: &SiteSelectors,
) -> Result<ListingPage> {
    let doc = Html::parse_document(html);
    let row_selector = compile(&selectors.listing_row)?;
    let next_selector = compile(&selectors.next_page)?;
    let fields = selectors.product.compile()?;

    let mut products = Vec::new();
    for row in doc.select(&row_selector).skip(selectors.header_rows) {
        let sku = fields.sku.text(row);
        let raw_stock = fields.stock.raw_text(row);

        products.push(Product {
            name: fields.name.text(row),
            link: product_link(site_url, &sku),
            sku,
            price: fields.price.text(row),
            // A dash in the stock column is how the site marks items out of stock
            in_stock: !raw_stock.contains('-'),
            unit: fields.unit.text(row),
            stock_count: raw_stock.trim().to_string(),
            brand: fields.brand.text(row),
            description: None,
        });
    }

    let next = match doc.select(&next_selector).next() {
        Some(control) => control
            .value()
            .attr("href")
            .map(|h| resolve_link(page_url, h))
            .transpose()?,
        None => None,
    };

    Ok(ListingPage { products, next })
}

/// Extracts the description and flagged allergens from a product detail page
pub fn parse_product_page(html: &str, selectors: &SiteSelectors) -> Result<ProductPage> {
    let doc = Html::parse_document(html);
    let row_selector = compile(&selectors.allergen_row)?;
    let div_selector = compile("div")?;
    let icon_selector = compile(&selectors.allergen_icon)?;
    let description = selectors.description.compile()?;

    let mut red_allergens = Vec::new();
    if let Some(row) = doc.select(&row_selector).nth(selectors.allergen_row_index) {
        for block in row.select(&div_selector) {
            let entries = block
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|el| el.value().classes().any(|c| c == selectors.allergen_class));

            for entry in entries {
                let icon = entry
                    .select(&icon_selector)
                    .next()
                    .and_then(|img| img.value().attr("src"));

                if icon.is_some_and(|src| src.contains(&selectors.allergen_warning)) {
                    red_allergens.push(entry.text().collect::<String>().trim().to_string());
                }
            }
        }
    }

    Ok(ProductPage {
        info: ExtraInfo {
            description: description.text(doc.root_element()),
        },
        red_allergens,
    })
}

fn first_child_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.children().find_map(ElementRef::wrap)
}

/// Absolute `href` of an element, empty when the attribute is missing
fn href(el: ElementRef<'_>, page_url: &str) -> Result<String> {
    match el.value().attr("href") {
        Some(h) => resolve_link(page_url, h),
        None => Ok(String::new()),
    }
}

fn missing(selector: &str, url: &str) -> ScrapeError {
    ScrapeError::MissingElement {
        selector: selector.to_string(),
        url: url.to_string(),
    }
}
