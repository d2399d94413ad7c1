use crate::error::{Result, ScrapeError};
use crate::results::Product;
use std::fmt;
use std::path::Path;

/// Output file formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Csv,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Csv => write!(f, "csv"),
        }
    }
}

/// Column names in serialization order
const COLUMNS: [&str; 8] = [
    "name",
    "sku",
    "price",
    "inStock",
    "unit",
    "stockCount",
    "link",
    "brand",
];

const DESCRIPTION_COLUMN: &str = "description";

/// Render the whole product list in the given format
pub fn render(products: &[Product], format: Format) -> Result<String> {
    match format {
        Format::Json => render_json(products),
        Format::Csv => render_csv(products),
    }
}

/// Pretty-printed JSON array with two-space indentation
pub fn render_json(products: &[Product]) -> Result<String> {
    Ok(serde_json::to_string_pretty(products)?)
}

/// CSV with a header row
///
/// The description column is only present when at least one product has
/// a description; products without one get an empty cell.
pub fn render_csv(products: &[Product]) -> Result<String> {
    let with_description = products.iter().any(|p| p.description.is_some());

    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header = COLUMNS.to_vec();
    if with_description {
        header.push(DESCRIPTION_COLUMN);
    }
    writer.write_record(&header)?;

    for product in products {
        let in_stock = product.in_stock.to_string();
        let mut record = vec![
            product.name.as_str(),
            product.sku.as_str(),
            product.price.as_str(),
            in_stock.as_str(),
            product.unit.as_str(),
            product.stock_count.as_str(),
            product.link.as_str(),
            product.brand.as_str(),
        ];
        if with_description {
            record.push(product.description.as_deref().unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScrapeError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ScrapeError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Render the products and write them to `path`, replacing any existing file
pub fn write_products<P: AsRef<Path>>(path: P, products: &[Product], format: Format) -> Result<()> {
    let output = render(products, format)?;
    std::fs::write(path.as_ref(), output)?;
    ::log::debug!(
        "Wrote {} products as {} to {}",
        products.len(),
        format,
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(sku: &str, description: Option<&str>) -> Product {
        Product {
            name: format!("Cheese, {sku}"),
            sku: sku.to_string(),
            price: "£3.20".to_string(),
            in_stock: sku != "OUT",
            unit: "200g".to_string(),
            stock_count: if sku == "OUT" { "-2" } else { "7" }.to_string(),
            link: format!(
                "https://shop.example.com/ordering/pages/product_info.php?products_id={sku}"
            ),
            brand: "Say \"cheese\"".to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let products = vec![product("C1", None), product("OUT", Some("Aged\nsix months"))];
        let json = render(&products, Format::Json).unwrap();
        let parsed: Vec<Product> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, products);
    }

    #[test]
    fn test_json_layout() {
        let json = render_json(&[product("C1", None)]).unwrap();
        assert!(json.starts_with("[\n  {\n    \"name\": \"Cheese, C1\",\n    \"sku\": \"C1\","));
        assert!(json.contains("\"inStock\": true"));
        assert!(json.contains("\"stockCount\": \"7\""));
        assert!(!json.contains("description"));

        // Keys follow the record's field order
        let positions: Vec<usize> = COLUMNS
            .iter()
            .map(|c| json.find(&format!("\"{c}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_csv_round_trip() {
        let products = vec![product("C1", Some("Mild, creamy")), product("OUT", None)];
        let csv_text = render(&products, Format::Csv).unwrap();

        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let header: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(
            header,
            [
                "name",
                "sku",
                "price",
                "inStock",
                "unit",
                "stockCount",
                "link",
                "brand",
                "description"
            ]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Cheese, C1");
        assert_eq!(&rows[0][3], "true");
        assert_eq!(&rows[0][7], "Say \"cheese\"");
        assert_eq!(&rows[0][8], "Mild, creamy");
        assert_eq!(&rows[1][3], "false");
        assert_eq!(&rows[1][5], "-2");
        assert_eq!(&rows[1][8], "");

        let parsed: Vec<Product> = csv::Reader::from_reader(csv_text.as_bytes())
            .deserialize()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(parsed, products);
    }

    #[test]
    fn test_csv_without_descriptions_has_no_description_column() {
        let csv_text = render_csv(&[product("C1", None)]).unwrap();
        let first_line = csv_text.lines().next().unwrap();
        assert_eq!(first_line, "name,sku,price,inStock,unit,stockCount,link,brand");
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let file_name = format!("catalog_scraper_export_{}.json", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        std::fs::write(&path, "stale contents that are longer than the output").unwrap();

        write_products(&path, &[], Format::Json).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        std::fs::remove_file(&path).unwrap();
    }
}
