//! Output formatting for grid cells and product details (table, JSON, markdown, CSV).

use crate::catalog::Product;
use crate::config::OutputFormat;
use crate::grid::ProductCellModel;

/// Formats grid cells and product details for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the cells of a loaded grid.
    pub fn format_cells(&self, cells: &[ProductCellModel]) -> String {
        if cells.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(cells).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => self.table_cells(cells),
            OutputFormat::Markdown => self.markdown_cells(cells),
            OutputFormat::Csv => self.csv_cells(cells),
        }
    }

    /// Formats a single product detail record.
    pub fn format_product(&self, product: &Product) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(product).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => self.table_product(product),
            OutputFormat::Markdown => self.markdown_product(product),
            OutputFormat::Csv => self.csv_product(product),
        }
    }

    // Table formatting

    fn table_cells(&self, cells: &[ProductCellModel]) -> String {
        let index_width = 4;
        let id_width = 12;
        let price_width = 12;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<index_width$}  {:<id_width$}  {:<price_width$}  {}",
            "#", "Product", "Price", "Title"
        ));
        lines.push(format!(
            "{:-<index_width$}  {:-<id_width$}  {:-<price_width$}  {:-<title_width$}",
            "", "", "", ""
        ));

        for (index, cell) in cells.iter().enumerate() {
            lines.push(format!(
                "{:<index_width$}  {:<id_width$}  {:>price_width$}  {}",
                index,
                cell.product_id,
                cell.price,
                truncate(&cell.title, title_width)
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", cells.len()));

        lines.join("\n")
    }

    fn table_product(&self, product: &Product) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Product: {}", product.product_id));
        lines.push(format!("Code:    {}", product.code));
        lines.push(format!("Title:   {}", product.title));
        lines.push(format!("Price:   {}", product.formatted_price()));

        if product.has_special_offer() {
            lines.push(format!("Offer:   {}", product.display_special_offer));
        }

        if !product.included_services.is_empty() {
            lines.push(format!("Services: {}", product.included_services.join(", ")));
        }

        lines.push(format!("Images:  {}", product.image_urls.len()));
        for url in product.secure_image_urls() {
            lines.push(format!("  {}", url));
        }

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_cells(&self, cells: &[ProductCellModel]) -> String {
        let mut lines = Vec::new();

        lines.push("| # | Product | Price | Title |".to_string());
        lines.push("|---|---------|-------|-------|".to_string());

        for (index, cell) in cells.iter().enumerate() {
            let title = cell.title.replace('|', "\\|");
            let title = match &cell.image_url {
                Some(url) => format!("[{}]({})", title, url),
                None => title,
            };
            lines.push(format!("| {} | {} | {} | {} |", index, cell.product_id, cell.price, title));
        }

        lines.join("\n")
    }

    fn markdown_product(&self, product: &Product) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", product.title));
        lines.push(String::new());

        lines.push(format!("- **Product:** {}", product.product_id));
        lines.push(format!("- **Code:** {}", product.code));
        lines.push(format!("- **Price:** {}", product.formatted_price()));

        if product.has_special_offer() {
            lines.push(format!("- **Offer:** {}", product.display_special_offer));
        }

        for service in &product.included_services {
            lines.push(format!("- **Included:** {}", service));
        }

        if let Some(url) = product.secure_image_urls().first() {
            lines.push(String::new());
            lines.push(format!("![{}]({})", product.title, url));
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "product_id,title,price,image_url".to_string()
    }

    fn csv_cells(&self, cells: &[ProductCellModel]) -> String {
        let mut lines = vec![self.csv_header()];

        for cell in cells {
            lines.push(format!(
                "{},{},{},{}",
                csv_escape(&cell.product_id),
                csv_escape(&cell.title),
                csv_escape(&cell.price),
                csv_escape(cell.image_url.as_deref().unwrap_or_default())
            ));
        }

        lines.join("\n")
    }

    fn csv_product(&self, product: &Product) -> String {
        let mut lines = vec![
            "product_id,code,title,price,special_offer,included_services,image_count".to_string(),
        ];

        lines.push(format!(
            "{},{},{},{},{},{},{}",
            csv_escape(&product.product_id),
            csv_escape(&product.code),
            csv_escape(&product.title),
            csv_escape(&product.formatted_price()),
            csv_escape(&product.display_special_offer),
            csv_escape(&product.included_services.join("; ")),
            product.image_urls.len()
        ));

        lines.join("\n")
    }
}

/// Shortens text to `width` characters, ending in "..." when cut.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// Quotes a CSV field when it contains separators, quotes, or newlines.
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cell(id: &str, title: &str) -> ProductCellModel {
        ProductCellModel {
            product_id: id.to_string(),
            title: title.to_string(),
            price: "£329.00".to_string(),
            image_url: Some(format!("https://img/{}", id)),
        }
    }

    fn make_product() -> Product {
        Product {
            product_id: "234".to_string(),
            code: "81701222".to_string(),
            title: "Bosch SMS50C22GB Freestanding Dishwasher, White".to_string(),
            price: "329.00".to_string(),
            details: "<p>Quiet</p>".to_string(),
            image_urls: vec!["//img/1".to_string(), "//img/2".to_string()],
            included_services: vec!["2 year guarantee included".to_string()],
            display_special_offer: String::new(),
        }
    }

    #[test]
    fn test_empty_cells() {
        assert_eq!(Formatter::new(OutputFormat::Table).format_cells(&[]), "No products found.");
        assert_eq!(Formatter::new(OutputFormat::Json).format_cells(&[]), "[]");
        assert_eq!(
            Formatter::new(OutputFormat::Csv).format_cells(&[]),
            "product_id,title,price,image_url"
        );
    }

    #[test]
    fn test_table_cells() {
        let cells = vec![make_cell("1", "First"), make_cell("2", "Second")];
        let output = Formatter::new(OutputFormat::Table).format_cells(&cells);

        assert!(output.contains("First"));
        assert!(output.contains("£329.00"));
        assert!(output.contains("Total: 2 products"));
    }

    #[test]
    fn test_table_truncates_long_titles() {
        let long = "x".repeat(80);
        let output = Formatter::new(OutputFormat::Table).format_cells(&[make_cell("1", &long)]);
        assert!(output.contains(&format!("{}...", "x".repeat(47))));
        assert!(!output.contains(&long));
    }

    #[test]
    fn test_json_cells() {
        let output = Formatter::new(OutputFormat::Json).format_cells(&[make_cell("1", "First")]);
        assert!(output.starts_with('['));
        assert!(output.contains("\"image_url\": \"https://img/1\""));
    }

    #[test]
    fn test_markdown_cells_escape_pipes() {
        let output =
            Formatter::new(OutputFormat::Markdown).format_cells(&[make_cell("1", "A | B")]);
        assert!(output.contains("[A \\| B](https://img/1)"));
    }

    #[test]
    fn test_csv_cells_escape() {
        let output =
            Formatter::new(OutputFormat::Csv).format_cells(&[make_cell("1", "Dishwasher, White")]);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "1,\"Dishwasher, White\",£329.00,https://img/1");
    }

    #[test]
    fn test_table_product() {
        let output = Formatter::new(OutputFormat::Table).format_product(&make_product());
        assert!(output.contains("Code:    81701222"));
        assert!(output.contains("Price:   £329.00"));
        assert!(output.contains("Services: 2 year guarantee included"));
        assert!(output.contains("https://img/2"));
        assert!(!output.contains("Offer:"));
    }

    #[test]
    fn test_markdown_product() {
        let output = Formatter::new(OutputFormat::Markdown).format_product(&make_product());
        assert!(output.starts_with("## Bosch"));
        assert!(output.contains("- **Included:** 2 year guarantee included"));
        assert!(output.contains("(https://img/1)"));
    }

    #[test]
    fn test_json_product() {
        let output = Formatter::new(OutputFormat::Json).format_product(&make_product());
        assert!(output.starts_with('{'));
        assert!(output.contains("\"display_special_offer\": \"\""));
    }

    #[test]
    fn test_csv_product() {
        let output = Formatter::new(OutputFormat::Csv).format_product(&make_product());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines[1],
            concat!(
                "234,81701222,\"Bosch SMS50C22GB Freestanding Dishwasher, White\",",
                "£329.00,,2 year guarantee included,2"
            )
        );
    }
}
