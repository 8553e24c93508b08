use crate::domain::model::PageData;
use crate::domain::ports::PageRenderer;
use crate::utils::error::{CatalogError, Result};
use std::fmt::Write;

const CUSTOMER_HEADERS: [&str; 11] = [
    "Branch",
    "Cust ID",
    "Customer",
    "Alamat",
    "Kota",
    "Sales",
    "Channel",
    "Avg 2023",
    "Avg 2024",
    "Avg 2025",
    "Max",
];

const PRODUCT_HEADERS: [&str; 4] = ["Kode APL", "Produk", "HNA", "PPN"];

/// Renders the catalog as a single self-contained HTML page.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    title: String,
}

impl HtmlRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    fn write_page(&self, out: &mut String, page: &PageData) -> std::fmt::Result {
        let title = escape_html(&self.title);
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"id\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(
            out,
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
        )?;
        writeln!(out, "<title>{}</title>", title)?;
        writeln!(
            out,
            "<style>table{{border-collapse:collapse}}th,td{{border:1px solid #ccc;padding:2px 6px}}</style>"
        )?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<h1>{}</h1>", title)?;
        writeln!(
            out,
            "<p class=\"generated\">Updated: {}</p>",
            escape_html(&page.generated_at)
        )?;

        writeln!(out, "<h2>Customers ({})</h2>", page.customers.len())?;
        write_table(
            out,
            "customers",
            &CUSTOMER_HEADERS,
            page.customers.iter().map(|c| {
                vec![
                    c.branch.as_str(),
                    c.cust_id.as_str(),
                    c.cust_name.as_str(),
                    c.alamat.as_str(),
                    c.kota.as_str(),
                    c.sales_name.as_str(),
                    c.channel.as_str(),
                    c.avg_2023.as_str(),
                    c.avg_2024.as_str(),
                    c.avg_2025.as_str(),
                    c.max.as_str(),
                ]
            }),
        )?;

        writeln!(out, "<h2>Products ({})</h2>", page.products.len())?;
        write_table(
            out,
            "products",
            &PRODUCT_HEADERS,
            page.products.iter().map(|p| {
                vec![
                    p.code.as_str(),
                    p.name_product.as_str(),
                    p.hna.as_str(),
                    p.ppn.as_str(),
                ]
            }),
        )?;

        writeln!(out, "</body>")?;
        writeln!(out, "</html>")
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new("Catalog")
    }
}

impl PageRenderer for HtmlRenderer {
    fn render(&self, page: &PageData) -> Result<String> {
        let mut out = String::new();
        self.write_page(&mut out, page)
            .map_err(|e| CatalogError::RenderError {
                message: e.to_string(),
            })?;
        Ok(out)
    }
}

fn write_table<'a, I>(out: &mut String, id: &str, headers: &[&str], rows: I) -> std::fmt::Result
where
    I: Iterator<Item = Vec<&'a str>>,
{
    writeln!(out, "<table id=\"{}\">", id)?;
    out.push_str("<thead><tr>");
    for header in headers {
        write!(out, "<th>{}</th>", escape_html(header))?;
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for cells in rows {
        out.push_str("<tr>");
        for cell in cells {
            write!(out, "<td>{}</td>", escape_html(cell))?;
        }
        out.push_str("</tr>\n");
    }
    writeln!(out, "</tbody>\n</table>")
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CustomerRecord, ProductRecord, RecordSet};

    fn page() -> PageData {
        PageData {
            customers: RecordSet::from(vec![CustomerRecord {
                branch: "JOG".to_string(),
                cust_id: "C001".to_string(),
                cust_name: "Apotek <Sehat> & Co".to_string(),
                ..Default::default()
            }]),
            products: RecordSet::from(vec![ProductRecord {
                code: "APL001".to_string(),
                name_product: "Paracetamol".to_string(),
                hna: "15000".to_string(),
                ppn: String::new(),
            }]),
            generated_at: "2024-02-16 08:30:00".to_string(),
        }
    }

    #[test]
    fn test_render_contains_tables_and_timestamp() {
        let html = HtmlRenderer::new("Bayer Jogja").render(&page()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Bayer Jogja</title>"));
        assert!(html.contains("Updated: 2024-02-16 08:30:00"));
        assert!(html.contains("<table id=\"customers\">"));
        assert!(html.contains("<td>C001</td>"));
        assert!(html.contains("<td>APL001</td><td>Paracetamol</td><td>15000</td><td></td>"));
    }

    #[test]
    fn test_render_escapes_cell_text() {
        let html = HtmlRenderer::default().render(&page()).unwrap();
        assert!(html.contains("Apotek &lt;Sehat&gt; &amp; Co"));
        assert!(!html.contains("<Sehat>"));
    }
}
