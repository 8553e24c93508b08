use serde::{Deserialize, Serialize};

/// Value stored for an empty or missing cell.
pub const SENTINEL: &str = " ";

/// How a mapped column is filled when the cell has no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Empty or absent cells become [`SENTINEL`].
    Sentinel,
    /// Absent cells (row too short) become `""`; present-but-empty cells still
    /// become [`SENTINEL`].
    EmptyWhenAbsent,
}

/// A field of a record type that can be fed from a spreadsheet column.
pub trait RecordField: Copy + Ord + std::fmt::Debug + serde::de::DeserializeOwned {
    /// Column positions used when the configuration does not override them.
    fn default_columns() -> Vec<(Self, usize)>;

    fn fill(self) -> Fill {
        Fill::Sentinel
    }
}

/// A record assembled field by field from one spreadsheet row.
pub trait SheetRecord: Default {
    type Field: RecordField;

    /// Human label used in log lines ("customer", "product").
    const KIND: &'static str;

    fn assign(&mut self, field: Self::Field, value: String);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub branch: String,
    pub cust_id: String,
    pub cust_name: String,
    pub alamat: String,
    pub kota: String,
    pub sales_name: String,
    pub channel: String,
    pub avg_2023: String,
    pub avg_2024: String,
    pub avg_2025: String,
    pub max: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerField {
    Branch,
    CustId,
    CustName,
    Alamat,
    Kota,
    SalesName,
    Channel,
    #[serde(rename = "avg_2023")]
    Avg2023,
    #[serde(rename = "avg_2024")]
    Avg2024,
    #[serde(rename = "avg_2025")]
    Avg2025,
    Max,
}

impl RecordField for CustomerField {
    fn default_columns() -> Vec<(Self, usize)> {
        use CustomerField::*;
        vec![
            (Branch, 0),
            (CustId, 1),
            (CustName, 2),
            (Alamat, 3),
            (Kota, 4),
            (SalesName, 5),
            (Channel, 6),
            (Avg2023, 7),
            (Avg2024, 8),
            (Avg2025, 9),
            (Max, 10),
        ]
    }
}

impl SheetRecord for CustomerRecord {
    type Field = CustomerField;
    const KIND: &'static str = "customer";

    fn assign(&mut self, field: CustomerField, value: String) {
        let slot = match field {
            CustomerField::Branch => &mut self.branch,
            CustomerField::CustId => &mut self.cust_id,
            CustomerField::CustName => &mut self.cust_name,
            CustomerField::Alamat => &mut self.alamat,
            CustomerField::Kota => &mut self.kota,
            CustomerField::SalesName => &mut self.sales_name,
            CustomerField::Channel => &mut self.channel,
            CustomerField::Avg2023 => &mut self.avg_2023,
            CustomerField::Avg2024 => &mut self.avg_2024,
            CustomerField::Avg2025 => &mut self.avg_2025,
            CustomerField::Max => &mut self.max,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub code: String,
    pub name_product: String,
    pub hna: String,
    pub ppn: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductField {
    Code,
    NameProduct,
    Hna,
    Ppn,
}

impl RecordField for ProductField {
    fn default_columns() -> Vec<(Self, usize)> {
        vec![
            (ProductField::Code, 0),
            (ProductField::NameProduct, 1),
            (ProductField::Hna, 2),
            (ProductField::Ppn, 3),
        ]
    }

    fn fill(self) -> Fill {
        match self {
            ProductField::Ppn => Fill::EmptyWhenAbsent,
            _ => Fill::Sentinel,
        }
    }
}

impl SheetRecord for ProductRecord {
    type Field = ProductField;
    const KIND: &'static str = "product";

    fn assign(&mut self, field: ProductField, value: String) {
        match field {
            ProductField::Code => self.code = value,
            ProductField::NameProduct => self.name_product = value,
            ProductField::Hna => self.hna = value,
            ProductField::Ppn => self.ppn = value,
        }
    }
}

/// Records of one kind, in spreadsheet row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet<R> {
    records: Vec<R>,
}

impl<R> RecordSet<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }
}

impl<R> Default for RecordSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> From<Vec<R>> for RecordSet<R> {
    fn from(records: Vec<R>) -> Self {
        Self { records }
    }
}

impl<R> FromIterator<R> for RecordSet<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a, R> IntoIterator for &'a RecordSet<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl RecordSet<CustomerRecord> {
    /// First customer carrying `id`, in row order.
    pub fn find_by_customer_id(&self, id: &str) -> Option<&CustomerRecord> {
        self.records.iter().find(|customer| customer.cust_id == id)
    }
}

/// Everything the page renderer needs for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageData {
    pub customers: RecordSet<CustomerRecord>,
    pub products: RecordSet<ProductRecord>,
    pub generated_at: String,
}

impl PageData {
    pub fn find_by_customer_id(&self, id: &str) -> Option<&CustomerRecord> {
        self.customers.find_by_customer_id(id)
    }
}

/// Output of the transform phase, ready to be written.
#[derive(Debug, Clone, Default)]
pub struct RenderedCatalog {
    pub html: Option<String>,
    pub json: Option<String>,
    pub customers_csv: Option<String>,
    pub products_csv: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str, name: &str) -> CustomerRecord {
        CustomerRecord {
            cust_id: id.to_string(),
            cust_name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_find_by_customer_id_returns_first_match() {
        let customers: RecordSet<CustomerRecord> = vec![
            customer("C000", "Other"),
            customer("C001", "First"),
            customer("C001", "Second"),
        ]
        .into();

        let found = customers.find_by_customer_id("C001").unwrap();
        assert_eq!(found.cust_name, "First");
        assert!(customers.find_by_customer_id("C999").is_none());
    }

    #[test]
    fn test_customer_fields_use_config_names() {
        let field: CustomerField = serde_json::from_str("\"avg_2025\"").unwrap();
        assert_eq!(field, CustomerField::Avg2025);
        let field: CustomerField = serde_json::from_str("\"sales_name\"").unwrap();
        assert_eq!(field, CustomerField::SalesName);
    }

    #[test]
    fn test_only_ppn_is_optional() {
        assert_eq!(ProductField::Ppn.fill(), Fill::EmptyWhenAbsent);
        assert_eq!(ProductField::Hna.fill(), Fill::Sentinel);
        assert!(CustomerField::default_columns()
            .iter()
            .all(|(field, _)| field.fill() == Fill::Sentinel));
    }

    #[test]
    fn test_record_set_serializes_as_array() {
        let products: RecordSet<ProductRecord> = vec![ProductRecord::default()].into();
        let json = serde_json::to_value(&products).unwrap();
        assert!(json.is_array());
    }
}
