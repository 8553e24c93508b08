use crate::core::extractor::{ColumnMap, SheetExtractor};
use crate::core::source::SourceLocation;
use crate::domain::model::{CustomerField, ProductField, RecordField, SheetRecord};
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{self, Validate};
use chrono::format::{Item, StrftimeItems};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub const OUTPUT_FORMATS: [&str; 3] = ["html", "json", "csv"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub customers: SheetSourceConfig,
    pub products: SheetSourceConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchConfig {
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

/// One catalog workbook and how to read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSourceConfig {
    /// Local path or http(s) URL.
    pub location: String,
    pub sheets: Vec<String>,
    #[serde(default)]
    pub header_rows: usize,
    /// Field name to 0-based column index; unset fields keep their default column.
    pub columns: Option<BTreeMap<String, usize>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub html: Option<String>,
    pub json: Option<String>,
    pub customers_csv: Option<String>,
    pub products_csv: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_title() -> String {
    "Customer & Product Catalog".to_string()
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["html".to_string()]
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_output_formats(),
            compression: None,
            filenames: None,
        }
    }
}

impl Default for CatalogConfig {
    /// The Jogja branch layout: customer base with one header row, price list
    /// with three.
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            fetch: FetchConfig::default(),
            customers: SheetSourceConfig {
                location: "excel/jogja.xlsx".to_string(),
                sheets: names(&["Data Base", "Database", "Sheet1", "Data"]),
                header_rows: 1,
                columns: None,
            },
            products: SheetSourceConfig {
                location: "excel/harga_jogja.xlsx".to_string(),
                sheets: names(&["APL", "DaftarHarga", "Product", "Products", "Sheet2"]),
                header_rows: 3,
                columns: None,
            },
            load: LoadConfig::default(),
            monitoring: None,
        }
    }
}

impl SheetSourceConfig {
    pub fn source_location(&self) -> SourceLocation {
        SourceLocation::parse(&self.location)
    }

    /// Default column map with the configured overrides applied.
    pub fn column_map<F: RecordField>(&self) -> Result<ColumnMap<F>> {
        let mut columns: BTreeMap<F, usize> = F::default_columns().into_iter().collect();

        if let Some(overrides) = &self.columns {
            for (name, index) in overrides {
                columns.insert(parse_field::<F>(name)?, *index);
            }
        }

        let mut pairs: Vec<(F, usize)> = columns.into_iter().collect();
        pairs.sort_by_key(|(_, index)| *index);
        Ok(ColumnMap::from_pairs(pairs))
    }

    pub fn extractor<R: SheetRecord>(&self) -> Result<SheetExtractor<R>> {
        Ok(SheetExtractor::new(
            self.sheets.clone(),
            self.header_rows,
            self.column_map::<R::Field>()?,
        ))
    }

    fn validate_as(&self, section: &str) -> Result<()> {
        let location_field = format!("{}.location", section);
        if self.source_location().is_remote() {
            validation::validate_url(&location_field, &self.location)?;
        } else {
            validation::validate_path(&location_field, &self.location)?;
        }
        validation::validate_sheet_candidates(&format!("{}.sheets", section), &self.sheets)
    }
}

fn parse_field<F: RecordField>(name: &str) -> Result<F> {
    let deserializer: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
        name.into_deserializer();
    F::deserialize(deserializer).map_err(|e| CatalogError::InvalidConfigValueError {
        field: "columns".to_string(),
        value: name.to_string(),
        reason: e.to_string(),
    })
}

impl CatalogConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CatalogError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CatalogError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are kept as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            CatalogError::ConfigValidationError {
                field: "environment".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("page.title", &self.page.title)?;
        if StrftimeItems::new(&self.page.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(CatalogError::InvalidConfigValueError {
                field: "page.timestamp_format".to_string(),
                value: self.page.timestamp_format.clone(),
                reason: "Invalid strftime format".to_string(),
            });
        }

        self.customers.validate_as("customers")?;
        self.products.validate_as("products")?;
        self.customers.column_map::<CustomerField>()?;
        self.products.column_map::<ProductField>()?;

        validation::validate_path("load.output_path", &self.load.output_path)?;
        if self.load.output_formats.is_empty() {
            return Err(CatalogError::MissingConfigError {
                field: "load.output_formats".to_string(),
            });
        }
        validation::validate_choices("load.output_formats", &self.load.output_formats, &OUTPUT_FORMATS)?;

        if let Some(compression) = &self.load.compression {
            if compression.enabled {
                validation::validate_non_empty_string(
                    "load.compression.filename",
                    &compression.filename,
                )?;
            }
        }

        Ok(())
    }

    pub fn output_path(&self) -> &str {
        &self.load.output_path
    }

    pub fn wants_format(&self, format: &str) -> bool {
        self.load.output_formats.iter().any(|f| f == format)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn filenames(&self) -> FilenameConfig {
        self.load.filenames.clone().unwrap_or_default()
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
