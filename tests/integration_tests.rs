mod common;

use anyhow::Result;
use common::WorkbookBuilder;
use httpmock::prelude::*;
use sheet_catalog::config::toml_config::CompressionConfig;
use sheet_catalog::core::{PageData, PageRenderer, Pipeline};
use sheet_catalog::{CatalogConfig, CatalogError, CatalogPipeline, EtlEngine, LocalStorage};
use tempfile::TempDir;

const HEADERS: &[&str] = &[
    "BRANCH", "CUST ID", "CUST NAME", "ALAMAT", "KOTA", "SALES", "CHANNEL", "AVG 2023", "AVG 2024",
    "AVG 2025", "MAX",
];

fn joglo_workbook() -> Vec<u8> {
    WorkbookBuilder::new()
        .text_sheet(
            "Data Base",
            &[
                HEADERS,
                &["JOG", "C001", "Apotek Sehat", "Jl. Malioboro 1", "Jogja", "Budi", "GT", "10", "12", "", "15"],
                &["PWK", "C002", "Toko Obat Maju", "Jl. Solo 5", "Purworejo", "Sari", "MT"],
                &["JOG", "C001", "Duplicate Id", "", "", "", "", "", "", "", ""],
            ],
        )
        .text_sheet(
            "APL",
            &[
                &["DAFTAR HARGA APL"],
                &[],
                &["KODE APL", "PRODUK", "HNA", "PPN"],
                &["APL001", "Paracetamol", "15000"],
                &["APL002", "Amoxicillin", "22000", "11%"],
            ],
        )
        .build()
}

fn config_for(customers: &str, products: &str, output_path: &str) -> Result<CatalogConfig> {
    let content = format!(
        r#"
[page]
title = "Joglo Catalog"

[fetch]
timeout_seconds = 5

[customers]
location = "{customers}"
sheets = ["Data Base", "Database", "Sheet1", "Data"]
header_rows = 1

[products]
location = "{products}"
sheets = ["APL", "DaftarHarga"]
header_rows = 3

[load]
output_path = "{output_path}"
output_formats = ["html", "json", "csv"]
"#
    );
    Ok(CatalogConfig::from_toml_str(&content)?)
}

fn normalized(path: &std::path::Path) -> String {
    path.to_str().unwrap().replace('\\', "/")
}

#[tokio::test]
async fn test_end_to_end_from_remote_workbook() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = normalized(temp_dir.path());

    let server = MockServer::start();
    let workbook_mock = server.mock(|when, then| {
        when.method(GET).path("/joglo.xlsx");
        then.status(200)
            .header(
                "Content-Type",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            )
            .body(joglo_workbook());
    });

    let url = server.url("/joglo.xlsx");
    let config = config_for(&url, &url, &output_path)?;
    let storage = LocalStorage::new(output_path.clone());
    let engine = EtlEngine::new(CatalogPipeline::new(storage, config));

    let result = engine.run().await?;

    // Both catalogs share one download.
    workbook_mock.assert_hits(1);
    assert!(result.ends_with("/index.html"));

    let html = std::fs::read_to_string(temp_dir.path().join("index.html"))?;
    assert!(html.contains("<title>Joglo Catalog</title>"));
    assert!(html.contains("<td>Apotek Sehat</td>"));
    assert!(html.contains("<td>Paracetamol</td>"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("catalog.json"))?)?;
    assert_eq!(json["customers"].as_array().unwrap().len(), 3);
    assert_eq!(json["customers"][0]["avg_2025"], " ");
    assert_eq!(json["customers"][1]["max"], " ");
    assert_eq!(json["products"][0]["ppn"], "");
    assert_eq!(json["products"][1]["ppn"], "11%");

    let products_csv = std::fs::read_to_string(temp_dir.path().join("products.csv"))?;
    assert!(products_csv.contains("APL002,Amoxicillin,22000,11%"));
    assert!(temp_dir.path().join("customers.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_local_workbooks_and_lookup() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let workbook_path = temp_dir.path().join("jogja.xlsx");
    std::fs::write(&workbook_path, joglo_workbook())?;
    let output_path = normalized(&temp_dir.path().join("site"));
    let location = normalized(&workbook_path);

    let config = config_for(&location, &location, &output_path)?;
    let pipeline = CatalogPipeline::new(LocalStorage::new(output_path), config);

    let page = pipeline.extract().await?;

    assert_eq!(page.customers.len(), 3);
    assert_eq!(page.products.len(), 2);
    let customer = page.find_by_customer_id("C001").unwrap();
    assert_eq!(customer.cust_name, "Apotek Sehat");
    assert!(page.find_by_customer_id("C404").is_none());
    assert!(!page.generated_at.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_remote_failure_aborts_without_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = normalized(temp_dir.path());

    let server = MockServer::start();
    let failing = server.mock(|when, then| {
        when.method(GET).path("/gone.xlsx");
        then.status(500);
    });

    let url = server.url("/gone.xlsx");
    let config = config_for(&url, &url, &output_path)?;
    let engine = EtlEngine::new(CatalogPipeline::new(
        LocalStorage::new(output_path.clone()),
        config,
    ));

    let err = engine.run().await.unwrap_err();

    failing.assert();
    assert!(matches!(err, CatalogError::FetchError { .. }));
    assert_eq!(err.http_status(), 500);
    assert_eq!(err.user_friendly_message(), "Error reading catalog data");
    assert!(!temp_dir.path().join("index.html").exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_sheet_in_product_workbook() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let customers = server.mock(|when, then| {
        when.method(GET).path("/base.xlsx");
        then.status(200).body(joglo_workbook());
    });
    let products = server.mock(|when, then| {
        when.method(GET).path("/harga.xlsx");
        then.status(200).body(
            WorkbookBuilder::new()
                .text_sheet("Rekap", &[&["nothing here"]])
                .build(),
        );
    });

    let config = config_for(
        &server.url("/base.xlsx"),
        &server.url("/harga.xlsx"),
        &normalized(temp_dir.path()),
    )?;
    let pipeline = CatalogPipeline::new(LocalStorage::new(normalized(temp_dir.path())), config);

    let err = pipeline.extract().await.unwrap_err();

    customers.assert();
    products.assert();
    match err {
        CatalogError::SheetNotFound { attempted } => {
            assert_eq!(attempted, vec!["APL".to_string(), "DaftarHarga".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

struct CountingRenderer;

impl PageRenderer for CountingRenderer {
    fn render(&self, page: &PageData) -> sheet_catalog::Result<String> {
        Ok(format!(
            "customers={} products={}",
            page.customers.len(),
            page.products.len()
        ))
    }
}

#[tokio::test]
async fn test_custom_renderer_and_zip_bundle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let workbook_path = temp_dir.path().join("jogja.xlsx");
    std::fs::write(&workbook_path, joglo_workbook())?;
    let output_path = normalized(&temp_dir.path().join("out"));
    let location = normalized(&workbook_path);

    let mut config = config_for(&location, &location, &output_path)?;
    config.load.output_formats = vec!["html".to_string()];
    config.load.compression = Some(CompressionConfig {
        enabled: true,
        filename: "catalog.zip".to_string(),
    });
    let pipeline = CatalogPipeline::new(LocalStorage::new(output_path.clone()), config)
        .with_renderer(CountingRenderer);
    let engine = EtlEngine::new_with_monitoring(pipeline, true);

    let result = engine.run().await?;

    assert_eq!(result, format!("{}/catalog.zip", output_path));
    let zip_data = std::fs::read(temp_dir.path().join("out").join("catalog.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    let mut html = String::new();
    std::io::Read::read_to_string(&mut archive.by_name("index.html")?, &mut html)?;
    assert_eq!(html, "customers=3 products=2");
    Ok(())
}
