//! Degraded-mode behavior: with no reachable spreadsheet the service runs
//! off the local CSV snapshot, reads keep working, and the analytics sinks
//! refuse politely.

use std::io::Write;
use std::path::PathBuf;

use lagobot_core::config::SheetsConfig;
use lagobot_core::{Catalog, NewOrder, TOTAL_PENDING};
use lagobot_inventory::InventoryService;

fn backup_config(csv_path: PathBuf) -> SheetsConfig {
    SheetsConfig {
        spreadsheet_id: String::new(),
        access_token: None,
        products_range: "A1:Z1000".to_string(),
        backup_csv_path: csv_path,
        timeout_secs: 5,
    }
}

fn snapshot_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp csv");
    write!(
        file,
        "referencia,nombre,precio,stock\n\
         REF-300,Refrigerador Haceb 300L,1200000,2\n\
         TV-55S,TV Samsung 55,2500000,1\n\
         LIC-02,Licuadora Oster clasica,180000,0\n"
    )
    .expect("write csv");
    file
}

#[tokio::test]
async fn unconfigured_primary_source_degrades_to_the_snapshot() {
    let file = snapshot_file();
    let service = InventoryService::connect(&backup_config(file.path().to_path_buf())).await;

    assert!(service.backup_mode());

    let results = service.search("nevera").await;
    assert_eq!(results.len(), 1);
    assert!(results[0].name.contains("Refrigerador"));
}

#[tokio::test]
async fn synonym_search_works_against_the_snapshot() {
    let file = snapshot_file();
    let service = InventoryService::connect(&backup_config(file.path().to_path_buf())).await;

    let televisor = service.search("televisor").await;
    assert_eq!(televisor.len(), 1);
    assert_eq!(televisor[0].reference, "TV-55S");

    // Same query twice returns the same sequence.
    assert_eq!(service.search("televisor").await, televisor);
}

#[tokio::test]
async fn writes_report_failure_without_raising_in_backup_mode() {
    let file = snapshot_file();
    let service = InventoryService::connect(&backup_config(file.path().to_path_buf())).await;

    assert!(!service.record_interest("5551", "nevera").await);
    assert!(
        !service
            .create_order(NewOrder {
                customer_name: "Juan Perez".to_string(),
                phone: "5551".to_string(),
                address: "Calle 10 #5".to_string(),
                product: "nevera".to_string(),
                total: TOTAL_PENDING.to_string(),
            })
            .await
    );
}

#[tokio::test]
async fn missing_snapshot_leaves_an_empty_catalog() {
    let service =
        InventoryService::connect(&backup_config(PathBuf::from("/nonexistent/inventario.csv")))
            .await;

    assert!(service.backup_mode());
    assert!(service.search("nevera").await.is_empty());
}
