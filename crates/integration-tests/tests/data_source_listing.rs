//! Data source name maps read back from a real case database

use std::sync::Arc;

use casebook_core::application::{Case, CaseManager, DataSourceLoader};
use casebook_core::domain::{Content, DeviceId};
use casebook_core::error::AppError;
use casebook_core::port::CaseDatabase;
use casebook_infra_sqlite::{open_case_database, SqliteCaseDatabase};

async fn add_image(database: &SqliteCaseDatabase, paths: &[&str]) -> Content {
    let paths: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
    let mut tx = database.begin_transaction().await.unwrap();
    let content = tx
        .add_image_data_source(&DeviceId::new("img-device").unwrap(), &paths, "+00:00", 0)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    content
}

async fn add_logical(database: &SqliteCaseDatabase, name: Option<&str>) -> Content {
    let mut tx = database.begin_transaction().await.unwrap();
    let content = tx
        .add_local_files_data_source(&DeviceId::new("lf-device").unwrap(), name, "+00:00", 0)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    content
}

#[tokio::test]
async fn test_maps_cover_logical_and_image_sources() {
    let dir = tempfile::tempdir().unwrap();
    let database = Arc::new(open_case_database(dir.path()).await.unwrap());
    let cases = Arc::new(CaseManager::new());
    cases.open(Case::new("listing", dir.path(), database.clone()));

    let logical = add_logical(&database, Some("Phone Dump")).await;
    let image = add_image(
        &database,
        &["/evidence/disk.E01", "/evidence/disk.E02", "/evidence/disk.E03"],
    )
    .await;
    let windows_image = add_image(&database, &["C:\\cases\\usb.dd"]).await;

    let loader = DataSourceLoader::new(cases.clone());

    let short = loader.data_source_map().await.unwrap();
    assert_eq!(short.len(), 3);
    assert_eq!(short[&logical.object_id], "Phone Dump");
    assert_eq!(short[&image.object_id], "disk.E01");
    assert_eq!(short[&windows_image.object_id], "usb.dd");

    let full = loader.full_path_data_source_map().await.unwrap();
    assert_eq!(full[&logical.object_id], "Phone Dump");
    assert_eq!(full[&image.object_id], "/evidence/disk.E01");
    assert_eq!(full[&windows_image.object_id], "C:\\cases\\usb.dd");
}

#[tokio::test]
async fn test_maps_survive_reopening_the_case() {
    let dir = tempfile::tempdir().unwrap();
    let logical_id = {
        let database = open_case_database(dir.path()).await.unwrap();
        let content = add_logical(&database, None).await;
        database.pool().close().await;
        content.object_id
    };

    let database = Arc::new(open_case_database(dir.path()).await.unwrap());
    let cases = Arc::new(CaseManager::new());
    cases.open(Case::new("listing", dir.path(), database));

    let map = DataSourceLoader::new(cases).data_source_map().await.unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map[&logical_id], "LogicalFileSet1");
}

#[tokio::test]
async fn test_empty_case_yields_empty_map() {
    let dir = tempfile::tempdir().unwrap();
    let database = Arc::new(open_case_database(dir.path()).await.unwrap());
    let cases = Arc::new(CaseManager::new());
    cases.open(Case::new("listing", dir.path(), database));

    let loader = DataSourceLoader::new(cases);
    assert!(loader.data_source_map().await.unwrap().is_empty());
    assert!(loader.full_path_data_source_map().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_no_open_case_is_an_error() {
    let loader = DataSourceLoader::new(Arc::new(CaseManager::new()));
    let err = loader.data_source_map().await.unwrap_err();
    assert!(matches!(err, AppError::NoCurrentCase));
}
