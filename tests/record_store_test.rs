//! Tests for the CSV record store

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use masjid_roster::application::ApplicationError;
use masjid_roster::domain::{MemberFields, MemberRecord};
use masjid_roster::infrastructure::store::{
    decode_csv, encode_csv, CsvRecordStore, RecordStore, CSV_HEADER,
};
use masjid_roster::infrastructure::traits::RealFileSystem;

const HEADER_LINE: &str = "ID,Nama,Jabatan,Divisi,Gaji,Telepon,Tanggal_Bergabung";

fn store_at(temp: &TempDir, name: &str) -> CsvRecordStore {
    CsvRecordStore::new(Arc::new(RealFileSystem), temp.path().join(name))
}

fn sample() -> Vec<MemberRecord> {
    vec![
        MemberRecord::new(
            1,
            MemberFields::new("Ali", "Ketua", "Takmir", 5_000_000, "0811"),
            "2024-01-02",
        ),
        MemberRecord::new(
            3,
            MemberFields::new("Siti, S.Pd", "Wakil Ketua", "Pendidikan", 0, ""),
            "2024-02-03",
        ),
    ]
}

#[test]
fn given_missing_file_when_loading_then_empty_table() {
    let temp = TempDir::new().unwrap();
    let store = store_at(&temp, "absent.csv");

    let table = store.load().unwrap();

    assert!(table.is_empty());
}

#[test]
fn given_saved_table_when_loading_then_same_rows_in_order() {
    let temp = TempDir::new().unwrap();
    let store = store_at(&temp, "data.csv");

    store.save(&sample()).unwrap();
    let table = store.load().unwrap();

    assert_eq!(table, sample());
}

#[test]
fn given_leading_zero_phone_when_round_tripping_then_preserved() {
    let temp = TempDir::new().unwrap();
    let store = store_at(&temp, "data.csv");

    store.save(&sample()).unwrap();

    assert_eq!(store.load().unwrap()[0].phone, "0811");
}

#[test]
fn given_empty_table_when_saving_then_header_only() {
    let temp = TempDir::new().unwrap();
    let store = store_at(&temp, "data.csv");

    store.save(&[]).unwrap();

    let content = fs::read_to_string(store.path()).unwrap();
    assert_eq!(content, format!("{HEADER_LINE}\n"));
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn given_existing_file_when_saving_then_fully_overwritten() {
    let temp = TempDir::new().unwrap();
    let store = store_at(&temp, "data.csv");
    store.save(&sample()).unwrap();

    store.save(&sample()[..1]).unwrap();

    let content = fs::read_to_string(store.path()).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert_eq!(store.load().unwrap(), sample()[..1].to_vec());
}

#[test]
fn given_nested_path_when_saving_then_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let store = store_at(&temp, "nested/dir/data.csv");

    store.save(&sample()).unwrap();

    assert!(store.path().exists());
}

#[test]
fn given_hand_written_csv_when_loading_then_parses_rows() {
    let temp = TempDir::new().unwrap();
    let store = store_at(&temp, "data.csv");
    fs::write(
        store.path(),
        format!("{HEADER_LINE}\n7,Umar,Bendahara,Sosial,2500000,0813,2023-12-31\n"),
    )
    .unwrap();

    let table = store.load().unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table[0].id, 7);
    assert_eq!(table[0].role, "Bendahara");
    assert_eq!(table[0].amount, 2_500_000);
    assert_eq!(table[0].join_date, "2023-12-31");
}

#[test]
fn given_non_numeric_amount_when_loading_then_csv_error() {
    let temp = TempDir::new().unwrap();
    let store = store_at(&temp, "data.csv");
    fs::write(
        store.path(),
        format!("{HEADER_LINE}\n1,Ali,Ketua,Takmir,banyak,0811,2024-01-01\n"),
    )
    .unwrap();

    let result = store.load();

    assert!(matches!(result, Err(ApplicationError::Csv { .. })));
}

#[test]
fn given_short_row_when_decoding_then_csv_error() {
    let content = format!("{HEADER_LINE}\n1,Ali,Ketua\n");

    let result = decode_csv(&content, std::path::Path::new("inline"));

    assert!(matches!(result, Err(ApplicationError::Csv { .. })));
}

#[test]
fn given_field_with_comma_when_encoding_then_quoted() {
    let encoded = encode_csv(&sample()).unwrap();

    assert!(encoded.starts_with(&CSV_HEADER.join(",")));
    assert!(encoded.contains("\"Siti, S.Pd\""));
}
