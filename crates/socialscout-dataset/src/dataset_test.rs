use socialscout_core::{Platform, TextEncoding};

use super::*;

fn sample() -> Dataset {
    Dataset::from_csv_str(
        "company_name,website_url,notes\n\
         株式会社テスト,https://test.co.jp,keep me\n\
         Acme,,\n",
    )
    .expect("valid csv")
}

#[test]
fn short_rows_are_padded_to_header_length() {
    let ds = Dataset::from_csv_str("company_name,website_url,notes\nAcme\n").unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.get(0, "notes"), Some(""));
}

#[test]
fn long_rows_keep_extra_cells_under_generated_headers() {
    let ds = Dataset::from_csv_str("company_name\nAcme,extra\n").unwrap();
    assert_eq!(ds.headers(), ["company_name", "column_2"]);
    assert_eq!(ds.get(0, "column_2"), Some("extra"));
}

#[test]
fn prepare_columns_appends_missing_platform_columns() {
    let mut ds = sample();
    let cols = Platform::Instagram.default_columns();
    ds.prepare_columns(&cols, "companies.csv").unwrap();
    assert_eq!(
        ds.headers(),
        ["company_name", "website_url", "notes", "insta_url", "insta_followers"]
    );
    assert_eq!(ds.get(1, "insta_url"), Some(""));
}

#[test]
fn prepare_columns_requires_company_name() {
    let mut ds = Dataset::from_csv_str("name,website_url\nAcme,\n").unwrap();
    let err = ds
        .prepare_columns(&Platform::X.default_columns(), "in.csv")
        .unwrap_err();
    assert!(
        matches!(err, DatasetError::MissingColumn { ref column, ref path } if column == "company_name" && path == "in.csv")
    );
}

#[test]
fn record_reads_typed_view() {
    let mut ds = sample();
    let cols = Platform::X.default_columns();
    ds.prepare_columns(&cols, "t").unwrap();
    ds.write_profile(0, &cols, "https://x.com/test", 1744);

    let record = ds.record(0, &cols).unwrap();
    assert_eq!(record.company_name, "株式会社テスト");
    assert_eq!(record.website_url.as_deref(), Some("https://test.co.jp"));
    assert_eq!(record.profile_url.as_deref(), Some("https://x.com/test"));
    assert_eq!(record.follower_count, Some(1744));

    let empty = ds.record(1, &cols).unwrap();
    assert!(empty.website_url.is_none());
    assert!(!empty.has_profile());
    assert!(ds.record(2, &cols).is_none());
}

#[test]
fn record_tolerates_float_rendered_counts() {
    let ds = Dataset::from_csv_str(
        "company_name,x_url,x_followers\nAcme,https://x.com/acme,1234.0\nBeta,https://x.com/beta,\"1,500\"\n",
    )
    .unwrap();
    let cols = Platform::X.default_columns();
    assert_eq!(ds.record(0, &cols).unwrap().follower_count, Some(1234));
    assert_eq!(ds.record(1, &cols).unwrap().follower_count, Some(1500));
}

#[test]
fn zero_follower_count_is_written() {
    let mut ds = sample();
    let cols = Platform::Tiktok.default_columns();
    ds.write_profile(1, &cols, "https://www.tiktok.com/@acme", 0);
    assert_eq!(ds.get(1, "tiktok_followers"), Some("0"));
    assert_eq!(ds.record(1, &cols).unwrap().follower_count, Some(0));
}

#[test]
fn clear_profile_empties_both_cells() {
    let mut ds = sample();
    let cols = Platform::Youtube.default_columns();
    ds.write_profile(0, &cols, "https://www.youtube.com/@test", 15_700);
    ds.clear_profile(0, &cols);
    let record = ds.record(0, &cols).unwrap();
    assert!(record.profile_url.is_none());
    assert!(record.follower_count.is_none());
}

#[test]
fn set_ignores_out_of_range_rows() {
    let mut ds = sample();
    ds.set(10, "notes", "nope");
    assert_eq!(ds.len(), 2);
}

#[test]
fn unknown_columns_survive_serialization() {
    let ds = sample();
    let csv = ds.to_csv_string().unwrap();
    assert!(csv.starts_with("company_name,website_url,notes\n"));
    assert!(csv.contains("keep me"));
}

#[test]
fn save_and_load_in_cp932() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let mut ds = sample();
    let cols = Platform::X.default_columns();
    ds.write_profile(0, &cols, "https://x.com/test", 10);
    ds.save(&path, TextEncoding::Cp932).unwrap();

    let chain = [TextEncoding::Utf8Bom, TextEncoding::Utf8, TextEncoding::Cp932];
    let loaded = Dataset::load(&path, &chain).unwrap();
    assert_eq!(loaded.encoding(), TextEncoding::Cp932);
    assert_eq!(loaded.get(0, "company_name"), Some("株式会社テスト"));
    assert_eq!(loaded.get(0, "x_followers"), Some("10"));
    assert!(!dir.path().join("out.csv.tmp").exists());
}

#[test]
fn save_with_bom_is_loaded_as_bom() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    sample().save(&path, TextEncoding::Utf8Bom).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let loaded = Dataset::load(&path, &[TextEncoding::Utf8Bom, TextEncoding::Utf8]).unwrap();
    assert_eq!(loaded.encoding(), TextEncoding::Utf8Bom);
    assert_eq!(loaded.headers()[0], "company_name");
}

#[test]
fn load_reports_every_encoding_tried() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, b"company_name\n\xFF\xFE\xFD\n").unwrap();
    let err = Dataset::load(&path, &[TextEncoding::Utf8Bom, TextEncoding::Utf8]).unwrap_err();
    assert!(matches!(err, DatasetError::Decode { ref tried, .. } if tried == "utf-8-sig, utf-8"));
}

#[test]
fn load_missing_file_is_io_error() {
    let err = Dataset::load(Path::new("/no/such/file.csv"), &[TextEncoding::Utf8]).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}
