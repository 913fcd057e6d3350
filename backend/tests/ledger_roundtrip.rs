//! End-to-end: ledger file on disk to cleaned CSV on disk.

use chrono::NaiveDate;
use ledgerflat::{parse_csv_file, CellValue, Session, WarningKind};
use std::fs;

const LEDGER: &str = "\
Date,Type,Buy Amount,Buy Currency,Sell Amount,Sell Currency,Fee Amount,Fee Currency,Tx Hash,Link,Comment
3/14/2021,TRADE,\"0.5\n0.25\",\"BTC\nETH\",1000000,JPY,500,JPY,0xAAA,https://explorer.example/tx/0xAAA,\"split, two legs\"
3/15/2021,BUY,2,XRP,,,,,0xBBB,https://explorer.example/tx/0xBBB,
,,,,,,,,,,
12/1/2021,TRADE,\"1\n2\n3\",\"A\nB\",300,JPY,9,JPY,0xCCC,,\"say \"\"hi\"\"\"
";

fn write_ledger(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("ledger.csv");
    fs::write(&path, LEDGER).unwrap();
    path
}

#[test]
fn expands_and_exports_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parse_csv_file(write_ledger(&dir)).unwrap();
    assert_eq!(parsed.data_row_count(), 4);

    let result = Session::default().on_drop(&parsed.rows);
    let session = &result.session;

    // 2 + 1 + 0 (blank row) + 3
    assert_eq!(session.records.len(), 6);

    let ids: Vec<&str> = session.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["0xAAA", "0xAAA_1", "0xBBB", "0xCCC", "0xCCC_1", "0xCCC_2"]);

    // Sell total apportioned across both legs, fee only on the first.
    assert_eq!(session.records[0].get("sellAmount"), Some(&CellValue::Number(500000.0)));
    assert_eq!(session.records[1].get("sellAmount"), Some(&CellValue::Number(500000.0)));
    assert_eq!(session.records[0].get("feeAmount"), Some(&CellValue::from("500")));
    assert_eq!(session.records[1].get("feeAmount"), Some(&CellValue::from("")));
    assert_eq!(session.records[0].get("date"), Some(&CellValue::from("2021/3/14")));

    // Third row: buy currency has two lines for a three-line row.
    assert_eq!(session.records[5].get("buyCurrency"), Some(&CellValue::from("")));
    assert_eq!(session.records[5].get("sellAmount"), Some(&CellValue::Number(100.0)));
    assert!(result.warnings.iter().any(|w| w.row == 4
        && w.field == "buyCurrency"
        && w.kind == WarningKind::MissingSegment { segments: 2, expected: 3 }));

    let timestamp = NaiveDate::from_ymd_opt(2022, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    let file = session.export(timestamp).unwrap();
    assert_eq!(file.filename, "20220102030405formatted.csv");

    let path = file.write_to_dir(dir.path()).unwrap();
    let bytes = fs::read(path).unwrap();
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);

    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(
        lines[0],
        "Date,Type,Buy Amount,Buy Currency,Sell Amount,Sell Currency,Fee Amount,Fee Currency,Tx Hash,Link,Comment"
    );
    assert_eq!(
        lines[1],
        "2021/3/14,TRADE,0.5,BTC,500000,JPY,500,JPY,0xAAA,https://explorer.example/tx/0xAAA,\"split, two legs\""
    );
    assert_eq!(
        lines[2],
        "2021/3/14,TRADE,0.25,ETH,500000,JPY,,,0xAAA,https://explorer.example/tx/0xAAA,\"split, two legs\""
    );
    assert_eq!(lines[3], "2021/3/15,BUY,2,XRP,,,,,0xBBB,https://explorer.example/tx/0xBBB,");
    // Inner quotes force quoting even without a comma.
    assert_eq!(lines[4], "2021/12/1,TRADE,1,A,100,JPY,9,JPY,0xCCC,,\"say \"\"hi\"\"\"");
    assert_eq!(lines.len(), 7);
}

#[test]
fn failed_drop_keeps_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parse_csv_file(write_ledger(&dir)).unwrap();
    let session = Session::default().on_drop(&parsed.rows).session;

    let bad = dir.path().join("empty.csv");
    fs::write(&bad, "").unwrap();
    assert!(parse_csv_file(&bad).is_err());
    assert!(session.on_drop_bytes(b"").is_err());

    assert_eq!(session.records.len(), 6);
}
