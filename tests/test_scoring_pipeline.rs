//! End-to-end tests: ledger file → features → scores → persisted tables
//!
//! Covers:
//! - JSON array and JSONL ledgers through the loader
//! - Malformed records dropped without aborting the run
//! - CSV and SQLite backends writing the same score table

#[cfg(test)]
mod scoring_pipeline_tests {
    use lendscore::ingest::TransactionLoader;
    use lendscore::persistence::{BackendType, ScoreWriter};
    use lendscore::report::ScoreDistribution;
    use lendscore::run_pipeline;
    use rusqlite::Connection;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const LEDGER: &str = r#"[
        {"userWallet": "0xAAA", "txHash": "0x01", "timestamp": 1629178166, "blockNumber": 1629178166,
         "action": "deposit", "protocol": "aave_v2",
         "actionData": {"amount": "1000000000", "assetSymbol": "USDC"}},
        {"userWallet": "0xbbb", "txHash": "0x02", "timestamp": 1629178166, "blockNumber": 1629178167,
         "action": "deposit", "protocol": "aave_v2",
         "actionData": {"amount": "100000000", "assetSymbol": "USDC"}},
        {"userWallet": "0xbbb", "txHash": "0x03", "timestamp": 1629181766, "blockNumber": 1629178168,
         "action": "borrow", "protocol": "aave_v2",
         "actionData": {"amount": "90000000", "assetSymbol": "USDC"}},
        {"userWallet": "0xbbb", "txHash": "0x04", "timestamp": 1629185366, "blockNumber": 1629178169,
         "action": "repay", "protocol": "aave_v2",
         "actionData": {"amount": "90000000", "assetSymbol": "USDC"}},
        {"userWallet": "0xccc", "txHash": "0x05", "timestamp": "not a time",
         "action": "deposit", "actionData": {"amount": "5"}}
    ]"#;

    fn ledger_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_ledger_to_csv() {
        let file = ledger_file(LEDGER);
        let loaded = TransactionLoader::new(file.path()).load().await.unwrap();

        // Unparsable timestamp drops 0xccc
        assert_eq!(loaded.stats.total_records, 5);
        assert_eq!(loaded.stats.accepted, 4);
        assert_eq!(loaded.stats.dropped, 1);
        assert_eq!(loaded.stats.unique_wallets, 2);

        let output = run_pipeline(&loaded.records).unwrap();
        assert_eq!(output.features.len(), 2);
        assert_eq!(output.scores.get("0xaaa"), Some(0.0));
        assert_eq!(output.scores.get("0xbbb"), Some(1000.0));

        let distribution = ScoreDistribution::from_scores(&output.scores);
        assert_eq!(distribution.count("0-99"), Some(1));
        assert_eq!(distribution.count("900-999"), Some(1));

        let out_dir = TempDir::new().unwrap();
        let mut writer = ScoreWriter::new(BackendType::Csv, out_dir.path()).unwrap();
        writer.write_all(&output.scores, &distribution).await.unwrap();

        let mut reader =
            csv::Reader::from_path(out_dir.path().join("wallet_credit_scores.csv")).unwrap();
        let rows: Vec<(String, f64)> = reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[1].parse().unwrap())
            })
            .collect();
        assert_eq!(rows, vec![("0xaaa".to_string(), 0.0), ("0xbbb".to_string(), 1000.0)]);

        let mut reader =
            csv::Reader::from_path(out_dir.path().join("score_distribution.csv")).unwrap();
        let total: usize = reader
            .records()
            .map(|r| r.unwrap()[1].parse::<usize>().unwrap())
            .sum();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_jsonl_ledger_to_sqlite() {
        let jsonl = concat!(
            r#"{"userWallet": "0x1", "timestamp": 1700000000, "action": "deposit", "actionData": {"amount": "10", "assetSymbol": "DAI"}}"#,
            "\n",
            "garbage line\n",
            r#"{"userWallet": "0x2", "timestamp": 1700000000, "action": "deposit", "actionData": {"amount": "20", "assetSymbol": "DAI"}}"#,
            "\n",
            r#"{"userWallet": "0x3", "timestamp": 1700000000, "action": "deposit", "actionData": {"amount": "30", "assetSymbol": "DAI"}}"#,
            "\n",
        );
        let file = ledger_file(jsonl);
        let loaded = TransactionLoader::new(file.path()).load().await.unwrap();
        assert_eq!(loaded.records.len(), 3);

        let output = run_pipeline(&loaded.records).unwrap();
        let distribution = ScoreDistribution::from_scores(&output.scores);

        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("scores.db");
        let mut writer = ScoreWriter::new(BackendType::Sqlite, &db_path).unwrap();
        writer.write_all(&output.scores, &distribution).await.unwrap();
        assert_eq!(writer.backend_type(), "SQLite");

        let conn = Connection::open(&db_path).unwrap();
        let scores: Vec<(String, f64)> = conn
            .prepare("SELECT wallet, credit_score FROM wallet_scores ORDER BY wallet")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0], ("0x1".to_string(), 0.0));
        assert!((scores[1].1 - 500.0).abs() < 1e-9);
        assert_eq!(scores[2], ("0x3".to_string(), 1000.0));

        let bucket_total: i64 = conn
            .query_row("SELECT SUM(wallet_count) FROM score_distribution", [], |row| row.get(0))
            .unwrap();
        assert_eq!(bucket_total, 3);
    }

    #[tokio::test]
    async fn test_empty_ledger_fails_scoring() {
        let file = ledger_file("[]");
        let loaded = TransactionLoader::new(file.path()).load().await.unwrap();

        assert!(loaded.records.is_empty());
        assert!(run_pipeline(&loaded.records).is_err());
    }
}
