use std::fs;
use std::path::Path;

use bankmerge_client::commands::merge::{self, MergeRunOptions};
use bankmerge_client::contracts::envelope::failure_from_error;
use serde_json::Value;
use tempfile::tempdir;

const HEADER: &str = "bank,date,type,amount,from,to";

const BANK1: &str = "timestamp,transaction,amounts,from,to\n\
Jan 05 2023,withdrawal,100,Alice,Bob\n\
Feb 11 2023,deposit,250,Bob,Alice\n";

const BANK2: &str = "date_readable,type,amount,from,to\n\
05-01-2023,deposit,75,Carol,Dave\n";

const BANK3: &str = "date,type,euro,cents,from,to\n\
01 Mar 2023,transfer,12,5,Erin,Frank\n\
02 Mar 2023,withdrawal,3,99,Frank,Erin\n";

fn write_file(path: &Path, body: &str) {
    let result = fs::write(path, body);
    assert!(result.is_ok());
}

fn run_merge(dir: &Path, format: Option<&str>) -> bankmerge_client::ClientResult<Value> {
    merge::run_with_options(MergeRunOptions {
        format: format.map(std::string::ToString::to_string),
        dir_override: Some(dir),
    })
    .and_then(|envelope| {
        serde_json::to_value(envelope).map_err(|error| {
            bankmerge_client::ClientError::internal_serialization(&error.to_string())
        })
    })
}

fn read_result(dir: &Path) -> Vec<String> {
    let body = fs::read_to_string(dir.join("result.csv"));
    assert!(body.is_ok());
    body.unwrap_or_default()
        .lines()
        .map(std::string::ToString::to_string)
        .collect()
}

fn seed_all_banks(dir: &Path) {
    write_file(&dir.join("bank1.csv"), BANK1);
    write_file(&dir.join("bank2.csv"), BANK2);
    write_file(&dir.join("bank3.csv"), BANK3);
}

#[test]
fn merges_all_known_banks_in_name_order() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        seed_all_banks(dir.path());
        write_file(&dir.path().join("README.txt"), "not a statement");

        let report = run_merge(dir.path(), None);
        assert!(report.is_ok());
        if let Ok(payload) = report {
            assert_eq!(payload["ok"], true);
            assert_eq!(payload["command"], "merge");
            assert_eq!(payload["data"]["format"], "csv");
            assert_eq!(payload["data"]["rows_written"], 5);
            assert_eq!(
                payload["data"]["message"],
                "You can check the result in result.csv"
            );
            assert_eq!(payload["data"]["sources"][0]["file_name"], "bank1.csv");
            assert_eq!(payload["data"]["sources"][0]["date_format"], "%b %d %Y");
            assert_eq!(payload["data"]["sources"][2]["rows_written"], 2);
        }

        assert_eq!(
            read_result(dir.path()),
            vec![
                HEADER,
                "bank1,05 Jan 2023,withdrawal,100,Alice,Bob",
                "bank1,11 Feb 2023,deposit,250,Bob,Alice",
                "bank2,05 Jan 2023,deposit,75,Carol,Dave",
                "bank3,01 Mar 2023,transfer,12.5,Erin,Frank",
                "bank3,02 Mar 2023,withdrawal,3.99,Frank,Erin",
            ]
        );
    }
}

#[test]
fn empty_directory_yields_header_only() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let report = run_merge(dir.path(), Some("CSV"));
        assert!(report.is_ok());
        if let Ok(payload) = report {
            assert_eq!(payload["data"]["rows_written"], 0);
            assert_eq!(payload["data"]["sources"], Value::Array(Vec::new()));
        }
        assert_eq!(read_result(dir.path()), vec![HEADER]);
    }
}

#[test]
fn rerun_overwrites_instead_of_appending() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        seed_all_banks(dir.path());

        assert!(run_merge(dir.path(), None).is_ok());
        let first = read_result(dir.path());

        let second_report = run_merge(dir.path(), None);
        assert!(second_report.is_ok());
        if let Ok(payload) = second_report {
            assert_eq!(payload["data"]["rows_written"], 5);
        }
        let second = read_result(dir.path());

        assert_eq!(second.len(), 6);
        assert_eq!(first, second);
    }
}

#[test]
fn unknown_bank_dates_pass_through_verbatim() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        write_file(
            &dir.path().join("credit_union.csv"),
            "date,type,amount,from,to,memo\n2023-01-05,fee,2,Gina,Bank,monthly\n",
        );

        assert!(run_merge(dir.path(), None).is_ok());
        assert_eq!(
            read_result(dir.path()),
            vec![HEADER, "credit_union,2023-01-05,fee,2,Gina,Bank"]
        );
    }
}

#[test]
fn date_mismatch_aborts_and_keeps_earlier_rows() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        write_file(&dir.path().join("bank1.csv"), BANK1);
        write_file(
            &dir.path().join("bank2.csv"),
            "date_readable,type,amount,from,to\n2023-01-05,deposit,75,Carol,Dave\n",
        );
        write_file(&dir.path().join("bank3.csv"), BANK3);

        let report = run_merge(dir.path(), None);
        assert!(report.is_err());
        if let Err(error) = report {
            assert_eq!(error.code, "date_parse_mismatch");
            let envelope = failure_from_error(&error);
            let data = envelope.data.unwrap_or_default();
            assert_eq!(data["file"], "bank2.csv");
            assert_eq!(data["row"], 1);
            assert_eq!(data["value"], "2023-01-05");
            assert_eq!(data["expected_pattern"], "%d-%m-%Y");
        }

        let partial = read_result(dir.path());
        assert_eq!(partial.len(), 3);
        assert!(partial.iter().all(|line| !line.starts_with("bank3")));
    }
}

#[test]
fn euro_source_without_cents_is_rejected() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        write_file(
            &dir.path().join("euro_bank.csv"),
            "date,type,euro,from,to\n01 Mar 2023,transfer,12,Erin,Frank\n",
        );

        let report = run_merge(dir.path(), None);
        assert!(report.is_err());
        if let Err(error) = report {
            assert_eq!(error.code, "missing_field");
            assert!(error.message.contains("cents"));
        }
        assert_eq!(read_result(dir.path()), vec![HEADER]);
    }
}

#[test]
fn unimplemented_formats_are_rejected_before_touching_output() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        seed_all_banks(dir.path());
        write_file(&dir.path().join("result.csv"), "previous run\n");

        for selector in ["json", "XML"] {
            let report = run_merge(dir.path(), Some(selector));
            assert!(report.is_err());
            if let Err(error) = report {
                assert_eq!(error.code, "unsupported_output_format");
            }
        }

        let unknown = run_merge(dir.path(), Some("parquet"));
        assert!(unknown.is_err());
        if let Err(error) = unknown {
            assert_eq!(error.code, "invalid_argument");
        }

        assert_eq!(read_result(dir.path()), vec!["previous run"]);
    }
}

#[cfg(unix)]
#[test]
fn unreadable_source_aborts_and_keeps_earlier_rows() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        write_file(&dir.path().join("bank1.csv"), BANK1);
        let linked = std::os::unix::fs::symlink(
            dir.path().join("vanished.csv.bak"),
            dir.path().join("bank2.csv"),
        );
        assert!(linked.is_ok());

        let report = run_merge(dir.path(), None);
        assert!(report.is_err());
        if let Err(error) = report {
            assert_eq!(error.code, "input_unreadable");
            assert!(error.message.contains("bank2.csv"));
        }

        assert_eq!(
            read_result(dir.path()),
            vec![
                HEADER,
                "bank1,05 Jan 2023,withdrawal,100,Alice,Bob",
                "bank1,11 Feb 2023,deposit,250,Bob,Alice",
            ]
        );
    }
}

#[test]
fn missing_directory_is_reported() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let missing = dir.path().join("statements");
        let report = run_merge(&missing, None);
        assert!(report.is_err());
        if let Err(error) = report {
            assert_eq!(error.code, "workdir_unreadable");
        }
    }
}
