use bankmerge_client::commands::merge::{self, MergeRunOptions};
use bankmerge_client::{ClientResult, SuccessEnvelope};

use crate::cli::Cli;

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    merge::run_with_options(MergeRunOptions {
        format: cli.result_type.clone(),
        dir_override: cli.dir.as_deref(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::dispatch;
    use crate::cli::parse_from;

    #[test]
    fn dispatches_merge_into_requested_dir() {
        let temp = tempdir();
        assert!(temp.is_ok());
        if let Ok(dir) = temp {
            let dir_arg = dir.path().display().to_string();
            let parsed = parse_from(["bankmerge", "--dir", dir_arg.as_str()]);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                let response = dispatch(&cli);
                assert!(response.is_ok());
                if let Ok(success) = response {
                    assert_eq!(success.command, "merge");
                }
            }
            assert!(fs::metadata(dir.path().join("result.csv")).is_ok());
        }
    }

    #[test]
    fn unknown_type_surfaces_as_client_error() {
        let temp = tempdir();
        assert!(temp.is_ok());
        if let Ok(dir) = temp {
            let dir_arg = dir.path().display().to_string();
            let parsed = parse_from(["bankmerge", "--dir", dir_arg.as_str(), "-t", "yaml"]);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                let response = dispatch(&cli);
                assert!(response.is_err());
                if let Err(error) = response {
                    assert_eq!(error.code, "invalid_argument");
                }
            }
        }
    }
}
