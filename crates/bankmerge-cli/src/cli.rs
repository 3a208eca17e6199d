use std::path::PathBuf;

use clap::Parser;

/// Extended help shown after `bankmerge --help`.
pub const AFTER_HELP: &str = "\
How merging works:
  Every *.csv file directly inside the working directory is read as one
  bank's export. Rows are renamed into the columns
    bank,date,type,amount,from,to
  and appended to result.csv in the same directory. result.csv is
  rewritten on every run and is never read back as an input.

Known banks:
  bank1.csv  dates like `Jan 05 2023`
  bank2.csv  dates like `05-01-2023`
  bank3.csv  dates like `05 Jan 2023`, amounts split into euro + cents
  Any other file keeps its `date` column exactly as written.

Working directory:
  --dir <DIR>, else $BANKMERGE_DIR, else the current directory.

Logging:
  Set RUST_LOG=info (or debug) to trace each source on stderr.
";

#[derive(Debug, Parser)]
#[command(
    name = "bankmerge",
    version,
    about = "merge per-bank transaction CSV exports into one result.csv",
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Which TYPE to use for representing the result (csv; json and xml are reserved)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub result_type: Option<String>,
    /// Directory holding the bank exports
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
    /// Emit the run report as a JSON object for machine parsing
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
