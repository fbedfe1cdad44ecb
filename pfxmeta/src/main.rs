//! pfxmeta: Command-line tool for inspecting PKCS#12 (.pfx/.p12) bundles.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "pfxmeta",
    about = "Inspect PKCS#12 (.pfx/.p12) certificate bundles without touching the private key",
    long_about = "pfxmeta decrypts PKCS#12 certificate bundles and extracts holder\n\
                  metadata: common name, organization, expiration date, serial\n\
                  number, and the Brazilian CNPJ tax identifier when present.\n\n\
                  The password is used only to decrypt the container; the private\n\
                  key inside is never extracted. All commands read from stdin when\n\
                  no file is given.",
    after_help = "EXAMPLES:\n\
                  \n  pfxmeta show cert.pfx --password senha123\
                  \n  pfxmeta show cert.pfx --askpass --json\
                  \n  pfxmeta field cnpj cert.pfx -p senha123\
                  \n  pfxmeta validate upload.bin\
                  \n  pfxmeta check 45d certs/ -p senha123 --recurse\
                  \n  pfxmeta status certs/ -p senha123 --failures-only\
                  \n  cat cert.pfx | pfxmeta show -p senha123"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display certificate metadata
    #[command(after_help = "EXAMPLES:\n\
                      \n  pfxmeta show cert.pfx -p senha123\
                      \n  pfxmeta show cert.pfx --askpass\
                      \n  pfxmeta show cert.pfx -p senha123 --json\
                      \n  cat cert.pfx | pfxmeta show")]
    Show {
        /// Certificate bundle (.pfx or .p12). Reads from stdin if omitted.
        file: Option<PathBuf>,
        /// Container password (empty when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Prompt for the password instead of passing it on the command line
        #[arg(long, conflicts_with = "password")]
        askpass: bool,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Extract a single field from the certificate metadata
    #[command(after_help = "FIELDS:\n\
                      \n  holder    Holder display name (CN, else O)\
                      \n  company   Company name with the CNPJ stripped\
                      \n  cnpj      Bare 14-digit CNPJ\
                      \n  serial    Serial number (lowercase hex)\
                      \n  issuer    Flattened issuer distinguished name\
                      \n  expires   Expiration date (ISO 8601)\
                      \n  subject   All subject attributes, one per line\
                      \n\nEXAMPLES:\n\
                      \n  pfxmeta field cnpj cert.pfx -p senha123\
                      \n  pfxmeta field expires cert.pfx -p senha123")]
    Field {
        /// Field to extract
        field: FieldName,
        /// Certificate bundle. Reads from stdin if omitted.
        file: Option<PathBuf>,
        /// Container password (empty when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Prompt for the password instead of passing it on the command line
        #[arg(long, conflicts_with = "password")]
        askpass: bool,
    },
    /// Structurally prevalidate an upload without a password (exit 0 = ok)
    #[command(after_help = "Checks only that the bytes are a well-formed DER\n\
                      structure; a file passing this check can still fail full\n\
                      parsing. Useful for rejecting wrong file types before\n\
                      asking the user for a password.")]
    Validate {
        /// File to check. Reads from stdin if omitted.
        file: Option<PathBuf>,
    },
    /// Check remaining validity (exit 0 = all pass, 1 = any failure)
    #[command(after_help = "THRESHOLD FORMAT:\n\
                      \n  Plain numbers are days. Humantime notation also works:\
                      \n  s, m/min, h/hr, d/day, w/week, month, y/year, and\
                      \n  combinations like 1w3d.\n\
                      \nEXAMPLES:\n\
                      \n  pfxmeta check 45 cert.pfx -p senha123     # 45 days\
                      \n  pfxmeta check 45d certs/ -p senha123\
                      \n  pfxmeta check 2h30m cert.pfx -p senha123")]
    Check {
        /// Minimum remaining validity (plain number = days)
        threshold: String,
        /// Certificate bundle or directory of bundles
        path: PathBuf,
        /// Container password, applied to every bundle (empty when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Prompt for the password instead of passing it on the command line
        #[arg(long, conflicts_with = "password")]
        askpass: bool,
        /// Only print failures
        #[arg(long)]
        failures_only: bool,
        /// Recurse into subdirectories
        #[arg(short, long)]
        recurse: bool,
    },
    /// Classify bundles as valid / expiring-soon / expired (exit 1 on expired)
    #[command(after_help = "A certificate is expiring-soon within 30 days of its\n\
                      expiration date.\n\
                      \nEXAMPLES:\n\
                      \n  pfxmeta status cert.pfx -p senha123\
                      \n  pfxmeta status certs/ -p senha123 --recurse")]
    Status {
        /// Certificate bundle or directory of bundles
        path: PathBuf,
        /// Container password, applied to every bundle (empty when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Prompt for the password instead of passing it on the command line
        #[arg(long, conflicts_with = "password")]
        askpass: bool,
        /// Only print failures
        #[arg(long)]
        failures_only: bool,
        /// Recurse into subdirectories
        #[arg(short, long)]
        recurse: bool,
    },
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum FieldName {
    Holder,
    Company,
    Cnpj,
    Serial,
    Issuer,
    Expires,
    Subject,
}

/// Maximum file size for certificate bundle inputs (10 MiB).
const MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => {
            if !is_pfx_path(path) {
                anyhow::bail!(
                    "Expected a .pfx or .p12 file: {}",
                    path.display()
                );
            }
            let meta = std::fs::metadata(path)
                .with_context(|| format!("Failed to stat file: {}", path.display()))?;
            if meta.len() > MAX_INPUT_BYTES {
                anyhow::bail!(
                    "File too large ({} bytes, max {} bytes): {}",
                    meta.len(),
                    MAX_INPUT_BYTES,
                    path.display()
                );
            }
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .take(MAX_INPUT_BYTES)
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// Resolve the container password from the flags. `None` means "no
/// password", which the parser treats as an empty string.
fn resolve_password(password: Option<String>, askpass: bool) -> Result<Option<String>> {
    if askpass {
        let entered = rpassword::prompt_password("Certificate password: ")
            .context("Failed to read password")?;
        Ok(Some(entered))
    } else {
        Ok(password)
    }
}

/// Parse a validity threshold using humantime format.
///
/// Plain numbers (e.g. "45") are days, matching how certificate renewal
/// windows are usually quoted. Otherwise standard humantime units apply:
/// `s`, `m`, `h`, `d`, `w`, `months`, `y`, combinations like "1w3d".
fn parse_threshold(s: &str) -> Result<Duration> {
    if s.chars().all(|c| c.is_ascii_digit()) && !s.is_empty() {
        let days: u64 = s.parse().context("Invalid threshold value")?;
        let secs = days
            .checked_mul(86_400)
            .context("Threshold out of range")?;
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).with_context(|| format!("Invalid threshold: '{s}'"))
}

/// Check if a path has a certificate bundle extension (.pfx or .p12).
fn is_pfx_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("pfx") || ext.eq_ignore_ascii_case("p12")
    )
}

/// Find all certificate bundles (.pfx, .p12) in a directory.
fn find_pfx_files(dir: &Path, recurse: bool) -> Vec<PathBuf> {
    let walker = if recurse {
        walkdir::WalkDir::new(dir)
    } else {
        walkdir::WalkDir::new(dir).max_depth(1)
    };
    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_pfx_path(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// A single result from batch processing.
struct BatchResult {
    path: String,
    pass: bool,
    detail: String,
}

/// Process bundles in parallel, printing `filename: result`.
///
/// Returns the number of failures.
fn run_batch<F>(files: &[PathBuf], failures_only: bool, op: F) -> usize
where
    F: Fn(&Path) -> BatchResult + Sync,
{
    let results: Vec<BatchResult> = files.par_iter().map(|f| op(f)).collect();

    let mut failures = 0;
    for r in &results {
        if !r.pass {
            failures += 1;
        }
        if failures_only && r.pass {
            continue;
        }
        if r.pass {
            println!("{}: {}", r.path, r.detail);
        } else {
            eprintln!("{}: {}", r.path, r.detail);
        }
    }
    failures
}

/// Collect the batch targets for a path argument: the file itself, or every
/// bundle under a directory.
fn batch_targets(path: &Path, recurse: bool) -> Result<Vec<PathBuf>> {
    if path.is_dir() {
        let files = find_pfx_files(path, recurse);
        if files.is_empty() {
            anyhow::bail!("No .pfx/.p12 files found in {}", path.display());
        }
        Ok(files)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}

fn parse_file(path: &Path, password: Option<&str>) -> Result<pfxmeta_lib::CertificateMetadata> {
    let bytes = read_input(Some(path))?;
    Ok(pfxmeta_lib::parse_certificate(&bytes, password)?)
}

fn run_show(
    file: Option<PathBuf>,
    password: Option<String>,
    askpass: bool,
    json: bool,
) -> Result<()> {
    let password = resolve_password(password, askpass)?;
    let bytes = read_input(file.as_deref())?;
    let meta = pfxmeta_lib::parse_certificate(&bytes, password.as_deref())?;
    if json {
        println!("{}", pfxmeta_lib::to_json(&meta)?);
    } else {
        print!("{}", pfxmeta_lib::display_text(&meta));
    }
    Ok(())
}

fn run_field(
    field: FieldName,
    file: Option<PathBuf>,
    password: Option<String>,
    askpass: bool,
) -> Result<()> {
    let password = resolve_password(password, askpass)?;
    let bytes = read_input(file.as_deref())?;
    let meta = pfxmeta_lib::parse_certificate(&bytes, password.as_deref())?;
    match field {
        FieldName::Holder => println!("{}", meta.holder_name),
        FieldName::Company => match &meta.company_name {
            Some(name) => println!("{}", name),
            None => anyhow::bail!("no company name recovered from this certificate"),
        },
        FieldName::Cnpj => match &meta.cnpj {
            Some(cnpj) => println!("{}", cnpj),
            None => anyhow::bail!("no CNPJ recovered from this certificate"),
        },
        FieldName::Serial => println!("{}", meta.serial_number),
        FieldName::Issuer => println!("{}", meta.issuer),
        FieldName::Expires => println!("{}", meta.expiration_date),
        FieldName::Subject => {
            for (key, value) in meta.subject.iter() {
                println!("{}: {}", key, value.unwrap_or("-"));
            }
        }
    }
    Ok(())
}

fn run_validate(file: Option<PathBuf>) -> Result<std::process::ExitCode> {
    // Prevalidation runs before any password exists, so it accepts any
    // filename and only inspects bytes.
    let bytes = match file {
        Some(path) => {
            std::fs::read(&path).with_context(|| format!("Failed to read file: {}", path.display()))?
        }
        None => read_input(None)?,
    };
    if pfxmeta_lib::is_valid_container(&bytes) {
        println!("ok");
        Ok(std::process::ExitCode::SUCCESS)
    } else {
        eprintln!("not a DER container");
        Ok(std::process::ExitCode::FAILURE)
    }
}

fn run_check(
    threshold: &str,
    path: &Path,
    password: Option<String>,
    askpass: bool,
    failures_only: bool,
    recurse: bool,
) -> Result<std::process::ExitCode> {
    let threshold = parse_threshold(threshold)?;
    let password = resolve_password(password, askpass)?;
    let files = batch_targets(path, recurse)?;

    let failures = run_batch(&files, failures_only, |file| {
        let path = file.display().to_string();
        match parse_file(file, password.as_deref()) {
            Ok(meta) => {
                let pass = pfxmeta_lib::check_expiry(&meta, threshold.as_secs());
                let detail = if pass {
                    format!("ok, expires {}", meta.expiration_date)
                } else {
                    format!("FAIL, expires {}", meta.expiration_date)
                };
                BatchResult { path, pass, detail }
            }
            Err(e) => BatchResult {
                path,
                pass: false,
                detail: format!("FAIL, {}", e),
            },
        }
    });

    if failures == 0 {
        Ok(std::process::ExitCode::SUCCESS)
    } else {
        Ok(std::process::ExitCode::FAILURE)
    }
}

fn run_status(
    path: &Path,
    password: Option<String>,
    askpass: bool,
    failures_only: bool,
    recurse: bool,
) -> Result<std::process::ExitCode> {
    let password = resolve_password(password, askpass)?;
    let files = batch_targets(path, recurse)?;
    let now = time::OffsetDateTime::now_utc();

    let failures = run_batch(&files, failures_only, |file| {
        let path = file.display().to_string();
        match parse_file(file, password.as_deref()) {
            Ok(meta) => {
                let status = pfxmeta_lib::certificate_status(&meta, now);
                let days = pfxmeta_lib::days_remaining(&meta, now);
                BatchResult {
                    path,
                    pass: status != pfxmeta_lib::CertificateStatus::Expired,
                    detail: format!("{} ({} days remaining)", status, days),
                }
            }
            Err(e) => BatchResult {
                path,
                pass: false,
                detail: format!("FAIL, {}", e),
            },
        }
    });

    if failures == 0 {
        Ok(std::process::ExitCode::SUCCESS)
    } else {
        Ok(std::process::ExitCode::FAILURE)
    }
}

fn main() -> Result<std::process::ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show {
            file,
            password,
            askpass,
            json,
        } => {
            run_show(file, password, askpass, json)?;
            Ok(std::process::ExitCode::SUCCESS)
        }
        Commands::Field {
            field,
            file,
            password,
            askpass,
        } => {
            run_field(field, file, password, askpass)?;
            Ok(std::process::ExitCode::SUCCESS)
        }
        Commands::Validate { file } => run_validate(file),
        Commands::Check {
            threshold,
            path,
            password,
            askpass,
            failures_only,
            recurse,
        } => run_check(
            &threshold,
            &path,
            password,
            askpass,
            failures_only,
            recurse,
        ),
        Commands::Status {
            path,
            password,
            askpass,
            failures_only,
            recurse,
        } => run_status(&path, password, askpass, failures_only, recurse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- parse_threshold tests ----

    #[test]
    fn plain_number_is_days() {
        assert_eq!(
            parse_threshold("45").unwrap(),
            Duration::from_secs(45 * 86_400)
        );
    }

    #[test]
    fn zero_days() {
        assert_eq!(parse_threshold("0").unwrap(), Duration::from_secs(0));
    }

    #[test]
    fn humantime_days() {
        assert_eq!(
            parse_threshold("45d").unwrap(),
            Duration::from_secs(45 * 86_400)
        );
    }

    #[test]
    fn humantime_hours() {
        assert_eq!(parse_threshold("2h").unwrap(), Duration::from_secs(7_200));
    }

    #[test]
    fn humantime_combined() {
        assert_eq!(
            parse_threshold("1w3d").unwrap(),
            Duration::from_secs(10 * 86_400)
        );
    }

    #[test]
    fn reject_empty() {
        assert!(parse_threshold("").is_err());
    }

    #[test]
    fn reject_negative() {
        assert!(parse_threshold("-45").is_err());
    }

    #[test]
    fn reject_unknown_unit() {
        assert!(parse_threshold("45x").is_err());
    }

    #[test]
    fn reject_garbage() {
        assert!(parse_threshold("soon").is_err());
    }

    // ---- is_pfx_path tests ----

    #[test]
    fn pfx_extension_accepted() {
        assert!(is_pfx_path(Path::new("cert.pfx")));
    }

    #[test]
    fn p12_extension_accepted() {
        assert!(is_pfx_path(Path::new("cert.p12")));
    }

    #[test]
    fn extensions_case_insensitive() {
        assert!(is_pfx_path(Path::new("cert.PFX")));
        assert!(is_pfx_path(Path::new("cert.P12")));
    }

    #[test]
    fn other_extensions_rejected() {
        assert!(!is_pfx_path(Path::new("cert.pem")));
        assert!(!is_pfx_path(Path::new("cert.der")));
        assert!(!is_pfx_path(Path::new("cert.txt")));
        assert!(!is_pfx_path(Path::new("README.md")));
    }

    #[test]
    fn no_extension_rejected() {
        assert!(!is_pfx_path(Path::new("cert")));
    }

    // ---- find_pfx_files tests ----

    fn fixtures_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/certs")
    }

    #[test]
    fn finds_fixture_bundles() {
        let files = find_pfx_files(&fixtures_dir(), false);
        assert!(!files.is_empty(), "should find bundles in tests/certs");
        for f in &files {
            assert!(is_pfx_path(f), "non-bundle returned: {}", f.display());
        }
    }

    #[test]
    fn results_are_sorted() {
        let files = find_pfx_files(&fixtures_dir(), false);
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn empty_dir_returns_nothing() {
        let tmp = std::env::temp_dir().join("pfxmeta_test_empty_dir");
        let _ = std::fs::create_dir(&tmp);
        let files = find_pfx_files(&tmp, false);
        assert!(files.is_empty());
        let _ = std::fs::remove_dir(&tmp);
    }
}
