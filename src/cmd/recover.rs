use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::PathBuf;

use clap::Args;
use recovery::RecoveryCoordinator;

use super::OverrideArgs;
use crate::config::Sig2RsaConfig;
use crate::error::Sig2RsaError;
use crate::record::{read_records, Report};

#[derive(Args, Clone)]
#[command(about = "recover the public keys of every signer in a JSON lines record file")]
pub struct RecoverArgs {
    #[arg(value_name = "RECORDS")]
    #[arg(
        help = r#"JSON lines record file, `-` for stdin, one record per line:
{"domain": "..", "selector": "..", "algorithm": "rsa-sha256", "data": "<base64>", "signature": "<base64>", "exponent": 65537}
the `exponent` field is optional"#
    )]
    records: PathBuf,

    #[command(flatten)]
    pub(super) overrides: OverrideArgs,

    #[arg(long, help = "groups with less records are not attempted")]
    min_group_size: Option<usize>,

    #[arg(
        short,
        long,
        help = "file to save the json report, it will output to stdout if not specified"
    )]
    ofile: Option<PathBuf>,

    #[arg(long, help = "force write if the oflile already exists")]
    force: bool,

    #[arg(long, help = "pretty print the json report")]
    pretty: bool,
}

impl RecoverArgs {
    pub fn run(&self, config: Sig2RsaConfig) -> anyhow::Result<Report> {
        let mut config = self.overrides.apply(config);
        if let Some(n) = self.min_group_size {
            config.recovery.min_group_size = n;
        }

        let records = if self.records.as_os_str() == "-" {
            read_records(std::io::stdin().lock())?
        } else {
            read_records(BufReader::new(File::open(&self.records)?))?
        };

        if records.is_empty() {
            anyhow::bail!(Sig2RsaError::EmptyRecordFile(
                self.records.display().to_string()
            ));
        }
        log::info!("loaded {} records from `{}`", records.len(), self.records.display());

        let coordinator = RecoveryCoordinator::new(config.recovery)?.with_threads(config.threads);
        let report = coordinator.recover(records)?;
        log::info!(
            "recovered {} keys, {} groups failed",
            report.keys.len(),
            report.failures.len()
        );

        Ok(Report::from(&report))
    }

    pub fn exe(self, config: Sig2RsaConfig) -> anyhow::Result<()> {
        let report = self.run(config)?;

        let mut v = if self.pretty {
            serde_json::to_vec_pretty(&report)?
        } else {
            serde_json::to_vec(&report)?
        };
        v.push(b'\n');

        if let Some(f) = self.ofile.as_ref() {
            let mut file = OpenOptions::new()
                .write(true)
                .truncate(true)
                .create_new(!(self.force && f.is_file()))
                .open(f)?;
            file.write_all(v.as_slice())?;
        } else {
            std::io::stdout().lock().write_all(v.as_slice())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::cmd::Sig2RsaCli;
    use crate::config::Sig2RsaConfig;
    use crate::error::Sig2RsaError;
    use crate::record::FailureReport;
    use clap::Parser;
    use recovery::RecoveryError;
    use std::io::Write;

    fn recover_file(name: &str, content: &str, extra: &[&str]) -> anyhow::Result<crate::record::Report> {
        let path = std::env::temp_dir().join(format!("sig2rsa-{name}-{}.jsonl", std::process::id()));
        std::fs::File::create(&path)?.write_all(content.as_bytes())?;

        let mut args = vec!["sig2rsa", "recover", path.to_str().unwrap_or_default()];
        args.extend_from_slice(extra);
        let cli = Sig2RsaCli::try_parse_from(args)?;
        let crate::cmd::Sig2RsaSubArgs::Recover(recover) = cli.cmd else {
            panic!("expect the recover command");
        };

        let report = recover.run(Sig2RsaConfig::default());
        std::fs::remove_file(&path)?;
        report
    }

    #[test]
    fn single_record_group() {
        let content = r#"{"domain":"example.org","selector":"s1","algorithm":"rsa-sha256","data":"YWJj","signature":"AAEC"}"#;
        let report = recover_file("single", content, &["-e", "3"]).unwrap();

        assert!(report.keys.is_empty());
        assert_eq!(
            report.failures,
            vec![FailureReport {
                domain: "example.org".to_string(),
                selector: "s1".to_string(),
                reason: "insufficient records: found 1, need at least 2".to_string(),
            }]
        );
    }

    #[test]
    fn rejected_inputs() {
        let err = recover_file("empty", "\n\n", &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Sig2RsaError>(),
            Some(Sig2RsaError::EmptyRecordFile(_))
        ));

        let content = r#"{"domain":"a","selector":"b","algorithm":"sha256","data":"YWJj","signature":"AAEC"}"#;
        let err = recover_file("config", content, &["-e", "4"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RecoveryError>(),
            Some(RecoveryError::InvalidConfig(_))
        ));
    }
}
