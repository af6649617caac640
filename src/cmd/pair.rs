use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use clap::Args;
use recovery::{RecoveryCoordinator, SignerId};

use super::OverrideArgs;
use crate::config::Sig2RsaConfig;
use crate::record::{read_pair, PairReport};

#[derive(Args, Clone)]
#[command(about = "recover a public key from two signed messages")]
#[command(
    long_about = r#"recover a public key from two signed messages

the input is four base64 lines: data1, signature1, data2, signature2.
both signatures are tried as sha256 and then as sha512 signatures, and
{"n_hex": "0x..", "e_hex": "0x.."} is printed, "0x0" for both if no key is found."#
)]
pub struct PairArgs {
    #[arg(value_name = "INPUT", help = "read the four lines from the file instead of stdin")]
    input: Option<PathBuf>,

    #[command(flatten)]
    overrides: OverrideArgs,
}

impl PairArgs {
    pub fn run(&self, config: Sig2RsaConfig) -> anyhow::Result<PairReport> {
        let config = self.overrides.apply(config);

        let [data1, sig1, data2, sig2] = match self.input.as_ref() {
            Some(f) => read_pair(BufReader::new(File::open(f)?))?,
            None => read_pair(std::io::stdin().lock())?,
        };

        let coordinator = RecoveryCoordinator::new(config.recovery)?.with_threads(config.threads);
        let key = coordinator.recover_pair(
            SignerId::new("stdin", "pair"),
            (data1.as_slice(), sig1.as_slice()),
            (data2.as_slice(), sig2.as_slice()),
        )?;

        match key.as_ref() {
            Some(k) => log::info!("found {k}"),
            None => log::info!("no key found"),
        }

        Ok(PairReport::from(key.as_ref()))
    }

    pub fn exe(self, config: Sig2RsaConfig) -> anyhow::Result<()> {
        let report = self.run(config)?;

        let mut out = std::io::stdout().lock();
        serde_json::to_writer(&mut out, &report)?;
        out.write_all(b"\n")?;
        out.flush()?;

        Ok(())
    }
}
