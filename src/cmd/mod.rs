use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Sig2RsaConfig;

mod recover;
pub use recover::RecoverArgs;

mod pair;
pub use pair::PairArgs;

#[derive(Parser, Clone)]
#[command(name = "sig2rsa", version = env!("SIG2RSA_VERSION_INFO"))]
#[command(about = "recover RSA public keys from PKCS #1 v1.5 signatures")]
#[command(long_version = concat!(env!("SIG2RSA_VERSION_INFO"), " ", env!("SIG2RSA_GIT_INFO")))]
pub struct Sig2RsaCli {
    #[arg(
        long,
        global = true,
        help = r#"json/json5 config file, it overrides the environment variables `SIG2RSA__*`
e.g. {"threads": 4, "recovery": {"exponents": [65537, 3]}}"#
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Sig2RsaSubArgs,
}

#[derive(Subcommand, Clone)]
pub enum Sig2RsaSubArgs {
    #[command(name = "recover")]
    Recover(RecoverArgs),
    #[command(name = "pair")]
    Pair(PairArgs),
}

impl Sig2RsaCli {
    pub fn exe(self) -> anyhow::Result<()> {
        let config = Sig2RsaConfig::load(self.config.as_deref())?;

        match self.cmd {
            Sig2RsaSubArgs::Recover(a) => a.exe(config),
            Sig2RsaSubArgs::Pair(a) => a.exe(config),
        }
    }
}

/// Command line values that take precedence over the loaded configuration.
#[derive(clap::Args, Clone, Default)]
pub struct OverrideArgs {
    #[arg(short, long, help = "maximum worker threads")]
    threads: Option<usize>,

    #[arg(short, long = "exponent", value_name = "E")]
    #[arg(help = "candidate public exponent, repeatable, replaces the configured exponents")]
    exponents: Vec<u32>,

    #[arg(short, long = "bits", value_name = "BITs")]
    #[arg(help = "candidate modulus bit length, repeatable, replaces the configured lengths")]
    bit_lengths: Vec<usize>,
}

impl OverrideArgs {
    pub fn apply(&self, mut config: Sig2RsaConfig) -> Sig2RsaConfig {
        if let Some(t) = self.threads {
            config.threads = t.max(1);
        }

        if !self.exponents.is_empty() {
            config.recovery.exponents = self.exponents.clone();
        }

        if !self.bit_lengths.is_empty() {
            config.recovery.bit_lengths = self.bit_lengths.clone();
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::{Sig2RsaCli, Sig2RsaSubArgs};
    use crate::config::Sig2RsaConfig;
    use clap::Parser;

    #[test]
    fn parse() {
        let cli = Sig2RsaCli::try_parse_from([
            "sig2rsa", "recover", "records.jsonl", "-e", "3", "-e", "17", "--bits", "2048",
            "--threads", "0", "--config", "my.json",
        ])
        .unwrap();

        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("my.json")));
        let Sig2RsaSubArgs::Recover(args) = cli.cmd else {
            panic!("expect the recover command");
        };

        let config = args.overrides.apply(Sig2RsaConfig::default());
        assert_eq!(config.threads, 1);
        assert_eq!(config.recovery.exponents, vec![3, 17]);
        assert_eq!(config.recovery.bit_lengths, vec![2048]);
        assert_eq!(config.recovery.min_group_size, 2);

        assert!(Sig2RsaCli::try_parse_from(["sig2rsa", "pair", "-e", "x"]).is_err());
        assert!(Sig2RsaCli::try_parse_from(["sig2rsa"]).is_err());
    }
}
