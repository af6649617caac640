use std::path::Path;

use config::Config;
use recovery::RecoveryConfig;
use serde::{Deserialize, Serialize};

use crate::error::Sig2RsaError;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Sig2RsaConfig {
    // maximum worker threads
    pub threads: usize,

    pub recovery: RecoveryConfig,
}

impl Default for Sig2RsaConfig {
    fn default() -> Self {
        Self {
            threads: (num_cpus::get() >> 1).max(1),
            recovery: RecoveryConfig::default(),
        }
    }
}

impl Sig2RsaConfig {
    pub const ENV_PREFIX: &'static str = "SIG2RSA";

    /// defaults < environment (`SIG2RSA__THREADS`, `SIG2RSA__RECOVERY__EXPONENTS=3,65537`) < file
    pub fn load(f: Option<&Path>) -> Result<Self, Sig2RsaError> {
        Self::load_with_prefix(Self::ENV_PREFIX, f)
    }

    fn load_with_prefix(prefix: &str, f: Option<&Path>) -> Result<Self, Sig2RsaError> {
        let failed = |e: config::ConfigError| Sig2RsaError::LoadConfigFailed(e.to_string());

        let default_config = Config::try_from(&Sig2RsaConfig::default()).map_err(failed)?;

        let mut config = Config::builder().add_source(default_config).add_source(
            config::Environment::with_prefix(prefix)
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("recovery.exponents")
                .with_list_parse_key("recovery.bit_lengths"),
        );

        if let Some(f) = f {
            if !f.is_file() {
                return Err(Sig2RsaError::LoadConfigFailed(format!(
                    "the config file `{}` does not exist",
                    f.display()
                )));
            }
            config = config.add_source(config::File::from(f));
        }

        let mut sconfig: Sig2RsaConfig = config
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(failed)?;

        sconfig.threads = sconfig.threads.max(1);

        log::trace!("{:?}", sconfig);

        Ok(sconfig)
    }
}
