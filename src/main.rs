use clap::Parser;
use log::LevelFilter;
use sig2rsa::{cmd::Sig2RsaCli, log_error};

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Sig2RsaCli::parse();

    if log_error(cli.exe()).is_none() {
        std::process::exit(1);
    }
}
