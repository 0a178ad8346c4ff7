use clap::Parser;
use std::path::PathBuf;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_NUMBER"));

#[derive(Parser, Debug)]
#[command(name = "deployw", version = VERSION, about = "Trigger CI deployments and watch their badge")]
pub struct Cli {
    /// Installation parameters: TOML, or a flat JSON object (`.json`)
    #[arg(short, long, env = "DEPLOYW_CONFIG", default_value = "deployw.toml")]
    pub config: PathBuf,

    /// Badge refresh interval in seconds (overrides the config file)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Write debug logs to $XDG_STATE_HOME/deployw/debug.log
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["deployw"]).unwrap();
        assert_eq!(cli.interval, None);
        assert!(!cli.no_notify);
        assert!(!cli.verbose);
    }

    #[test]
    fn explicit_flags() {
        let cli =
            Cli::try_parse_from(["deployw", "-c", "site.json", "-i", "5", "--no-notify", "-v"])
                .unwrap();
        assert_eq!(cli.config, PathBuf::from("site.json"));
        assert_eq!(cli.interval, Some(5));
        assert!(cli.no_notify);
        assert!(cli.verbose);
    }

    #[test]
    fn zero_interval_rejected() {
        assert!(Cli::try_parse_from(["deployw", "-i", "0"]).is_err());
    }
}
