// CLI definitions using clap

use clap::Parser;

use ak_clock_sync::devices::DeviceModel;

/// Sync the on-board clock of an AK-series keyboard
#[derive(Parser)]
#[command(name = "ak-clock-sync", version, about)]
pub struct Cli {
    /// Target the AK74 (default)
    #[arg(long)]
    pub ak74: bool,

    /// Target the AK47 (clock protocol not verified yet)
    #[arg(long, conflicts_with = "ak74")]
    pub ak47: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the selected device model; no flag means AK74
    pub fn model(&self) -> DeviceModel {
        if self.ak47 {
            DeviceModel::Ak47
        } else {
            DeviceModel::Ak74
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_ak74() {
        let cli = Cli::try_parse_from(["ak-clock-sync"]).unwrap();
        assert_eq!(cli.model(), DeviceModel::Ak74);
    }

    #[test]
    fn test_explicit_flags() {
        let cli = Cli::try_parse_from(["ak-clock-sync", "--ak74"]).unwrap();
        assert_eq!(cli.model(), DeviceModel::Ak74);

        let cli = Cli::try_parse_from(["ak-clock-sync", "--ak47"]).unwrap();
        assert_eq!(cli.model(), DeviceModel::Ak47);
    }

    #[test]
    fn test_flags_conflict() {
        assert!(Cli::try_parse_from(["ak-clock-sync", "--ak74", "--ak47"]).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(Cli::try_parse_from(["ak-clock-sync", "--ak102"]).is_err());
    }
}
