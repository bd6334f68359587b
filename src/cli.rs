use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::resource::ResourceKind;

#[derive(Parser, Debug)]
#[command(name = "cloudnav", version, about = "Terminal browser for cloud resources")]
pub struct Args {
    /// Config file (defaults to <config dir>/cloudnav/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Inventory JSON served as the cloud account
    #[arg(short, long, global = true)]
    pub inventory: Option<PathBuf>,

    /// Rows per table page
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Artificial latency for every inventory call, in milliseconds
    #[arg(long, global = true)]
    pub latency_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start at the list of resource kinds
    Browse,
    /// Open the compute instances list
    Compute,
    /// Open the container services list
    Containers,
    /// Open the networks list
    Network,
    /// Open the storage buckets list
    Storage,
    /// Open the service accounts list
    Identity,
    /// Open the billing list
    Cost,
}

impl Commands {
    /// Kind list to open on top of the root screen.
    pub const fn kind(self) -> Option<ResourceKind> {
        match self {
            Self::Browse => None,
            Self::Compute => Some(ResourceKind::Compute),
            Self::Containers => Some(ResourceKind::Containers),
            Self::Network => Some(ResourceKind::Network),
            Self::Storage => Some(ResourceKind::Storage),
            Self::Identity => Some(ResourceKind::Identity),
            Self::Cost => Some(ResourceKind::Cost),
        }
    }
}

impl Args {
    pub fn start_kind(&self) -> Option<ResourceKind> {
        self.command.and_then(Commands::kind)
    }

    /// Command-line flags take precedence over the config file.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.inventory {
            config.inventory.path = Some(path.clone());
        }
        if let Some(page_size) = self.page_size {
            config.table.page_size = page_size.max(1);
        }
        if let Some(latency_ms) = self.latency_ms {
            config.inventory.latency_ms = latency_ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_browse() {
        let args = Args::try_parse_from(["cloudnav"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.start_kind(), None);
    }

    #[test]
    fn test_subcommand_selects_kind() {
        let args = Args::try_parse_from(["cloudnav", "storage", "--page-size", "5"]).unwrap();
        assert_eq!(args.start_kind(), Some(ResourceKind::Storage));
        assert_eq!(args.page_size, Some(5));
    }

    #[test]
    fn test_flags_override_config() {
        let args =
            Args::try_parse_from(["cloudnav", "--inventory", "inv.json", "--page-size", "0"])
                .unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.inventory.path, Some(PathBuf::from("inv.json")));
        assert_eq!(config.table.page_size, 1);
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        assert!(Args::try_parse_from(["cloudnav", "databases"]).is_err());
    }
}
