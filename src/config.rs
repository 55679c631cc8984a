use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "recipe-dash")]
#[command(about = "Interactive recipe dashboard over the healthy-diet and epicurious datasets")]
#[command(version)]
pub struct Args {
    /// Healthy-diet dataset (title, calories, rating, ...)
    #[arg(long, default_value = "epi_r.csv", env = "RECIPE_DASH_HEALTHY")]
    pub healthy: PathBuf,

    /// Epicurious dataset (Recipe_name, Cuisine_type, Protein(g), Fat(g), ...)
    #[arg(long, default_value = "All_Diets.csv", env = "RECIPE_DASH_EPICURIOUS")]
    pub epicurious: PathBuf,

    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST), env = "RECIPE_DASH_HOST")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8054, env = "RECIPE_DASH_PORT")]
    pub port: u16,

    /// Verbose logging (RUST_LOG still takes precedence)
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn default_log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}
