use std::time::Duration;

use clap::Parser;

use crate::banner::BannerTimings;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:7890/api";

/// Terminal client for the todo list.
#[derive(Parser, Clone, Debug)]
#[command(version, about)]
pub struct Config {
    /// Root of the todo API, without the `/todos/` part.
    #[arg(long, env = "TODOS_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// How long success messages stay up, in milliseconds.
    #[arg(long, default_value_t = 3000)]
    pub success_banner_ms: u64,

    /// How long error messages stay up, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub error_banner_ms: u64,
}

impl Config {
    pub fn banner_timings(&self) -> BannerTimings {
        BannerTimings {
            success: Duration::from_millis(self.success_banner_ms),
            error: Duration::from_millis(self.error_banner_ms),
        }
    }
}
