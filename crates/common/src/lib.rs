use clap::Parser;
use database::Database;

pub mod auth;
pub mod extract;
pub mod money;
pub mod testing;
pub mod validation;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:finance.db")]
    pub database_url: String,

    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Mark the session cookie Secure (enable behind HTTPS)
    #[arg(long, env = "SESSION_SECURE", default_value_t = false)]
    pub session_secure: bool,

    /// Trailing window, in days, used by the spending report
    #[arg(long, env = "ANALYTICS_WINDOW_DAYS", default_value = "90")]
    pub analytics_window_days: u32,
}
