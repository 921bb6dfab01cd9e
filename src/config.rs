use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Runtime settings, read from the command line or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "exercise-tracker", about = "Exercise tracker REST API")]
pub struct Config {
    /// Record store connection string.
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://exercise-tracker.db")]
    pub database_url: String,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory served for any path no route matches.
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    pub static_dir: PathBuf,

    /// Landing page served at `/`.
    #[arg(long, env = "INDEX_FILE", default_value = "views/index.html")]
    pub index_file: PathBuf,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The database URL with credentials and query parameters stripped,
    /// safe to write to logs and error messages.
    pub fn database_location(&self) -> String {
        let url = self.database_url.split('?').next().unwrap_or_default();
        match url.split_once("://") {
            Some((scheme, rest)) => match rest.split_once('/') {
                Some((authority, path)) => format!("{scheme}://{}/{path}", without_userinfo(authority)),
                None => format!("{scheme}://{}", without_userinfo(rest)),
            },
            None => url.to_string(),
        }
    }
}

fn without_userinfo(authority: &str) -> &str {
    authority.rsplit('@').next().unwrap_or_default()
}
