use std::net::SocketAddr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

impl Env {
    pub fn from_env() -> Self {
        match var("ENVIRONMENT") {
            Ok(Some(env)) => match env.as_str() {
                "dev" => Env::Dev,
                "staging" => Env::Staging,
                "production" => Env::Production,
                _ => Env::Dev,
            },
            _ => Env::Dev,
        }
    }
}

pub struct ServerConfig {
    pub env: Env,
    pub database_url: String,
    pub database_max_connections: usize,
    pub listen_addr: SocketAddr,
    pub site_url: String,
    /// Where unauthenticated writers are sent. Login itself lives outside
    /// this service.
    pub login_url: String,
}

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SITE_URL: &str = "http://localhost:4321";
const DEFAULT_LOGIN_URL: &str = "/auth/login";
const DEFAULT_MAX_CONNECTIONS: usize = 10;

fn var(key: &str) -> Result<Option<String>, String> {
    match std::env::var(key) {
        Ok(env) => Ok(Some(env)),
        Err(e) => match e {
            std::env::VarError::NotPresent => Ok(None),
            std::env::VarError::NotUnicode(_) => Err(format!(
                "Could not get the environment variable `{key}` due to unicode error"
            )),
        },
    }
}

fn required_var(key: &str) -> String {
    let val = var(key);
    match val {
        Ok(val) => match val {
            Some(val) => val,
            None => {
                tracing::error!("Environment variable `{key}` is required");
                std::process::exit(1)
            }
        },
        Err(e) => {
            tracing::error!(
                "Environment variable `{key}` is required, but could not retrieve: {e}"
            );
            std::process::exit(1)
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    match var(key) {
        Ok(Some(val)) => val,
        Ok(None) => {
            tracing::debug!("Environment variable `{key}` not set, using `{default}`");
            default.to_string()
        }
        Err(e) => {
            tracing::warn!("{e}, using `{default}`");
            default.to_string()
        }
    }
}

fn parsed_var_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match var(key) {
        Ok(Some(val)) => val.parse().unwrap_or_else(|_| {
            tracing::error!("Environment variable `{key}` has an invalid value `{val}`");
            std::process::exit(1)
        }),
        _ => default,
    }
}

impl ServerConfig {
    pub fn new_from_env() -> Self {
        let default_addr: SocketAddr = DEFAULT_LISTEN_ADDR
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 3000)));

        ServerConfig {
            env: Env::from_env(),
            database_url: required_var("DATABASE_URL"),
            database_max_connections: parsed_var_or(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            ),
            listen_addr: parsed_var_or("LISTEN_ADDR", default_addr),
            site_url: var_or("SITE_URL", DEFAULT_SITE_URL),
            login_url: var_or("LOGIN_URL", DEFAULT_LOGIN_URL),
        }
    }
}
