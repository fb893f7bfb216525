const INSECURE_PLACEHOLDER: &str = "CHANGE_ME_SIGNING_KEY";

#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Symmetric key for bearer-token signing. Process-wide, fixed at
    /// startup, injected into the token issuer — never read elsewhere.
    pub signing_key: String,
    /// Lifetime of tokens issued by the login flow, in minutes.
    /// Set via DATADECK_TOKEN_TTL_MIN. Default: 30.
    pub token_ttl_minutes: i64,
    /// Bcrypt cost factor for password hashing.
    /// Set via DATADECK_BCRYPT_COST. Default: bcrypt's recommended cost.
    pub bcrypt_cost: u32,
    /// Origin allowed by CORS in addition to localhost.
    /// Set via DASHBOARD_ORIGIN. Default: http://localhost:3000.
    pub dashboard_origin: String,
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let signing_key =
        std::env::var("DATADECK_SIGNING_KEY").unwrap_or_else(|_| INSECURE_PLACEHOLDER.into());

    if signing_key == INSECURE_PLACEHOLDER {
        let env_mode = std::env::var("DATADECK_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        if env_mode == "production" {
            anyhow::bail!(
                "DATADECK_SIGNING_KEY is still the insecure placeholder. \
                 Set a proper random key before running in production."
            );
        }
        eprintln!("⚠️  DATADECK_SIGNING_KEY is not set — using insecure placeholder. Set a random key for production.");
    }

    Ok(Config {
        port: std::env::var("DATADECK_PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .unwrap_or(8080),
        database_url: std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/datadeck".into()),
        signing_key,
        token_ttl_minutes: std::env::var("DATADECK_TOKEN_TTL_MIN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30),
        bcrypt_cost: std::env::var("DATADECK_BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(crate::auth::password::DEFAULT_COST),
        dashboard_origin: std::env::var("DASHBOARD_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".into()),
    })
}
