use anyhow::{Context, Result};
use crates::payments::mercadopago_client::DEFAULT_API_BASE_URL;

use super::{
    config_model::{BackendServer, Database, DotEnvyConfig, Jwt, MercadoPago, PublicUrls},
    stage::Stage,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: env_parse("SERVER_PORT_BACKEND", 3000)?,
        body_limit: env_parse("SERVER_BODY_LIMIT", 1)?,
        timeout: env_parse("SERVER_TIMEOUT", 30)?,
        allowed_origins: env_optional("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().trim_end_matches('/').to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
    };

    let database = Database {
        url: env_required("DATABASE_URL")?,
    };

    let jwt = Jwt {
        secret: env_required("JWT_SECRET")?,
        access_ttl_minutes: env_parse("JWT_ACCESS_TTL_MINUTES", 30)?,
        refresh_ttl_hours: env_parse("JWT_REFRESH_TTL_HOURS", 24)?,
    };

    let mercadopago = MercadoPago {
        access_token: env_optional("MP_ACCESS_TOKEN"),
        api_base_url: env_optional("MP_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        sandbox: env_parse("MP_SANDBOX", false)?,
        statement_descriptor: env_optional("MP_STATEMENT_DESCRIPTOR")
            .unwrap_or_else(|| "STOREFRONT".to_string()),
        timeout_secs: env_parse("MP_TIMEOUT_SECS", 10)?,
    };

    let public_urls = PublicUrls {
        front_url: env_optional("FRONT_URL"),
        base_url: env_optional("BASE_URL"),
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        jwt,
        mercadopago,
        public_urls,
        stage: get_stage(),
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or_default();
    Stage::try_from(stage_str.as_str()).unwrap_or_default()
}

fn env_optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_required(key: &str) -> Result<String> {
    env_optional(key).with_context(|| format!("{key} is invalid"))
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env_optional(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} is invalid")),
        None => Ok(default),
    }
}
