use super::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub jwt: Jwt,
    pub mercadopago: MercadoPago,
    pub public_urls: PublicUrls,
    pub stage: Stage,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Jwt {
    pub secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct MercadoPago {
    pub access_token: Option<String>,
    pub api_base_url: String,
    pub sandbox: bool,
    pub statement_descriptor: String,
    pub timeout_secs: u64,
}

/// Raw values; validated when a preference is built.
#[derive(Debug, Clone)]
pub struct PublicUrls {
    pub front_url: Option<String>,
    pub base_url: Option<String>,
}
