// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CustomerRepository, LeadOptionRepository, PgCustomerRepository, PgLeadOptionRepository,
        PgStaffRepository, PgUserRepository, StaffRepository, UserRepository,
    },
    services::{
        auth::AuthService,
        customer_service::CustomerService,
        lead_option_service::LeadOptionService,
        media::{CloudinaryMediaStore, MediaStore},
        notification_service::{DisabledNotifier, NotificationService, Notifier, WhatsAppNotifier},
        report_service::ReportService,
        staff_service::StaffService,
    },
};

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Pasta base; clientes e funcionários ficam em subpastas
    pub folder: String,
}

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub api_url: String,
    pub access_token: Option<String>,
    pub phone_number_id: Option<String>,
    pub template: String,
    pub language: String,
    pub default_country_code: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub http_timeout: Duration,
    pub fonts_dir: PathBuf,
    pub cloudinary: CloudinaryConfig,
    pub whatsapp: WhatsAppConfig,
    /// (email, senha) do administrador criado na inicialização
    pub bootstrap_admin: Option<(String, String)>,
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key).with_context(|| format!("{} deve ser definida", key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn or_default(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

impl Config {
    /// Lê o .env (se existir) e as variáveis de ambiente. Só é chamado no main.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let http_timeout_secs: u64 = or_default("HTTP_TIMEOUT_SECS", "30")
            .parse()
            .context("HTTP_TIMEOUT_SECS deve ser um número")?;

        let bootstrap_admin = match (optional("ADMIN_EMAIL"), optional("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some((email, password)),
            _ => None,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_addr: or_default("SERVER_ADDR", "0.0.0.0:3000"),
            http_timeout: Duration::from_secs(http_timeout_secs),
            fonts_dir: PathBuf::from(or_default("REPORT_FONTS_DIR", "./fonts")),
            cloudinary: CloudinaryConfig {
                cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
                api_key: required("CLOUDINARY_API_KEY")?,
                api_secret: required("CLOUDINARY_API_SECRET")?,
                folder: or_default("CLOUDINARY_FOLDER", "courier"),
            },
            whatsapp: WhatsAppConfig {
                api_url: or_default("WHATSAPP_API_URL", "https://graph.facebook.com/v19.0"),
                access_token: optional("WHATSAPP_ACCESS_TOKEN"),
                phone_number_id: optional("WHATSAPP_PHONE_NUMBER_ID"),
                template: or_default("WHATSAPP_TEMPLATE", "document_delivery"),
                language: or_default("WHATSAPP_LANGUAGE", "en"),
                default_country_code: or_default("WHATSAPP_DEFAULT_COUNTRY_CODE", "91"),
            },
            bootstrap_admin,
        })
    }
}

/// As implementações concretas por trás de cada trait.
pub struct Backends {
    pub users: Arc<dyn UserRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub staff: Arc<dyn StaffRepository>,
    pub lead_options: Arc<dyn LeadOptionRepository>,
    pub media: Arc<dyn MediaStore>,
    pub notifier: Arc<dyn Notifier>,
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub customer_service: CustomerService,
    pub staff_service: StaffService,
    pub lead_option_service: LeadOptionService,
    pub notification_service: NotificationService,
    pub report_service: ReportService,
}

pub async fn connect_database(database_url: &str) -> anyhow::Result<PgPool> {
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?; // <-- Se falhar, retorna um Err em vez de dar panic

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(db_pool)
}

impl AppState {
    /// Monta o gráfico de dependências de produção (Postgres + Cloudinary + WhatsApp).
    pub fn new(config: &Config, db_pool: PgPool) -> anyhow::Result<Self> {
        let media = CloudinaryMediaStore::new(config.cloudinary.clone(), config.http_timeout)?;

        let notifier: Arc<dyn Notifier> = match (
            &config.whatsapp.access_token,
            &config.whatsapp.phone_number_id,
        ) {
            (Some(token), Some(phone_number_id)) => Arc::new(WhatsAppNotifier::new(
                config.whatsapp.api_url.clone(),
                token.clone(),
                phone_number_id.clone(),
                config.http_timeout,
            )?),
            _ => {
                tracing::warn!("WhatsApp não configurado: notificações desativadas");
                Arc::new(DisabledNotifier)
            }
        };

        let backends = Backends {
            users: Arc::new(PgUserRepository::new(db_pool.clone())),
            customers: Arc::new(PgCustomerRepository::new(db_pool.clone())),
            staff: Arc::new(PgStaffRepository::new(db_pool.clone())),
            lead_options: Arc::new(PgLeadOptionRepository::new(db_pool)),
            media: Arc::new(media),
            notifier,
        };

        Ok(Self::from_backends(config, backends))
    }

    pub fn from_backends(config: &Config, backends: Backends) -> Self {
        let notification_service = NotificationService::new(backends.notifier, &config.whatsapp);

        Self {
            auth_service: AuthService::new(backends.users, config.jwt_secret.clone()),
            customer_service: CustomerService::new(
                backends.customers.clone(),
                backends.media.clone(),
                notification_service.clone(),
            ),
            staff_service: StaffService::new(backends.staff.clone(), backends.media),
            lead_option_service: LeadOptionService::new(backends.lead_options),
            report_service: ReportService::new(
                backends.customers,
                backends.staff,
                config.fonts_dir.clone(),
            ),
            notification_service,
        }
    }
}
