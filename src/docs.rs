// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Customers ---
        handlers::customers::create_customer,
        handlers::customers::list_customers,
        handlers::customers::status_counts,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::customers::set_status,
        handlers::customers::notify_customer,

        // --- Staff ---
        handlers::staff::create_staff,
        handlers::staff::list_staff,
        handlers::staff::get_staff,
        handlers::staff::update_staff,
        handlers::staff::update_status,
        handlers::staff::delete_staff,

        // --- Lead Options ---
        handlers::lead_options::add_option,
        handlers::lead_options::list_options,
        handlers::lead_options::options_by_field,
        handlers::lead_options::update_option,
        handlers::lead_options::delete_option,
        handlers::lead_options::delete_many,

        // --- Notifications ---
        handlers::notifications::send_whatsapp,

        // --- Reports ---
        handlers::reports::customer_report,
        handlers::reports::staff_report,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Documents ---
            models::document::DocumentDescriptor,

            // --- Customers ---
            models::customer::RecordStatus,
            models::customer::Customer,
            models::customer::CustomerForm,
            models::customer::CustomerStatusCounts,
            models::customer::CustomerStatusAction,
            models::customer::CustomerStatusPayload,

            // --- Staff ---
            models::staff::StaffAddress,
            models::staff::StaffDocuments,
            models::staff::Staff,
            models::staff::StaffForm,
            models::staff::StaffStatusPayload,
            models::staff::StaffPage,

            // --- Lead Options ---
            models::lead_option::LeadOption,
            models::lead_option::LeadOptionPayload,
            models::lead_option::DeleteManyPayload,
            models::lead_option::DeleteManyResponse,

            // --- Notifications ---
            models::notification::SendWhatsAppPayload,
            models::notification::NotificationReceipt,

            // --- Reports ---
            models::report::ReportFormat,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Customers", description = "Cadastro de Clientes e Documentos"),
        (name = "Staff", description = "Gestão de Funcionários (somente admin)"),
        (name = "Lead Options", description = "Opções dos campos de lead do painel"),
        (name = "Notifications", description = "Envio de documentos pelo WhatsApp"),
        (name = "Reports", description = "Exportação de relatórios em PDF e CSV")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
