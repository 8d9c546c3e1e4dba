// src/models/document.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Um arquivo já enviado ao storage de mídia.
/// O `public_id` é o identificador do provedor, usado depois para apagar o objeto remoto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
    #[schema(example = "https://res.cloudinary.com/demo/image/upload/v1/courier/staff/abc.pdf")]
    pub url: String,
    #[schema(example = "courier/staff/abc")]
    pub public_id: String,
}

/// Os dois documentos aceitos nos formulários.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    IdProof,
    AddressProof,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 2] = [DocumentKind::IdProof, DocumentKind::AddressProof];

    /// Nome do campo no formulário multipart.
    pub fn field_name(&self) -> &'static str {
        match self {
            DocumentKind::IdProof => "idProof",
            DocumentKind::AddressProof => "addressProof",
        }
    }
}
