//! OpenAPI documentation configuration

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = "Product inventory service backed by PostgreSQL",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    )
)]
struct ServiceInfo;

/// Combined OpenAPI documentation for the Inventory API
///
/// Product routes are mounted at the root, so their paths merge in unprefixed.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = ServiceInfo::openapi();
        doc.merge(domain_products::handlers::ApiDoc::openapi());
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_includes_product_routes() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Inventory API");
        for path in ["/create", "/delete/{id}", "/get", "/update/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        assert!(doc.components.is_some());
    }
}
