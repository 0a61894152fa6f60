use domain_inventory::{ProductsApiDoc, REPORTS_URL, ReportsApiDoc, entity};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = "Product stock, valuation and near-depletion reports"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = entity::Model::URL, api = ProductsApiDoc),
        (path = REPORTS_URL, api = ReportsApiDoc),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_nested_paths() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();

        for expected in [
            "/products",
            "/products/{id}",
            "/products/{id}/quantity",
            "/products/seed",
            "/reports/dashboard",
            "/reports/inventory",
            "/reports/near-depletion",
            "/reports/depleted",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected} in {paths:?}"
            );
        }
    }
}
