use crate::routes::{course, enrollment, health, import, registration, root};
use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        registration::get_registration,
        registration::set_registration,
        course::get_courses,
        course::get_course_by_id,
        import::import_courses,
        enrollment::enroll,
        enrollment::enroll_manual,
        enrollment::export_enrollments
    ),
    components(schemas(crate::error::ErrorResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Registration", description = "Current term and registration window"),
        (name = "Courses", description = "Retake course catalogue and CSV import"),
        (name = "Enrollments", description = "Course registration and export"),
    ),
    info(
        title = "Retake Registration API",
        version = "1.0.0",
        description = "Retake and make-up course registration with schedule conflict checks",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_security() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/health",
            "/registration",
            "/courses",
            "/courses/{id}",
            "/courses/import",
            "/enrollments",
            "/enrollments/manual",
            "/enrollments/export",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("jwt"));
    }
}
