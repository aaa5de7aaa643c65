//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, book_returns, books, borrow_records, fines, health, submissions, users};

/// Registers the JWT bearer scheme referenced by `security(("bearer_auth" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Shelfmark API",
        version = "1.0.0",
        description = "Library lending REST API: catalog, borrowing, returns, fines and payments"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Books
        books::list_books,
        books::list_available_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Borrowing
        borrow_records::list_borrow_records,
        borrow_records::get_borrow_record,
        borrow_records::create_borrow_record,
        // Returns
        book_returns::list_book_returns,
        book_returns::get_book_return,
        book_returns::create_book_return,
        // Fines
        fines::list_fines,
        fines::get_fine,
        // Submissions
        submissions::list_submissions,
        submissions::get_submission,
        submissions::create_submission,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Users
            crate::models::user::Role,
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Lending
            crate::models::borrow_record::BorrowRecord,
            crate::models::borrow_record::CreateBorrowRecord,
            crate::models::book_return::BookReturnDetails,
            crate::models::book_return::CreateBookReturn,
            crate::models::fine::Fine,
            crate::models::submission::Submission,
            crate::models::submission::CreateSubmission,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "books", description = "Catalog management"),
        (name = "borrow_records", description = "Borrowing"),
        (name = "book_returns", description = "Returns and fine issuance"),
        (name = "fines", description = "Overdue fines"),
        (name = "submissions", description = "Payment submissions")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
