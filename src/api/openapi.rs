//! OpenAPI document for the HTTP surface, served at `/openapi.json`.

use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "tinta",
        description = "Blog backend with email-verified accounts and cookie sessions"
    ),
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::users::register,
        crate::api::handlers::users::verify_email,
        crate::api::handlers::users::login,
        crate::api::handlers::posts::create,
        crate::api::handlers::posts::list,
        crate::api::handlers::posts::delete,
        crate::api::handlers::comments::create,
        crate::api::handlers::comments::list,
        crate::api::handlers::comments::delete,
    ),
    components(schemas(
        crate::api::handlers::users::RegisterRequest,
        crate::api::handlers::users::VerifyEmailRequest,
        crate::api::handlers::users::LoginRequest,
        crate::api::handlers::posts::Post,
        crate::api::handlers::posts::NewPostRequest,
        crate::api::handlers::comments::Comment,
        crate::api::handlers::comments::NewCommentRequest,
        crate::store::users::User,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "users", description = "Registration, verification, and login"),
        (name = "posts", description = "Posts"),
        (name = "comments", description = "Comments"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_all_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/health",
            "/users",
            "/verify",
            "/login",
            "/posts",
            "/users/{user_id}/posts",
            "/posts/{post_id}",
            "/posts/{post_id}/comments",
            "/posts/{post_id}/comments/{comment_id}",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }
}
