//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx},
    budget::{
        create_budget_endpoint, delete_budget_endpoint, get_edit_budget_page,
        update_budget_endpoint,
    },
    chat::chat_endpoint,
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_edit_transaction_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::EDIT_BUDGET_VIEW, get(get_edit_budget_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // HTMX and JSON routes get an alert instead of an error page when the session is missing.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::BUDGETS_API, post(create_budget_endpoint))
            .route(
                endpoints::BUDGET_API,
                put(update_budget_endpoint).delete(delete_budget_endpoint),
            )
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::TRANSACTION_API,
                put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(endpoints::CHAT_API, post(chat_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod router_tests {
    use axum::{
        http::{StatusCode, header::SET_COOKIE},
        response::IntoResponse,
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState, UserID,
        auth::{DEFAULT_COOKIE_DURATION, set_auth_cookie},
        budget::get_budgets,
        chat::ChatConfig,
        endpoints,
        pagination::PaginationConfig,
    };

    use super::build_router;

    fn get_state() -> AppState {
        AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC",
            PaginationConfig::default(),
            ChatConfig::new(None),
        )
        .unwrap()
    }

    fn session_cookie(state: &AppState, user_id: UserID) -> Cookie<'static> {
        let jar = set_auth_cookie(
            PrivateCookieJar::new(state.cookie_key.clone()),
            user_id,
            DEFAULT_COOKIE_DURATION,
        )
        .unwrap();
        let response = jar.into_response();
        let header = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();

        Cookie::parse(header).unwrap()
    }

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let server = TestServer::new(build_router(get_state()));

        let response = server.get(endpoints::ROOT).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn dashboard_requires_session() {
        let server = TestServer::new(build_router(get_state()));

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn dashboard_with_session_is_ok() {
        let state = get_state();
        let cookie = session_cookie(&state, UserID::new(1));
        let server = TestServer::new(build_router(state));

        let response = server.get(endpoints::DASHBOARD_VIEW).add_cookie(cookie).await;

        response.assert_status_ok();
        assert!(response.text().contains("Budgets"));
    }

    #[tokio::test]
    async fn api_without_session_gets_alert() {
        let server = TestServer::new(build_router(get_state()));

        let response = server
            .post(endpoints::BUDGETS_API)
            .form(&[("title", "Food"), ("amount", "100")])
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert!(response.text().contains("Your session has expired"));
    }

    #[tokio::test]
    async fn create_budget_through_router() {
        let state = get_state();
        let cookie = session_cookie(&state, UserID::new(1));
        let connection = state.db_connection.clone();
        let server = TestServer::new(build_router(state));

        let response = server
            .post(endpoints::BUDGETS_API)
            .add_cookie(cookie)
            .form(&[("title", "Food"), ("amount", "100")])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), endpoints::DASHBOARD_VIEW);
        let budgets = get_budgets(UserID::new(1), &connection.lock().unwrap()).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].title.as_ref(), "Food");
    }

    #[tokio::test]
    async fn chat_requires_session() {
        let server = TestServer::new(build_router(get_state()));

        let response = server
            .post(endpoints::CHAT_API)
            .json(&serde_json::json!({"message": "hi"}))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = TestServer::new(build_router(get_state()));

        let response = server.get("/does/not/exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn error_page_is_public() {
        let server = TestServer::new(build_router(get_state()));

        let response = server.get(endpoints::INTERNAL_ERROR_VIEW).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
