use axum::{
    Router,
    http::{
        HeaderName, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, state::SharedState};

/// Module guard routes.
pub mod access;
/// Login, session and logout routes.
pub mod auth;
/// OpenAPI document and Swagger UI.
pub mod docs;
/// Risk engine routes.
pub mod engine;
/// ESG compliance score routes.
pub mod esg;
/// Health check route.
pub mod health;
/// ESG data ingest routes.
pub mod ingest;
/// Wellbeing invitation route.
pub mod invitation;
/// King IV calculator route.
pub mod king_iv;
/// Staff password reset route.
pub mod password;
/// Behavioural risk profile routes.
pub mod risk;
/// Wellbeing risk calculator route.
pub mod wellbeing;
/// WhatsApp relay route.
pub mod whatsapp;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(risk::router())
        .merge(esg::router())
        .merge(whatsapp::router())
        .merge(password::router())
        .merge(auth::router())
        .merge(access::router())
        .merge(engine::router())
        .merge(wellbeing::router())
        .merge(invitation::router())
        .merge(king_iv::router())
        .merge(ingest::router());

    let docs_router = docs::router(state.clone());

    api_router
        .merge(docs_router)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .with_state(state)
}

/// Full HTTP application: routes plus CORS and request tracing.
pub fn app(state: SharedState) -> Router<()> {
    router(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Browser clients call from any origin; preflight requests are answered with
/// an empty `200`.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn not_found() -> AppError {
    AppError::not_found("Not Found")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use futures::future::BoxFuture;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            database::Database,
            memory::{MemoryAuth, MemoryDatabase},
            query::Query,
        },
        messaging::{MessagingError, SendOutcome, TwilioCredentials, WhatsAppGateway},
        state::AppState,
    };

    struct OfflineGateway;

    impl WhatsAppGateway for OfflineGateway {
        fn send(
            &self,
            _credentials: &TwilioCredentials,
            _to: &str,
            _body: &str,
        ) -> BoxFuture<'static, Result<SendOutcome, MessagingError>> {
            Box::pin(async { Ok(SendOutcome::failed("offline")) })
        }
    }

    /// Accepts every message with a fixed provider id.
    struct AcceptingGateway;

    impl WhatsAppGateway for AcceptingGateway {
        fn send(
            &self,
            _credentials: &TwilioCredentials,
            _to: &str,
            _body: &str,
        ) -> BoxFuture<'static, Result<SendOutcome, MessagingError>> {
            Box::pin(async { Ok(SendOutcome::sent(Some("SM123".into()))) })
        }
    }

    struct Harness {
        db: MemoryDatabase,
        auth: MemoryAuth,
        state: SharedState,
        app: Router,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_gateway(Arc::new(OfflineGateway), AppConfig::default())
        }

        fn with_gateway(gateway: Arc<dyn WhatsAppGateway>, config: AppConfig) -> Self {
            let db = MemoryDatabase::new();
            let auth = MemoryAuth::new();
            let state = AppState::new(Arc::new(db.clone()), Arc::new(auth.clone()), gateway, config);
            Self {
                db,
                auth,
                app: app(state.clone()),
                state,
            }
        }

        /// Register an auth account backed by a `users` row and return its token.
        fn sign_up(&self, id: &str, email: &str, row: Value) -> String {
            self.auth.register(id, email, "secret-password");
            let mut row = row;
            row["id"] = json!(id);
            row["email"] = json!(email);
            self.db.seed("users", [row]);
            self.auth.issue_token(email).unwrap()
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, body)
        }

        async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
            let mut request = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
            if let Some(token) = token {
                request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            self.send(request.body(Body::from(body.to_string())).unwrap())
                .await
        }

        async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
            let mut request = Request::get(uri);
            if let Some(token) = token {
                request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            self.send(request.body(Body::empty()).unwrap()).await
        }
    }

    #[tokio::test]
    async fn risk_profile_is_echoed_with_generated_fields() {
        let harness = Harness::new();
        let (status, body) = harness
            .post(
                "/bri-risk-score",
                None,
                json!({"player_id": "p1", "risk_score": 72, "risk_level": "high"}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["profile"]["player_id"], "p1");
        assert!(body["profile"]["id"].is_string());
        assert!(body["profile"]["analyzed_at"].is_string());

        let (status, body) = harness.get("/bri-risk-score/p1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["latestScore"], 72.0);
        assert_eq!(body["latestLevel"], "high");
    }

    #[tokio::test]
    async fn get_without_id_is_method_not_allowed() {
        let harness = Harness::new();
        let (status, body) = harness.get("/bri-risk-score", None).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn whatsapp_send_names_missing_field() {
        let harness = Harness::new();
        let (status, body) = harness
            .post(
                "/integration-whatsapp-send",
                None,
                json!({"casino_id": "c1", "message": "hello"}),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required field: to_phone");
    }

    #[tokio::test]
    async fn preflight_is_answered_with_cors_headers() {
        let harness = Harness::new();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/esg-report")
            .header(header::ORIGIN, "https://dashboard.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = harness.app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn casino_admin_cannot_reset_other_casino_staff() {
        let harness = Harness::new();
        let token = harness.sign_up(
            "admin-1",
            "admin@north.example",
            json!({"role": "casino_admin", "casino_id": "c1"}),
        );
        harness.db.seed(
            "staff",
            [json!({"id": "s1", "email": "dealer@south.example", "casino_id": "c2"})],
        );

        let (status, body) = harness
            .post(
                "/reset-staff-password",
                Some(&token),
                json!({"staff_email": "dealer@south.example", "new_password": "longenough"}),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body["error"],
            "Cannot reset password for staff from another casino"
        );

        let (status, body) = harness
            .post(
                "/reset-staff-password",
                Some(&token),
                json!({"staff_email": "dealer@south.example", "new_password": "abc"}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Password must be at least 6 characters long");
    }

    #[tokio::test]
    async fn reset_requires_a_token() {
        let harness = Harness::new();
        let (status, body) = harness
            .post(
                "/reset-staff-password",
                None,
                json!({"staff_email": "dealer@south.example", "new_password": "longenough"}),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Missing authorization header");
    }

    #[tokio::test]
    async fn module_guard_reports_fallbacks() {
        let harness = Harness::new();
        let (status, body) = harness.get("/access/modules/audit_logs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["granted"], false);
        assert_eq!(
            body["message"],
            "Authentication required. Please log in to access this content."
        );

        let token = harness.sign_up(
            "u1",
            "support@north.example",
            json!({"role": "casino_staff", "user_role": "SUPPORT", "casino_id": "c1"}),
        );
        let (_, body) = harness
            .get("/access/modules/audit_logs", Some(&token))
            .await;
        assert_eq!(body["granted"], false);
        assert_eq!(body["role"], "SUPPORT");
        assert!(body["message"].is_string());

        let (_, body) = harness
            .get("/access/modules/player_risk_score", Some(&token))
            .await;
        assert_eq!(body["granted"], false);
        assert_eq!(body["licensed"], false);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .starts_with("Module Not Licensed: player_risk_score")
        );

        seed_catalogue(&harness);
        let (_, body) = harness
            .get("/access/modules/player_risk_score", Some(&token))
            .await;
        assert_eq!(body["granted"], true);
        assert_eq!(body["licensed"], true);
        assert!(body["message"].is_null());
    }

    /// Two active modules and one retired one; casino `c1` licenses
    /// `player_risk_score`, casino `c2` licenses `audit_logs`.
    fn seed_catalogue(harness: &Harness) {
        harness.db.seed(
            "software_modules",
            [
                json!({"id": "m1", "name": "Player Risk Score", "slug": "player_risk_score", "is_active": true}),
                json!({"id": "m2", "name": "Audit Logs", "slug": "audit_logs", "is_active": true}),
                json!({"id": "m3", "name": "Demo Mode", "slug": "demo_mode", "is_active": false}),
            ],
        );
        harness.db.seed(
            "casino_modules",
            [
                json!({"casino_id": "c1", "module_id": "m1", "enabled_at": "2025-01-01T00:00:00Z"}),
                json!({"casino_id": "c1", "module_id": "m3"}),
                json!({"casino_id": "c2", "module_id": "m2"}),
            ],
        );
    }

    fn slugs(body: &Value) -> Vec<&str> {
        body["modules"]
            .as_array()
            .unwrap()
            .iter()
            .map(|module| module["slug"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn casino_modules_follow_the_callers_casino() {
        let harness = Harness::new();
        seed_catalogue(&harness);

        let (status, body) = harness.get("/access/casino-modules", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["role"].is_null());
        assert!(slugs(&body).is_empty());

        let admin = harness.sign_up(
            "u1",
            "admin@north.example",
            json!({"role": "casino_admin", "casino_id": "c1"}),
        );
        let (_, body) = harness.get("/access/casino-modules", Some(&admin)).await;
        assert_eq!(body["casino_id"], "c1");
        assert_eq!(body["all_modules"], false);
        assert_eq!(slugs(&body), vec!["player_risk_score"]);
        assert_eq!(body["modules"][0]["enabled_at"], "2025-01-01T00:00:00Z");

        let regulator = harness.sign_up("u2", "regulator@board.example", json!({"role": "regulator"}));
        let (_, body) = harness
            .get("/access/casino-modules", Some(&regulator))
            .await;
        assert_eq!(body["all_modules"], true);
        let mut all = slugs(&body);
        all.sort_unstable();
        assert_eq!(all, vec!["audit_logs", "player_risk_score"]);
        assert!(body["modules"][0]["enabled_at"].is_string());
    }

    #[tokio::test]
    async fn staff_licence_falls_back_to_staff_row() {
        let harness = Harness::new();
        seed_catalogue(&harness);
        harness.db.seed(
            "staff",
            [json!({"id": "s9", "auth_user_id": "u9", "email": "dealer@south.example", "casino_id": "c2"})],
        );
        let token = harness.sign_up(
            "u9",
            "dealer@south.example",
            json!({"role": "staff", "user_role": "REGULATOR"}),
        );

        let (_, body) = harness.get("/access/casino-modules", Some(&token)).await;
        assert_eq!(body["casino_id"], "c2");
        assert_eq!(slugs(&body), vec!["audit_logs"]);

        let (_, body) = harness
            .get("/access/modules/audit_logs", Some(&token))
            .await;
        assert_eq!(body["granted"], true);
        let (_, body) = harness
            .get("/access/modules/player_risk_score", Some(&token))
            .await;
        assert_eq!(body["granted"], false);
        assert_eq!(body["licensed"], false);
    }

    #[tokio::test]
    async fn ingest_requires_bearer_scheme() {
        let harness = Harness::new();
        let body = json!({"casino_id": "c1", "reporting_period": "2025-01", "period_type": "monthly"});

        let (status, error) = harness
            .post("/esg-data-ingest/metrics", None, body.clone())
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(error["error"], "Missing or invalid Authorization header");

        let (status, created) = harness
            .post("/esg-data-ingest/metrics", Some("any-token"), body.clone())
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["message"], "ESG metrics recorded successfully");

        let (status, updated) = harness
            .post("/esg-data-ingest/metrics", Some("any-token"), body)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["message"], "ESG metrics updated successfully");

        let (status, unknown) = harness
            .post("/esg-data-ingest/audits", Some("any-token"), json!({}))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(unknown["details"]["available_endpoints"].is_array());
    }

    #[tokio::test]
    async fn king_iv_score_tracks_previous_period() {
        let harness = Harness::new();
        harness.db.seed(
            "esg_scores",
            [json!({
                "casino_id": "c1",
                "scoring_period_start": "2024-10-01",
                "scoring_period_end": "2024-12-31",
                "composite_score": 10.0
            })],
        );

        let (status, body) = harness
            .post(
                "/king-iv-esg-calculator",
                None,
                json!({"casino_id": "c1", "period_start": "2025-01-01", "period_end": "2025-03-31"}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["trend"]["previous"], 10.0);
        assert_eq!(body["trend"]["direction"], "improving");
        assert_eq!(body["score"]["casino_id"], "c1");
        assert_eq!(harness.db.rows("esg_scores").len(), 2);
    }

    #[tokio::test]
    async fn wellbeing_score_needs_a_known_session() {
        let harness = Harness::new();
        let (status, body) = harness
            .post("/wellbeing-risk-calculator", None, json!({}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "session_id is required");

        let (status, body) = harness
            .post(
                "/wellbeing-risk-calculator",
                None,
                json!({"session_id": "missing"}),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Session not found");
    }

    #[tokio::test]
    async fn engine_lists_endpoints_for_unknown_paths() {
        let harness = Harness::new();
        let (status, body) = harness
            .get("/safeplay-ai-risk-engine/health", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        assert_eq!(body["version"], "1.0.0");

        let (status, body) = harness
            .post("/safeplay-ai-risk-engine/health", None, json!({}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = harness
            .get("/safeplay-ai-risk-engine/unknown", None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["details"]["available_endpoints"][1], "POST /safeplay-ai-risk-engine/predict");
    }

    #[tokio::test]
    async fn preflight_lists_allowed_methods_and_headers() {
        let harness = Harness::new();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/auth/login")
            .header(header::ORIGIN, "https://dashboard.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,apikey")
            .body(Body::empty())
            .unwrap();
        let response = harness.app.clone().oneshot(request).await.unwrap();
        let listed = |name: header::HeaderName| -> Vec<String> {
            response.headers()[name]
                .to_str()
                .unwrap()
                .split(',')
                .map(|item| item.trim().to_ascii_lowercase())
                .collect()
        };

        let methods = listed(header::ACCESS_CONTROL_ALLOW_METHODS);
        for method in ["get", "post", "put", "delete", "options"] {
            assert!(methods.contains(&method.to_string()), "missing {method}");
        }
        let headers = listed(header::ACCESS_CONTROL_ALLOW_HEADERS);
        for name in ["authorization", "content-type", "x-client-info", "apikey"] {
            assert!(headers.contains(&name.to_string()), "missing {name}");
        }
    }

    /// Casino admin of `c1` plus a `c1` dealer registered with the auth provider.
    fn seed_reset_scenario(harness: &Harness) -> String {
        harness.db.seed(
            "staff",
            [json!({
                "id": "s1",
                "email": "dealer@north.example",
                "first_name": "Lindiwe",
                "last_name": "Dube",
                "casino_id": "c1"
            })],
        );
        harness
            .auth
            .register("auth-s1", "dealer@north.example", "old-password");
        harness.sign_up(
            "admin-1",
            "admin@north.example",
            json!({"role": "casino_admin", "casino_id": "c1"}),
        )
    }

    #[tokio::test]
    async fn casino_admin_resets_own_staff_password() {
        let harness = Harness::new();
        let token = seed_reset_scenario(&harness);

        let (status, body) = harness
            .post(
                "/reset-staff-password",
                Some(&token),
                json!({"staff_email": "dealer@north.example", "new_password": "fresh-secret"}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Password reset successfully for Lindiwe Dube");
        assert_eq!(body["staff_id"], "s1");
        assert_eq!(
            harness.auth.password_of("dealer@north.example").as_deref(),
            Some("fresh-secret")
        );
    }

    #[tokio::test]
    async fn password_reset_refusals() {
        let harness = Harness::new();
        let admin = seed_reset_scenario(&harness);
        let reset = |email: &str| json!({"staff_email": email, "new_password": "fresh-secret"});

        let support = harness.sign_up(
            "u2",
            "support@north.example",
            json!({"role": "casino_staff", "casino_id": "c1"}),
        );
        let (status, body) = harness
            .post("/reset-staff-password", Some(&support), reset("dealer@north.example"))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body["error"],
            "Insufficient permissions. Only casino admins can reset passwords."
        );

        let (status, body) = harness
            .post("/reset-staff-password", Some(&admin), reset("ghost@north.example"))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Staff member not found");

        harness.db.seed(
            "staff",
            [json!({"id": "s2", "email": "cashier@north.example", "casino_id": "c1"})],
        );
        let (status, body) = harness
            .post("/reset-staff-password", Some(&admin), reset("cashier@north.example"))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found in authentication system");
        assert_eq!(
            harness.auth.password_of("dealer@north.example").as_deref(),
            Some("old-password")
        );
    }

    #[tokio::test]
    async fn login_session_lifecycle() {
        let harness = Harness::new();
        harness.sign_up(
            "u1",
            "admin@north.example",
            json!({"role": "casino_admin", "casino_id": "c1", "full_name": "Naledi Mokoena"}),
        );

        let (status, body) = harness
            .post(
                "/auth/login",
                None,
                json!({"email": "admin@north.example", "password": "wrong"}),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid login credentials");

        let (status, body) = harness
            .post(
                "/auth/login",
                None,
                json!({"email": "admin@north.example", "password": "secret-password"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["redirect_path"], "/casino/dashboard");
        assert_eq!(body["user"]["source"], "users");
        let token = body["access_token"].as_str().unwrap().to_string();

        // A later profile change is not seen while the cached entry is fresh.
        harness
            .db
            .update(
                Query::table("users").eq("id", "u1"),
                json!({"full_name": "Renamed"}),
            )
            .await
            .unwrap();
        let (status, body) = harness.get("/auth/me", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["full_name"], "Naledi Mokoena");
        assert!(harness.state.profiles().get(&token).is_some());

        let (status, body) = harness.post("/auth/logout", Some(&token), json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Signed out");
        assert!(harness.state.profiles().get(&token).is_none());

        let (status, _) = harness.get("/auth/me", Some(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn casino_admin_guard_redirects_by_role() {
        let harness = Harness::new();
        let (status, body) = harness.get("/access/casino-admin", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["granted"], false);
        assert_eq!(body["redirect_to"], "/login");

        let staff = harness.sign_up("u1", "dealer@north.example", json!({"role": "casino_staff"}));
        let (_, body) = harness.get("/access/casino-admin", Some(&staff)).await;
        assert_eq!(body["redirect_to"], "/staff/academy");

        let admin = harness.sign_up("u2", "admin@north.example", json!({"role": "casino_admin"}));
        let (_, body) = harness.get("/access/casino-admin", Some(&admin)).await;
        assert_eq!(body["granted"], true);
        assert!(body["redirect_to"].is_null());
    }

    #[tokio::test]
    async fn esg_report_summary_and_creation() {
        let harness = Harness::new();
        let (status, body) = harness.get("/esg-report/c1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Casino not found");

        harness
            .db
            .seed("casinos", [json!({"id": "c1", "name": "North Star"})]);
        let (status, body) = harness.get("/esg-report/c1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["casinoName"], "North Star");
        assert_eq!(body["grade"], "N/A");
        assert_eq!(body["totalScore"], 0.0);
        assert!(body["latestScore"].is_null());

        let (status, body) = harness
            .post(
                "/esg-report",
                None,
                json!({"casino_id": "c1", "total_esg_score": 81.5, "esg_grade": "A"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"]["casino_id"], "c1");

        let (_, body) = harness.get("/esg-report/c1", None).await;
        assert_eq!(body["grade"], "A");
        assert_eq!(body["totalScore"], 81.5);
    }

    fn seed_invitation_targets(harness: &Harness) {
        harness.db.seed(
            "players",
            [json!({"id": "p1", "first_name": "Thandi", "email": "thandi@example.com", "phone": "+27820000000"})],
        );
        harness.db.seed(
            "wellbeing_game_concepts",
            [json!({"id": "g1", "name": "Treasure Run", "duration_minutes": 3})],
        );
    }

    #[tokio::test]
    async fn invitation_by_email_is_simulated() {
        let harness = Harness::new();
        seed_invitation_targets(&harness);

        let (status, body) = harness
            .post(
                "/send-wellbeing-invitation",
                None,
                json!({"player_id": "p1", "game_concept_id": "g1", "channel": "email"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["delivery_status"], "simulated");
        assert_eq!(body["message"], "Invitation simulated via email");
        let token = body["secure_token"].as_str().unwrap();
        assert!(body["game_url"].as_str().unwrap().ends_with(&format!("/wellbeing-game/play/{token}")));

        let rows = harness.db.rows("wellbeing_game_invitations");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["status"], "pending");
        assert_eq!(rows[0]["delivery_status"], "simulated");
    }

    #[tokio::test]
    async fn invitation_by_whatsapp_records_the_provider_id() {
        let config = AppConfig {
            twilio: Some(TwilioCredentials {
                account_sid: "AC1".into(),
                auth_token: "token".into(),
                whatsapp_number: "+27110000000".into(),
            }),
            ..AppConfig::default()
        };
        let harness = Harness::with_gateway(Arc::new(AcceptingGateway), config);
        seed_invitation_targets(&harness);

        let (status, body) = harness
            .post(
                "/send-wellbeing-invitation",
                None,
                json!({"player_id": "p1", "game_concept_id": "g1", "channel": "whatsapp"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["delivery_status"], "sent");
        assert_eq!(body["twilio_sid"], "SM123");
        assert_eq!(harness.db.rows("wellbeing_game_invitations")[0]["status"], "sent");
    }

    #[tokio::test]
    async fn invitation_rejects_unbounded_expiry() {
        let harness = Harness::new();
        seed_invitation_targets(&harness);

        let (status, body) = harness
            .post(
                "/send-wellbeing-invitation",
                None,
                json!({
                    "player_id": "p1",
                    "game_concept_id": "g1",
                    "channel": "email",
                    "expires_in_hours": 4_294_967_295_u32
                }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "expires_in_hours must be between 1 and 8760");
        assert!(harness.db.rows("wellbeing_game_invitations").is_empty());
    }

    #[tokio::test]
    async fn whatsapp_send_logs_the_call() {
        let harness = Harness::with_gateway(Arc::new(AcceptingGateway), AppConfig::default());
        harness.db.seed(
            "casino_integration_configs",
            [json!({
                "id": "cfg1",
                "casino_id": "c1",
                "is_enabled": true,
                "credentials": {"account_sid": "AC1", "auth_token": "token", "whatsapp_number": "+27110000000"}
            })],
        );

        let (status, body) = harness
            .post(
                "/integration-whatsapp-send",
                None,
                json!({"casino_id": "c1", "to_phone": "+27820000000", "message": "hello"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["status"], "sent");
        assert_eq!(body["message_sid"], "SM123");

        let logs = harness.db.rows("integration_api_logs");
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0]["config_id"], "cfg1");
        assert_eq!(logs[0]["response_status"], 200);
        assert_eq!(logs[0]["request_payload"]["to"], "+27820000000");
    }
}
