use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the SafeBet IQ backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::risk::create_profile,
        crate::routes::risk::player_history,
        crate::routes::esg::create_score,
        crate::routes::esg::casino_summary,
        crate::routes::whatsapp::send_message,
        crate::routes::password::reset_staff_password,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::auth::logout,
        crate::routes::access::module_table,
        crate::routes::access::module_access,
        crate::routes::access::casino_admin_guard,
        crate::routes::access::casino_modules,
        crate::routes::engine::health,
        crate::routes::engine::predict,
        crate::routes::engine::batch_predict,
        crate::routes::wellbeing::calculate_risk,
        crate::routes::invitation::send_invitation,
        crate::routes::king_iv::calculate,
        crate::routes::ingest::contributions,
        crate::routes::ingest::training,
        crate::routes::ingest::metrics,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::risk::NewRiskProfile,
            crate::dto::risk::RiskProfileCreated,
            crate::dto::risk::PlayerRiskHistory,
            crate::dao::models::RiskProfile,
            crate::dto::esg::NewEsgScore,
            crate::dto::esg::EsgScoreCreated,
            crate::dto::esg::CasinoEsgSummary,
            crate::dao::models::EsgComplianceScore,
            crate::dto::whatsapp::SendWhatsAppRequest,
            crate::dto::whatsapp::WhatsAppSendResponse,
            crate::dto::password::ResetPasswordRequest,
            crate::dto::password::ResetPasswordResponse,
            crate::dto::auth::LoginRequest,
            crate::dto::auth::LoginResponse,
            crate::dto::auth::CurrentUserResponse,
            crate::dto::auth::ActionResponse,
            crate::dao::models::UserProfile,
            crate::dto::access::ModuleAccessResponse,
            crate::dto::access::ModuleTableResponse,
            crate::dto::access::ModulePermissions,
            crate::dto::access::PageGuardResponse,
            crate::dto::access::CasinoModulesResponse,
            crate::dao::models::LicensedModule,
            crate::dto::engine::PlayerFeatures,
            crate::dto::engine::PredictRequest,
            crate::dto::engine::BatchPredictRequest,
            crate::dto::engine::PredictResponse,
            crate::dto::engine::BatchPredictResponse,
            crate::dto::engine::EngineHealth,
            crate::dto::wellbeing::RiskCalculationRequest,
            crate::dto::wellbeing::RiskCalculationResponse,
            crate::dto::invitation::SendInvitationRequest,
            crate::dto::invitation::InvitationResponse,
            crate::dto::king_iv::EsgCalculationRequest,
            crate::dto::king_iv::EsgCalculationResponse,
            crate::dto::ingest::ContributionRequest,
            crate::dto::ingest::TrainingPayload,
            crate::dto::ingest::MetricsRequest,
            crate::dto::ingest::IngestResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "risk", description = "Behavioural risk profiles and the rule-based risk engine"),
        (name = "esg", description = "ESG reports, King IV scoring and data ingest"),
        (name = "integrations", description = "Outbound messaging through casino integrations"),
        (name = "auth", description = "Sign-in, session and staff administration"),
        (name = "access", description = "Role based module access"),
        (name = "wellbeing", description = "Wellbeing game scoring and invitations"),
    )
)]
pub struct ApiDoc;
