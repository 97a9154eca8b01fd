/// Module-level role guard and casino administration page guard.
pub mod access;
/// Sign-in, current-user lookup and sign-out.
pub mod auth_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// ESG compliance score storage and casino summaries.
pub mod esg_service;
/// Health check service.
pub mod health_service;
/// ESG data ingestion (contributions, training, metrics).
pub mod ingest_service;
/// Wellbeing game invitation creation and delivery.
pub mod invitation_service;
/// King IV aligned ESG scoring.
pub mod king_iv_service;
/// Per-casino software module licences.
pub mod licensing;
/// Staff password reset by administrators.
pub mod password_service;
/// Rule-based player risk predictor.
pub mod risk_engine;
/// Behavioural risk profile storage and history.
pub mod risk_service;
/// Wellbeing session risk scoring.
pub mod wellbeing_service;
/// WhatsApp relay through casino integrations.
pub mod whatsapp_service;
