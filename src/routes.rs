use crate::{
    api::{dashboard, goal, health, task},
    auth::{handlers, middleware::session_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    middleware::{Condition, from_fn},
    web,
};

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let requests_per_min = requests_per_min.max(1);
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(60_000 / requests_per_min as u64)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("period and burst size are non-zero");
        Governor::new(&cfg)
    }

    let login_limiter = Condition::new(
        config.rate_login_per_min > 0,
        build_limiter(config.rate_login_per_min),
    );
    let protected_limiter = Condition::new(
        config.rate_protected_per_min > 0,
        build_limiter(config.rate_protected_per_min),
    );

    // Public routes
    cfg.service(web::resource("/").route(web::get().to(handlers::index)))
        .service(web::resource("/health").route(web::get().to(health::health)))
        .service(
            web::resource("/login")
                .wrap(login_limiter)
                .route(web::get().to(handlers::login_form))
                .route(web::post().to(handlers::login)),
        )
        .service(web::resource("/logout").route(web::post().to(handlers::logout)));

    // Session-protected routes
    cfg.service(
        web::scope("")
            .wrap(from_fn(session_middleware))
            .wrap(protected_limiter)
            .service(web::resource("/dashboard").route(web::get().to(dashboard::dashboard)))
            .service(web::resource("/goals").route(web::post().to(goal::add_goal)))
            .service(
                web::resource("/goals/{goal_id}/status")
                    .route(web::post().to(goal::update_goal_status)),
            )
            .service(
                web::resource("/goals/{goal_id}/feedback")
                    .route(web::post().to(goal::submit_feedback)),
            )
            .service(web::resource("/goals/{goal_id}/tasks").route(web::post().to(task::log_task)))
            .service(
                web::resource("/tasks/{task_id}/approve").route(web::post().to(task::approve_task)),
            )
            .service(
                web::resource("/tasks/{task_id}/reject").route(web::post().to(task::reject_task)),
            ),
    );
}

// LOGIN (POST /login)
//  └─ pms_session cookie, HS256, SESSION_TTL
//
// ACTION (POST /goals/.., /tasks/..)
//  └─ one store mutation → 303 to /dashboard?employee=..&view=..
//
// GET /dashboard
//  └─ whole view re-read from the store
