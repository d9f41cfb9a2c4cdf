use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

use crate::{
    api::leave,
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    cfg.service(
        web::scope(&config.api_prefix)
            // Public routes
            .service(
                web::resource("/register")
                    .wrap(build_limiter(config.rate_register_per_min))
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/login")
                    .wrap(build_limiter(config.rate_login_per_min))
                    .route(web::post().to(handlers::login)),
            )
            // Protected routes
            .service(
                web::scope("/leaves")
                    .wrap(from_fn(auth_middleware)) // authentication
                    .wrap(build_limiter(config.rate_protected_per_min)) // rate limiting
                    // /leaves
                    .service(web::resource("").route(web::post().to(leave::submit_leave)))
                    // /leaves/my
                    .service(web::resource("/my").route(web::get().to(leave::my_leaves)))
                    // /leaves/pending
                    .service(web::resource("/pending").route(web::get().to(leave::pending_leaves)))
                    // /leaves/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave::get_leave)))
                    // /leaves/{id}/status
                    .service(
                        web::resource("/{id}/status").route(web::put().to(leave::decide_leave)),
                    ),
            ),
    );
}
