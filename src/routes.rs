use crate::{
    api::{health, reports, users},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

/// Per-peer-IP limiter allowing `requests_per_min` with an equal burst.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_default();
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let ingest_limiter = Arc::new(build_limiter(config.rate_ingest_per_min));
    let report_limiter = Arc::new(build_limiter(config.rate_report_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            // Device-facing writes
            .service(
                web::resource("/reports/receive")
                    .wrap(ingest_limiter.clone())
                    .route(web::post().to(reports::receive)),
            )
            .service(
                web::resource("/health/ping")
                    .wrap(ingest_limiter)
                    .route(web::post().to(health::ping)),
            )
            // /reports/...
            .service(
                web::scope("/reports")
                    .wrap(report_limiter.clone())
                    .configure(reports::configure),
            )
            // /users/...
            .service(
                web::scope("/users")
                    .wrap(report_limiter.clone())
                    .configure(users::configure),
            )
            // /health/status
            .service(
                web::scope("/health")
                    .wrap(report_limiter)
                    .configure(health::configure),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::memory_state;
    use actix_web::{App, http::StatusCode, test};

    fn config(rate: u32) -> Config {
        Config {
            database_url: String::new(),
            server_addr: String::new(),
            api_prefix: "/api".into(),
            db_max_connections: 1,
            rate_ingest_per_min: rate,
            rate_report_per_min: rate,
            device_sweep_interval_secs: 600,
            device_offline_after_mins: 15,
            log_dir: "logs".into(),
            log_level: "debug".into(),
            admin_full_name: String::new(),
            admin_email: String::new(),
            admin_password: String::new(),
        }
    }

    #[actix_web::test]
    async fn second_request_over_a_one_per_minute_limit_is_throttled() {
        let (state, _) = memory_state(Vec::new());
        let config = config(0);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(|cfg| configure(cfg, &config)),
        )
        .await;

        let peer = "10.0.0.7:5000".parse().unwrap();
        let first = test::TestRequest::get()
            .uri("/api/users/facilities")
            .peer_addr(peer)
            .to_request();
        assert_eq!(test::call_service(&app, first).await.status(), StatusCode::OK);

        let second = test::TestRequest::get()
            .uri("/api/users/facilities")
            .peer_addr(peer)
            .to_request();
        assert_eq!(
            test::call_service(&app, second).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
