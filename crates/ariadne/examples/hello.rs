//! Hello world service.
//!
//! ```text
//! cargo run -p ariadne --example hello
//! curl localhost:8080/hello/John
//! ```
//!
//! Reads `ariadne.toml` when present and `ARIADNE__*` variables, e.g.
//! `ARIADNE__SERVER__HTTP_ADDR=0.0.0.0:9000`.

use std::time::Instant;

use ariadne::prelude::*;
use ariadne::telemetry::metrics::render_metrics;
use http::StatusCode;
use tracing::info;

fn router() -> Router {
    let mut router: Router = Router::new();

    router
        // Registered first, so its backward resolver runs last.
        .static_all("*", |_req, _res, ctx| async move {
            let started = Instant::now();
            Ok(Outcome::defer(move |req: Request, res: Response| async move {
                info!(
                    request_id = %ctx.request_id(),
                    method = %req.method(),
                    target = req.target(),
                    status = res.status().as_u16(),
                    elapsed = ?started.elapsed(),
                    "request completed"
                );
                Ok(())
            }))
        })
        .static_get("/", |_req, res, _ctx| async move {
            res.send(StatusCode::OK, "text/plain", "Hello, World!")?;
            Ok(Outcome::Done)
        })
        .static_get("/hello", |_req, res, _ctx| async move {
            res.send(StatusCode::OK, "text/plain", "Hello, World!!")?;
            Ok(Outcome::Done)
        })
        .dynamic_get("/hello/:name", |_req, res, ctx| async move {
            let name = ctx.param("name").unwrap_or_default().to_string();
            res.send(StatusCode::OK, "text/plain", format!("Hello, {name}!"))?;
            Ok(Outcome::Done)
        })
        .static_get("/metrics", |_req, res, _ctx| async move {
            match render_metrics() {
                Some(body) => res.send(StatusCode::OK, "text/plain; version=0.0.4", body)?,
                None => res.send(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "text/plain",
                    "metrics disabled",
                )?,
            }
            Ok(Outcome::Done)
        });

    router
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .with_development()
        .with_dotenv()?
        .with_optional_file("ariadne.toml")?
        .with_env_prefix("ARIADNE")
        .load()?;

    init_telemetry(&config.telemetry_config())?;

    let router = router();
    info!(routes = ?router, "starting hello service");

    Server::new(config.server.to_server_config(), router).run().await?;

    info!("hello service stopped");
    Ok(())
}
