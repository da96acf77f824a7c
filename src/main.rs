use anyhow::Context;
use http::Method;
use tracing_subscriber::EnvFilter;
use waypost::echo::echo_handler;
use waypost::runtime_config::RuntimeConfig;
use waypost::server::{AppService, HttpServer};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = RuntimeConfig::from_env();
    may::config().set_stack_size(config.stack_size);

    let service = AppService::new();
    service.register_handler(Method::GET, "/health", |_req, res| {
        if let Err(err) = res.send_json(200, &serde_json::json!({ "status": "ok" })) {
            tracing::error!(error = %err, "health response failed to serialize");
        }
    })?;

    let echo_routes = [
        (Method::GET, "/pets"),
        (Method::POST, "/pets"),
        (Method::GET, "/pets/{id:number}"),
        (Method::GET, "/users/{user_id}/posts/{post_id:number}"),
        (Method::GET, "/files/{name:string}"),
    ];
    for (method, template) in echo_routes {
        let registered = service
            .register_handler(method.clone(), template, echo_handler)
            .with_context(|| format!("registering {method} {template}"))?;
        anyhow::ensure!(registered, "duplicate route {method} {template}");
    }
    service.router.read().unwrap().dump_routes();

    let handle = HttpServer(service)
        .start(config.addr.as_str())
        .with_context(|| format!("binding {}", config.addr))?;
    tracing::info!(addr = %config.addr, "waypost listening");
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("server coroutine panicked"))?;
    Ok(())
}
