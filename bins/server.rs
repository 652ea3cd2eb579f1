use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "server", version, about = "SSO auth service")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, env = "CONFIG_PATH", default_value = "config.toml")]
    config: String,
}

fn main() -> ExitCode {
    // 提前加载 .env，使得 RUST_LOG / DATABASE_URL 等环境变量生效
    dotenv().ok();
    let cli = Cli::parse();

    let cfg = match configs::AppConfig::load_file_and_validate(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            // logger depends on cfg.env, not initialized yet
            eprintln!("failed to load config from {}: {e:#}", cli.config);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = common::utils::logging::init_logging_for_env(&cfg.env) {
        eprintln!("failed to init logging: {e:#}");
        return ExitCode::FAILURE;
    }

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    // Panic 钩子：捕获异常并输出错误日志，便于排查问题
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "server", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        %service_id,
        pid,
        version,
        env = %cfg.env,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "starting application"
    );

    // server::run 内部处理 SIGINT/SIGTERM 并优雅停机
    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "server", event = "stop", %service_id, pid, "server stopped normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "server", event = "run_failed", error = %e, "server::run returned error");
            ExitCode::FAILURE
        }
    }
}
