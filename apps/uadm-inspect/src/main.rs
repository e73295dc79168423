//! 运维检查工具：查看权限目录、校验目录、查询用户的系统特权与跨域权限。

use clap::{Parser, Subcommand};
use domain::permissions::{
    PRIV_ALL, domain_permissions, system_privileges, validate_builtin_catalogs,
};
use domain::TenantContext;
use std::sync::Arc;
use tracing::info;
use uadm_config::AppConfig;
use uadm_manage::{UserAdminService, catalog_to_dto, report_to_dto, user_detail_to_dto};
use uadm_storage::{PgTenantStore, PgUserStore, connect_pool};
use uadm_telemetry::{init_tracing_with_default, metrics, new_request_ids};

#[derive(Parser)]
#[command(name = "uadm-inspect", about = "Inspect user privileges and domain permissions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a permission catalog as JSON.
    Catalog {
        /// Print the per-domain catalog instead of system privileges.
        #[arg(long)]
        domain: bool,
    },

    /// Validate the built-in catalogs.
    Validate,

    /// Print a user's system capabilities and domain permissions.
    User {
        /// User id, username or email.
        key: String,
    },

    /// Print only the domain permission report of a user id.
    Domains { user_id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Catalog { domain } => {
            let catalog = if domain {
                domain_permissions()
            } else {
                system_privileges()
            };
            print_json(&catalog_to_dto(catalog))?;
        }
        Command::Validate => {
            validate_builtin_catalogs()?;
            println!("catalogs ok");
        }
        Command::User { key } => {
            let (service, ctx) = connect().await?;
            let detail = service.user_detail(&ctx, &key).await?;
            print_json(&user_detail_to_dto(detail))?;
        }
        Command::Domains { user_id } => {
            let (service, ctx) = connect().await?;
            let report = service.aggregator().aggregate(&ctx, &user_id).await?;
            print_json(&report_to_dto(report))?;
        }
    }
    Ok(())
}

async fn connect() -> Result<(UserAdminService, TenantContext), Box<dyn std::error::Error>> {
    // 先加载 .env，再读取 UADM_* 环境变量
    let config = AppConfig::load()?;
    init_tracing_with_default(&config.log_filter);
    if config.strict_catalog {
        validate_builtin_catalogs()?;
    }

    let pool = connect_pool(&config.database_url, config.database_max_connections).await?;
    let users = Arc::new(PgUserStore::new(pool.clone()));
    let tenants = Arc::new(PgTenantStore::new(pool));
    let service = UserAdminService::from_config(users, tenants, &config);

    // 只读查询，以系统身份执行
    let ids = new_request_ids();
    let ctx = TenantContext::new("system", "uadm-inspect", system_privileges().value(PRIV_ALL));
    info!(
        target: "uadm.inspect",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        concurrency = service.aggregator().concurrency(),
        "inspect_connected"
    );
    Ok((service, ctx))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    let snapshot = metrics().snapshot();
    tracing::debug!(
        target: "uadm.inspect",
        aggregations = snapshot.aggregations,
        omitted = snapshot.omitted_entries,
        "inspect_done"
    );
    Ok(())
}
