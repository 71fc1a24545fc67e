use clap::{Parser, Subcommand};
use tracing::info;

use vinaji::config::{get_config, init_config};
use vinaji::runtime::modes::run_server;
use vinaji::services::AccountService;
use vinaji::storage::SeaOrmStorage;
use vinaji::system::logging::init_logging;

#[derive(Parser)]
#[command(name = "vinaji", about = "Vinaji marketplace backend", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// 启动 HTTP 服务（默认）
    Serve,
    /// 只运行数据库迁移后退出
    Migrate,
    /// 创建 staff 账户
    CreateAdmin {
        username: String,
        email: String,
        password: String,
    },
    /// 输出示例配置文件
    SampleConfig,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_config();

    let cli = Cli::parse();

    if matches!(cli.command, Some(Command::SampleConfig)) {
        println!("{}", vinaji::config::AppConfig::generate_sample_config());
        return Ok(());
    }

    // guard 在进程存活期间持有，保证日志落盘
    let _guard = init_logging(&get_config().logging);

    match cli.command {
        None | Some(Command::Serve) => run_server().await,
        Some(Command::Migrate) => {
            // 连接时会自动执行迁移
            let storage = SeaOrmStorage::new(&get_config().database).await?;
            info!("Migrations applied on {} backend", storage.backend_name());
            Ok(())
        }
        Some(Command::CreateAdmin {
            username,
            email,
            password,
        }) => {
            let storage = std::sync::Arc::new(SeaOrmStorage::new(&get_config().database).await?);
            let accounts = AccountService::new(storage.clone());
            let user = accounts
                .register(vinaji::services::RegisterRequest {
                    username,
                    email,
                    password,
                    first_name: None,
                    last_name: None,
                    referral_code: None,
                })
                .await?;
            storage.promote_to_staff(user.id).await?;
            info!("Staff account created: {} (id {})", user.username, user.id);
            Ok(())
        }
        Some(Command::SampleConfig) => unreachable!(),
    }
}
