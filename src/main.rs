use clap::Parser;
use lawmate::core::ConfigProvider;
use lawmate::utils::error::ErrorSeverity;
use lawmate::utils::{logger, validation::Validate};
use lawmate::{
    AppConfig, AuthContext, ChatClient, ChatSession, CliArgs, Command, ContactForm,
    DirectoryQueryService, DirectoryView, LawMateError, NavigationParams, ProfessionalFilter,
    RestRegistry, ServiceIdentifier, Translations, UserSession,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => exit_with(e),
        },
        None => AppConfig::from_env(),
    };
    if let Some(timeout) = args.timeout {
        config.backend.timeout_seconds = Some(timeout);
    }

    // 初始化日誌
    if config.json_logging() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting lawmate CLI");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    // 驗證配置：缺少 backend 或 registry 設定時直接結束（translate 不需要網路）
    let needs_network = !matches!(args.command, Command::Translate { .. });
    if needs_network {
        if let Err(e) = config.validate() {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            exit_with(e);
        }
    }

    if let Err(e) = run(args.command, &config).await {
        exit_with(e);
    }

    Ok(())
}

async fn run(command: Command, config: &AppConfig) -> lawmate::Result<()> {
    match command {
        Command::Professionals {
            service,
            city,
            query,
        } => {
            let filter: ProfessionalFilter = match query {
                Some(query) => NavigationParams::parse(&query).into(),
                None => NavigationParams {
                    service: ServiceIdentifier::from_encoded(&service),
                    city,
                }
                .into(),
            };

            let registry = RestRegistry::from_config(config)?;
            let mut lookup = DirectoryQueryService::new(registry);
            if let Some(deadline) = config.request_timeout() {
                lookup = lookup.with_deadline(deadline);
            }

            let view = DirectoryView::new(lookup);
            view.open(filter).await;
            print!("{}", view.render());
        }
        Command::Chat {
            service,
            user,
            query,
        } => {
            let session = signed_in_session(config, &service, &user)?;
            let reply = session.send(&session.query(query)).await?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Command::History { service, user } => {
            let session = signed_in_session(config, &service, &user)?;
            let history = session.history().await?;
            if history.is_empty() {
                println!("No chat history for {} in '{}'", session.user_id(), session.service());
            }
            for entry in history {
                println!("{:?}: {}", entry.role, entry.content);
            }
        }
        Command::Submit { file } => {
            let client = ChatClient::from_config(config)?;
            let content = std::fs::read_to_string(&file)?;
            let payload: serde_json::Value = serde_json::from_str(&content)?;

            // 符合聯絡表單格式時先做本地檢查
            let response = match serde_json::from_value::<ContactForm>(payload.clone()) {
                Ok(form) => client.submit_contact_form(&form).await?,
                Err(_) => client.submit_form(&payload).await?,
            };
            println!("✅ {}", serde_json::to_string_pretty(&response)?);
        }
        Command::Health => {
            let client = ChatClient::from_config(config)?;
            let status = client.health().await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Translate { locale, key } => {
            let translations = match config.translations_file() {
                Some(path) => Translations::from_file(path)?,
                None => Translations::builtin()?,
            }
            .with_fallback(config.fallback_locale())?;

            let locale = locale.unwrap_or_else(|| config.default_locale().to_string());
            println!("{}", translations.translate(&locale, &key));
        }
    }

    Ok(())
}

/// CLI 沒有登入流程，以 --user 代表已登入的使用者
fn signed_in_session(config: &AppConfig, service: &str, user: &str) -> lawmate::Result<ChatSession> {
    let client = ChatClient::from_config(config)?;
    let auth = AuthContext::signed_in(UserSession::new(user));
    ChatSession::from_auth(client, ServiceIdentifier::from_encoded(service), &auth)
}

fn exit_with(e: LawMateError) -> ! {
    tracing::error!(
        "❌ lawmate failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 4,      // 輸入錯誤
        ErrorSeverity::Medium => 2,   // 可重試
        ErrorSeverity::High => 1,     // 上游拒絕
        ErrorSeverity::Critical => 3, // 設定或系統錯誤
    };
    std::process::exit(exit_code);
}
