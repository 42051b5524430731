use clap::Parser;
use course_roster::utils::error::ErrorSeverity;
use course_roster::utils::{logger, validation::Validate};
use course_roster::{
    CliConfig, ConfigProvider, CsvRosterStore, FileAuditLog, RegistrarError, RegistrationService,
    RosterStore, Shell,
};
use std::io;

fn main() {
    let mut config = CliConfig::parse();

    // 設定檔需先載入，才能決定日誌等級
    if let Err(e) = config.load_config_file() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }

    logger::init_cli_logger(config.verbose());
    tracing::info!("Starting course-roster");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        fail("Configuration validation failed", &e);
    }

    let audit = match FileAuditLog::open(config.audit_log_path()) {
        Ok(audit) => audit,
        Err(e) => fail("Could not open audit log", &e),
    };
    tracing::info!("📝 Audit log: {}", audit.path().display());

    let mut service = RegistrationService::new(audit);

    let store = config.data_dir().map(CsvRosterStore::new);
    if let Some(store) = &store {
        tracing::info!("📁 Loading roster from {}", store.base_path().display());
        if let Err(e) = service.load_from(store) {
            service.shutdown();
            fail("Could not load roster", &e);
        }
    }

    let shell_result = {
        let stdin = io::stdin();
        let stdout = io::stdout();
        Shell::new(&mut service, stdin.lock(), stdout.lock()).run()
    };
    if let Err(e) = &shell_result {
        tracing::error!("❌ Console failure: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
    }

    if let Some(store) = store.as_ref().filter(|_| config.autosave()) {
        match store.save(&service.snapshot()) {
            Ok(()) => tracing::info!("✅ Roster saved to {}", store.base_path().display()),
            Err(e) => {
                tracing::error!("❌ Failed to save roster: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            }
        }
    }

    service.shutdown();

    if let Err(e) = shell_result {
        std::process::exit(exit_code(&e));
    }
}

fn fail(context: &str, e: &RegistrarError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

fn exit_code(e: &RegistrarError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    }
}
