use tourney::config::AppConfig;
use tourney::init_tracing;

#[test]
fn test_tracing_and_config_from_env() {
    // Initialize tracing twice (second call must be a no-op, not a panic)
    init_tracing();
    init_tracing();

    let config = AppConfig::from_env();
    println!("Database URL: {}", tourney::bootstrap::redact_db_url(&config.database_url));

    assert!(!config.database_url.is_empty());
    assert!(!config.host.is_empty());
    assert!(!config.auth.secret.is_empty());
}
