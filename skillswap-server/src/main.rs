use skillswap_common::db::{self, user, DbAsyncPool};

use actix_web::web::Data;
use actix_web::{App, HttpServer};
use diesel::{Connection, PgConnection};
use diesel_migrations::MigrationHarness;
use flexi_logger::{
    Age, Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, Naming, WriteMode,
};

mod env;
mod handlers;
mod middleware;
mod services;

// Every account in the sample data uses the same password
const SAMPLE_USER_PASSWORD: &str = "password123";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let mut port = 5000u16;

    let mut args = std::env::args();

    // Eat the first argument, which is the relative path to the executable
    args.next();

    while let Some(arg) = args.next() {
        match arg.to_lowercase().as_str() {
            "--port" => {
                let port_str = {
                    let next_arg = args.next();

                    match next_arg {
                        Some(s) => s,
                        None => {
                            eprintln!("ERROR: --port option specified but no port was given");
                            std::process::exit(1);
                        }
                    }
                };

                port = {
                    let port_result = port_str.parse::<u16>();

                    match port_result {
                        Ok(p) => p,
                        Err(_) => {
                            eprintln!("ERROR: Incorrect format for port. Integer expected");
                            std::process::exit(1);
                        }
                    }
                };

                continue;
            }
            a => {
                eprintln!("ERROR: Invalid argument: {}", &a);
                std::process::exit(1);
            }
        }
    }

    let base_addr = format!("127.0.0.1:{}", &port);

    let log_spec =
        LogSpecification::parse(&env::CONF.log_level).unwrap_or_else(|_| LogSpecification::info());

    let _logger = Logger::with(log_spec)
        .log_to_file(FileSpec::default().directory("./logs"))
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogAndCompressedFiles(60, 365),
        )
        .cleanup_in_background_thread(true)
        .duplicate_to_stdout(Duplicate::All)
        .write_mode(WriteMode::Async)
        .format(|writer, now, record| {
            write!(
                writer,
                "{:5} | {} | {}:{} | {}",
                record.level(),
                now.format("%Y-%m-%dT%H:%M:%S%.6fZ"),
                record.module_path().unwrap_or("<unknown>"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .use_utc()
        .start()
        .expect("Failed to start logger");

    log::info!("Running database migrations...");

    let mut migration_conn = match PgConnection::establish(&env::CONF.db_uri) {
        Ok(c) => c,
        Err(_) => {
            eprintln!("ERROR: Failed to connect to database");
            std::process::exit(1);
        }
    };

    if let Err(e) = migration_conn.run_pending_migrations(db::MIGRATIONS) {
        eprintln!("ERROR: Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    drop(migration_conn);

    log::info!("Connecting to database...");

    let actix_workers = env::CONF.actix_worker_count;

    // To prevent resource starvation, max connections must be at least as large as the
    // number of actix workers
    let db_max_connections = if actix_workers > env::CONF.db_max_connections as usize {
        actix_workers as u32
    } else {
        env::CONF.db_max_connections
    };

    let db_async_pool = db::create_db_async_pool(&env::CONF.db_uri, db_max_connections).await;

    log::info!("Successfully connected to database");

    seed_sample_users(&db_async_pool).await;

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(db_async_pool.clone()))
            .configure(services::api::configure)
            .wrap(actix_web::middleware::Logger::default())
    })
    .workers(actix_workers)
    .bind(base_addr)?
    .run()
    .await?;

    // All server threads have been joined at this point
    unsafe { env::CONF.zeroize() };

    Ok(())
}

/// Populates the directory with sample members the first time the server
/// starts against an empty database.
async fn seed_sample_users(db_async_pool: &DbAsyncPool) {
    let user_dao = user::Dao::new(db_async_pool);

    match user_dao.any_users_exist().await {
        Ok(true) => {
            log::info!("Sample data already exists, skipping seed");
            return;
        }
        Ok(false) => (),
        Err(e) => {
            eprintln!("ERROR: Failed to check for existing users: {e}");
            std::process::exit(1);
        }
    }

    log::info!("Seeding sample users...");

    let password_hash = match handlers::password::hash_password(String::from(SAMPLE_USER_PASSWORD))
        .await
    {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("ERROR: Failed to hash sample user password: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = db::seed::insert_sample_users(db_async_pool, &password_hash).await {
        eprintln!("ERROR: Failed to seed sample users: {e}");
        std::process::exit(1);
    }

    log::info!("Sample users seeded");
}
