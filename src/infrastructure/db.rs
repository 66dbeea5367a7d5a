use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(db.get_database_backend(), sql.to_owned()))
        .await?;
    Ok(())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    execute(db, "PRAGMA foreign_keys = ON").await?;

    // Create trains table
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS trains (
            train_id TEXT PRIMARY KEY NOT NULL,
            train_name VARCHAR(50) NOT NULL UNIQUE,
            total_seats INTEGER,
            seats_per_coach INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    // Create stations table
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS stations (
            station_id TEXT PRIMARY KEY NOT NULL,
            station_name VARCHAR(50) NOT NULL UNIQUE,
            station_location VARCHAR(100) NOT NULL UNIQUE,
            total_platform INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    // Create train_schedule table (one row per stop)
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS train_schedule (
            schedule_id TEXT PRIMARY KEY NOT NULL,
            train_id TEXT NOT NULL,
            station_id TEXT NOT NULL,
            station_name VARCHAR(50) NOT NULL,
            stop_number INTEGER NOT NULL,
            platform_number INTEGER NOT NULL,
            arrival_time TEXT,
            departure_time TEXT,
            day_offset INTEGER NOT NULL DEFAULT 0,
            is_start INTEGER NOT NULL DEFAULT 0,
            is_end INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (train_id) REFERENCES trains(train_id),
            FOREIGN KEY (station_id) REFERENCES stations(station_id)
        )
        "#,
    )
    .await?;

    // Storage-level guards for the per-train stop invariants
    execute(
        db,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_schedule_train_stop ON train_schedule(train_id, stop_number)",
    )
    .await?;
    execute(
        db,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_schedule_train_station ON train_schedule(train_id, station_id)",
    )
    .await?;
    execute(
        db,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_schedule_train_start ON train_schedule(train_id) WHERE is_start = 1",
    )
    .await?;
    execute(
        db,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_schedule_train_end ON train_schedule(train_id) WHERE is_end = 1",
    )
    .await?;
    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_schedule_station ON train_schedule(station_id)",
    )
    .await?;

    tracing::debug!("Schema ready: trains, stations, train_schedule");
    Ok(())
}
