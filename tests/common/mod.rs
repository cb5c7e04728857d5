#![allow(dead_code)]

use chrono::NaiveDate;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_leads::db::{DbPool, establish_connection_pool};
use pushkind_leads::domain::lead::{Lead, NewLead};
use pushkind_leads::domain::types::{CompanyName, LeadEmail, LeadId, LeadName, Stage};
use pushkind_leads::repository::{DieselRepository, LeadWriter};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(filename);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("create connection pool");

        {
            let mut pooled = pool.get().expect("get connection");
            let conn: &mut SqliteConnection = &mut pooled;
            conn.run_pending_migrations(MIGRATIONS)
                .expect("run migrations");
        }

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn new_lead(name: &str, company: &str, stage: i32, engaged: bool) -> NewLead {
    let email = format!(
        "{}@{}.com",
        name.to_lowercase().replace(' ', "."),
        company.to_lowercase().replace(' ', "")
    );
    NewLead::new(
        LeadName::new(name).expect("valid name"),
        LeadEmail::new(email).expect("valid email"),
        CompanyName::new(company).expect("valid company"),
        Stage::new(stage).expect("valid stage"),
        engaged,
        None,
        None,
    )
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn insert(repo: &DieselRepository, id: i64, new_lead: NewLead) -> Lead {
    repo.create_lead(LeadId::new(id).expect("valid id"), &new_lead)
        .expect("insert lead")
}

/// Inserts a small fixed set of leads with ids 1..=6.
pub fn seed(repo: &DieselRepository) {
    let mut emma = new_lead("Emma Blake", "Flux Technologies", 2, false);
    emma.last_contacted = Some(date(2025, 1, 23));
    insert(repo, 1, emma);
    insert(repo, 2, new_lead("Aria Frost", "Prism Tech", 2, false));
    let mut noah = new_lead("Noah Chen", "Apex Technologies", 3, false);
    noah.last_contacted = Some(date(2025, 1, 4));
    insert(repo, 3, noah);
    let mut milo = new_lead("Milo Park", "Echo", 2, true);
    milo.last_contacted = Some(date(2025, 1, 16));
    insert(repo, 4, milo);
    insert(repo, 5, new_lead("Iris Cole", "Drift Analytics", 4, true));
    insert(repo, 6, new_lead("Zara West", "Cube", 3, false));
}
