//! Loads the demo lead list into an empty database.

use chrono::NaiveDate;
use dotenvy::dotenv;

use pushkind_leads::db::establish_connection_pool;
use pushkind_leads::domain::lead::NewLead;
use pushkind_leads::domain::types::{CompanyName, LeadEmail, LeadName, Stage, TypeConstraintError};
use pushkind_leads::models::config::ServerConfig;
use pushkind_leads::repository::errors::{RepositoryError, RepositoryResult};
use pushkind_leads::repository::{DieselRepository, LeadListQuery, LeadReader, LeadWriter};
use pushkind_leads::services::leads::random_lead_id;

/// name, email, company, stage, engaged, last contacted (y, m, d)
type SeedRow = (&'static str, &'static str, &'static str, i32, bool, Option<(i32, u32, u32)>);

const SEED: &[SeedRow] = &[
    ("Emma Blake", "emma.blake@flux.com", "Flux Technologies Ltd.", 2, false, Some((2025, 1, 23))),
    ("Aria Frost", "aria.frost@prism.com", "Prism Tech Pvt. Ltd.", 2, false, Some((2025, 1, 23))),
    ("Noah Chen", "noah.chen@apex.com", "Apex Technologies", 3, false, None),
    ("Zara West", "zara.west@cube.com", "Cube", 3, false, None),
    ("Felix Gray", "felix.gray@nova.com", "Nova Corporation", 2, false, Some((2025, 1, 16))),
    ("Milo Park", "milo.park@echo.com", "Echo", 2, true, Some((2025, 1, 16))),
    ("Ruby Shaw", "ruby.shaw@wave.com", "Wave Technologies", 3, false, None),
    ("Leo Walsh", "leo.walsh@peak.com", "Peak Systems", 2, true, Some((2025, 1, 4))),
    ("Iris Cole", "iris.cole@drift.com", "Drift Analytics", 4, true, Some((2025, 1, 4))),
    ("Finn Hayes", "finn.hayes@core.com", "Core Innovations", 3, true, Some((2025, 1, 4))),
    ("Olivia Martinez", "olivia.martinez@stellar.com", "Stellar Systems", 1, false, Some((2025, 1, 2))),
    ("Ethan Johnson", "ethan.johnson@quantum.com", "Quantum Solutions", 2, true, Some((2025, 1, 5))),
    ("Sophia Lee", "sophia.lee@vertex.com", "Vertex Inc.", 3, false, Some((2025, 1, 8))),
    ("William Brown", "william.brown@nexus.com", "Nexus Technologies", 4, true, Some((2025, 1, 10))),
    ("Ava Wilson", "ava.wilson@pulse.com", "Pulse Digital", 1, false, Some((2025, 1, 12))),
    ("James Taylor", "james.taylor@orbit.com", "Orbit Systems", 2, true, Some((2025, 1, 15))),
    ("Charlotte Davis", "charlotte.davis@horizon.com", "Horizon Tech", 3, false, Some((2025, 1, 18))),
    ("Benjamin Miller", "benjamin.miller@spark.com", "Spark Innovations", 4, true, Some((2025, 1, 20))),
    ("Amelia Garcia", "amelia.garcia@fusion.com", "Fusion Labs", 1, false, Some((2025, 1, 22))),
    ("Lucas Rodriguez", "lucas.rodriguez@atlas.com", "Atlas Corporation", 2, true, Some((2025, 1, 24))),
    ("Harper Thompson", "harper.thompson@zenith.com", "Zenith Solutions", 3, false, Some((2025, 1, 26))),
    ("Mason White", "mason.white@vortex.com", "Vortex Systems", 4, true, Some((2025, 1, 28))),
    ("Evelyn Clark", "evelyn.clark@aurora.com", "Aurora Tech", 1, false, Some((2025, 1, 30))),
    ("Logan Lewis", "logan.lewis@summit.com", "Summit Innovations", 2, true, Some((2025, 2, 1))),
    ("Abigail Walker", "abigail.walker@nebula.com", "Nebula Systems", 3, false, Some((2025, 2, 3))),
    ("Jackson Hall", "jackson.hall@polaris.com", "Polaris Technologies", 4, true, Some((2025, 2, 5))),
    ("Scarlett Young", "scarlett.young@eclipse.com", "Eclipse Solutions", 1, false, Some((2025, 2, 7))),
    ("Aiden King", "aiden.king@cosmos.com", "Cosmos Digital", 2, true, Some((2025, 2, 9))),
];

fn build_lead(row: &SeedRow) -> Result<NewLead, TypeConstraintError> {
    let (name, email, company, stage, engaged, last_contacted) = *row;
    Ok(NewLead::new(
        LeadName::new(name)?,
        LeadEmail::new(email)?,
        CompanyName::new(company)?,
        Stage::new(stage)?,
        engaged,
        last_contacted.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        None,
    ))
}

fn seed<R>(repo: &R) -> RepositoryResult<usize>
where
    R: LeadReader + LeadWriter,
{
    let (existing, _) = repo.list_leads(&LeadListQuery::new())?;
    if existing > 0 {
        log::info!("Database already holds {existing} leads, skipping seed");
        return Ok(0);
    }

    for row in SEED {
        let new_lead = build_lead(row)?;
        let id = random_lead_id().map_err(|e| RepositoryError::Unexpected(e.to_string()))?;
        let lead = repo.create_lead(id, &new_lead)?;
        log::info!("Seeded lead {} ({})", lead.id, lead.name);
    }

    Ok(SEED.len())
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::load() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    match seed(&DieselRepository::new(pool)) {
        Ok(count) => log::info!("Inserted {count} leads"),
        Err(e) => {
            log::error!("Failed to seed leads: {e}");
            std::process::exit(1);
        }
    }
}
