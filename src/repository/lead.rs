//! Diesel implementation of the lead store.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::db::unicode_lower;
use crate::domain::lead::{Lead, NewLead, UpdateLead};
use crate::domain::types::LeadId;
use crate::models::lead::{Lead as DbLead, NewLead as DbNewLead, UpdateLead as DbUpdateLead};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, LeadListQuery, LeadPredicate, LeadReader, LeadWriter, SortKey};
use crate::schema::leads;

const LIKE_ESCAPE: char = '\\';

/// Wraps `term` in `%` after escaping the LIKE metacharacters it contains.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Applies every predicate of `query` to a fresh boxed select.
fn filtered(query: &LeadListQuery) -> leads::BoxedQuery<'static, Sqlite> {
    let mut select = leads::table.into_boxed();

    for predicate in query.predicates() {
        select = match predicate {
            LeadPredicate::Search(term) => {
                let pattern = like_pattern(&term.to_lowercase());
                select.filter(
                    unicode_lower(leads::name)
                        .like(pattern.clone())
                        .escape(LIKE_ESCAPE)
                        .or(unicode_lower(leads::email)
                            .like(pattern.clone())
                            .escape(LIKE_ESCAPE))
                        .or(unicode_lower(leads::company)
                            .like(pattern)
                            .escape(LIKE_ESCAPE)),
                )
            }
            LeadPredicate::Stage(stage) => select.filter(leads::stage.eq(stage.get())),
            LeadPredicate::Engaged(engaged) => select.filter(leads::engaged.eq(*engaged)),
        };
    }

    select
}

fn sorted(
    select: leads::BoxedQuery<'static, Sqlite>,
    sort_by: SortKey,
) -> leads::BoxedQuery<'static, Sqlite> {
    match sort_by {
        SortKey::Name => select.order((leads::name.asc(), leads::id.asc())),
        SortKey::Company => select.order((leads::company.asc(), leads::id.asc())),
        SortKey::Stage => select.order((leads::stage.asc(), leads::id.asc())),
        SortKey::LastContacted => select.order((
            leads::last_contacted.is_null().asc(),
            leads::last_contacted.asc(),
            leads::id.asc(),
        )),
    }
}

fn to_domain(rows: Vec<DbLead>) -> RepositoryResult<Vec<Lead>> {
    rows.into_iter()
        .map(|row| Lead::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl LeadReader for DieselRepository {
    fn get_lead_by_id(&self, id: LeadId) -> RepositoryResult<Option<Lead>> {
        let mut conn = self.conn()?;
        let row = leads::table
            .find(id.get())
            .select(DbLead::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(Lead::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_leads(&self, query: &LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(query).count().get_result(&mut conn)?;

        let mut select = sorted(filtered(query), query.sort_key());
        if let Some(pagination) = query.pagination() {
            let limit = i64::try_from(pagination.per_page())
                .map_err(|e| RepositoryError::ValidationError(e.to_string()))?;
            let offset = i64::try_from(pagination.offset())
                .map_err(|e| RepositoryError::ValidationError(e.to_string()))?;
            select = select.limit(limit).offset(offset);
        }

        let rows = select.select(DbLead::as_select()).load(&mut conn)?;
        let total = usize::try_from(total)
            .map_err(|e| RepositoryError::Unexpected(e.to_string()))?;

        Ok((total, to_domain(rows)?))
    }
}

impl LeadWriter for DieselRepository {
    fn create_lead(&self, id: LeadId, new_lead: &NewLead) -> RepositoryResult<Lead> {
        let mut conn = self.conn()?;
        let insertable = DbNewLead::from_domain(id, new_lead, Utc::now().naive_utc());

        let row = diesel::insert_into(leads::table)
            .values(&insertable)
            .returning(DbLead::as_returning())
            .get_result(&mut conn)?;

        Ok(Lead::try_from(row)?)
    }

    fn update_lead(&self, id: LeadId, updates: &UpdateLead) -> RepositoryResult<Lead> {
        if updates.is_empty() {
            return self.get_lead_by_id(id)?.ok_or(RepositoryError::NotFound);
        }

        let mut conn = self.conn()?;
        let changeset = DbUpdateLead::from_domain(updates, Utc::now().naive_utc());

        let row = diesel::update(leads::table.find(id.get()))
            .set(&changeset)
            .returning(DbLead::as_returning())
            .get_result(&mut conn)?;

        Ok(Lead::try_from(row)?)
    }

    fn delete_leads(&self, ids: &[LeadId]) -> RepositoryResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();

        let deleted =
            diesel::delete(leads::table.filter(leads::id.eq_any(raw_ids))).execute(&mut conn)?;

        Ok(deleted)
    }
}
