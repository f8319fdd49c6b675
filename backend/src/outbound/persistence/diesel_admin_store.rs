//! PostgreSQL-backed `AdminStore` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::{AsSelect, SqlTypeOf, sql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;

use super::diesel_error_mapping::map_store_error;
use super::diesel_transaction::DieselTransaction;
use super::models::{AdminRow, AdminValues};
use super::schema::admins;
use crate::domain::ports::{AdminStore, StoreError};
use crate::domain::{Admin, AdminFilter, Page, page_window};

type AdminPageQuery =
    admins::BoxedQuery<'static, Pg, (SqlTypeOf<AsSelect<AdminRow, Pg>>, BigInt)>;

/// Newest-first rows matching `filter`, each paired with the matching count
/// before the window applies.
fn page_query(filter: &AdminFilter) -> AdminPageQuery {
    let mut query = admins::table
        .select((AdminRow::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .order(admins::id.desc())
        .into_boxed();
    if let Some(id) = filter.id {
        query = query.filter(admins::id.eq(id));
    }
    if let Some(email) = filter.email.as_deref() {
        query = query.filter(admins::email.eq(email.to_owned()));
    }
    if let Some((limit, offset)) = page_window(filter.page, filter.limit) {
        query = query.limit(limit).offset(offset);
    }
    query
}

#[async_trait]
impl AdminStore for DieselTransaction {
    async fn insert_admin(&mut self, admin: &Admin) -> Result<i64, StoreError> {
        diesel::insert_into(admins::table)
            .values(AdminValues::from(admin))
            .returning(admins::id)
            .get_result(self.connection())
            .await
            .map_err(map_store_error)
    }

    async fn find_admins(&mut self, filter: &AdminFilter) -> Result<Page<Admin>, StoreError> {
        let rows: Vec<(AdminRow, i64)> = page_query(filter)
            .load(self.connection())
            .await
            .map_err(map_store_error)?;
        let total = rows.as_slice().first().map_or(0, |(_, total)| *total);
        Ok(Page::new(
            rows.into_iter().map(|(row, _)| Admin::from(row)).collect(),
            total,
        ))
    }

    async fn update_admin(&mut self, admin: &Admin) -> Result<(), StoreError> {
        diesel::update(admins::table.find(admin.id))
            .set(AdminValues::from(admin))
            .execute(self.connection())
            .await
            .map(|_| ())
            .map_err(map_store_error)
    }

    async fn delete_admin(&mut self, id: i64) -> Result<(), StoreError> {
        diesel::delete(admins::table.find(id))
            .execute(self.connection())
            .await
            .map(|_| ())
            .map_err(map_store_error)
    }
}
