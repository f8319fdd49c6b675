//! PostgreSQL-backed `UserStore` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::{AsSelect, SqlTypeOf, sql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;

use super::diesel_error_mapping::map_store_error;
use super::diesel_transaction::DieselTransaction;
use super::models::{UserRow, UserValues};
use super::schema::users;
use crate::domain::ports::{StoreError, UserStore};
use crate::domain::{Page, User, UserFilter, page_window};

type UserPageQuery =
    users::BoxedQuery<'static, Pg, (SqlTypeOf<AsSelect<UserRow, Pg>>, BigInt)>;

/// Newest-first rows matching `filter`, each paired with the matching count
/// before the window applies.
fn page_query(filter: &UserFilter) -> UserPageQuery {
    let mut query = users::table
        .select((UserRow::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .order(users::id.desc())
        .into_boxed();
    if let Some(id) = filter.id {
        query = query.filter(users::id.eq(id));
    }
    if let Some(email) = filter.email.as_deref() {
        query = query.filter(users::email.eq(email.to_owned()));
    }
    if let Some((limit, offset)) = page_window(filter.page, filter.limit) {
        query = query.limit(limit).offset(offset);
    }
    query
}

#[async_trait]
impl UserStore for DieselTransaction {
    async fn insert_user(&mut self, user: &User) -> Result<i64, StoreError> {
        diesel::insert_into(users::table)
            .values(UserValues::from(user))
            .returning(users::id)
            .get_result(self.connection())
            .await
            .map_err(map_store_error)
    }

    async fn find_users(&mut self, filter: &UserFilter) -> Result<Page<User>, StoreError> {
        let rows: Vec<(UserRow, i64)> = page_query(filter)
            .load(self.connection())
            .await
            .map_err(map_store_error)?;
        let total = rows.as_slice().first().map_or(0, |(_, total)| *total);
        Ok(Page::new(
            rows.into_iter().map(|(row, _)| User::from(row)).collect(),
            total,
        ))
    }

    async fn update_user(&mut self, user: &User) -> Result<(), StoreError> {
        diesel::update(users::table.find(user.id))
            .set(UserValues::from(user))
            .execute(self.connection())
            .await
            .map(|_| ())
            .map_err(map_store_error)
    }

    async fn delete_user(&mut self, id: i64) -> Result<(), StoreError> {
        diesel::delete(users::table.find(id))
            .execute(self.connection())
            .await
            .map(|_| ())
            .map_err(map_store_error)
    }
}
