//! Shared pagination, search and sort for every list endpoint.
//!
//! Each resource declares a [`ListSpec`] naming the columns it can be searched
//! on and the allow-list of sortable fields; [`fetch_page`] does the rest.

use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;

use crate::models::shared::{ListParams, Paginated, escape_like};

/// Per-entity list configuration.
pub struct ListSpec<C: 'static> {
    /// Text columns matched by `search`, ORed together.
    pub search: &'static [C],
    /// Sort keys accepted from `sortBy`, mapped to their column.
    pub sort: &'static [(&'static str, C)],
    /// Column used when `sortBy` is absent or not allow-listed.
    pub default_sort: C,
    /// Unique column breaking ties so pages never overlap.
    pub tie_breaker: C,
}

impl<C: ColumnTrait> ListSpec<C> {
    pub fn sort_column(&self, requested: Option<&str>) -> C {
        requested
            .and_then(|name| self.sort.iter().find(|(key, _)| *key == name))
            .map(|(_, col)| *col)
            .unwrap_or(self.default_sort)
    }

    /// Case-insensitive substring match over the search columns.
    pub fn search_condition(&self, search: &str) -> Option<Condition> {
        let term = escape_like(search.trim());
        if term.is_empty() || self.search.is_empty() {
            return None;
        }
        let pattern = format!("%{}%", term.to_lowercase());

        let condition = self.search.iter().fold(Condition::any(), |cond, col| {
            cond.add(
                Expr::expr(Func::lower(Expr::col(col.as_column_ref())))
                    .like(LikeExpr::new(pattern.clone()).escape('\\')),
            )
        });
        Some(condition)
    }
}

/// Count, sort and slice `select` according to `params`.
///
/// The total is taken after the search filter and before limit/offset.
pub async fn fetch_page<E, C>(
    db: &C,
    select: Select<E>,
    spec: &ListSpec<E::Column>,
    params: &ListParams,
) -> Result<Paginated<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let mut select = select;

    if let Some(condition) = params
        .search
        .as_deref()
        .and_then(|s| spec.search_condition(s))
    {
        select = select.filter(condition);
    }

    let total = select.clone().count(db).await?;

    let data = page_of(select, spec, params).all(db).await?;

    Ok(Paginated::new(data, total, params))
}

fn page_of<E: EntityTrait>(
    select: Select<E>,
    spec: &ListSpec<E::Column>,
    params: &ListParams,
) -> Select<E> {
    select
        .order_by(
            spec.sort_column(params.sort_by.as_deref()),
            params.order.clone(),
        )
        .order_by(spec.tie_breaker, params.order.clone())
        .offset(Some(params.offset))
        .limit(Some(params.limit))
}
