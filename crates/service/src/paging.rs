//! Page fetching shared by listing operations.
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Select};

use crate::errors::ServiceError;
use common::pagination::Pagination;
use common::types::Page;

/// Run `query` for one page and report the total row count alongside it.
pub async fn fetch_page<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    opts: Pagination,
) -> Result<Page<E::Model>, ServiceError>
where
    E: EntityTrait,
    E::Model: Sync,
{
    let (page_idx, per_page) = opts.normalize();
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await.map_err(|e| ServiceError::Db(e.to_string()))?;
    let items = paginator.fetch_page(page_idx).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(Page { items, page: page_idx + 1, per_page, total })
}
