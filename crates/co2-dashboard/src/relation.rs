use bson::Bson;
use co2_client::{CollectionClient, FindQuery};

use crate::catalog::RelationQuery;
use crate::selection::ID_FIELD;
use crate::state::Resolution;

/// Fetch the `target` documents pointing at `source_id`, minus the join
/// column and their own `_id`.
pub fn resolve_relation<C>(client: &C, query: &RelationQuery, source_id: &Bson) -> Resolution
where
    C: CollectionClient + ?Sized,
{
    let result = client
        .find(
            query.target,
            &FindQuery::eq(query.filter_field, source_id.clone()),
        )
        .map(|rows| {
            rows.into_iter()
                .map(|mut row| {
                    row.remove(query.filter_field);
                    row.remove(ID_FIELD);
                    row
                })
                .collect()
        });

    if let Err(e) = &result {
        tracing::warn!(
            query = query.key,
            target = query.target,
            error = %e,
            "relation fetch failed"
        );
    }
    Resolution::from_fetch(result)
}
