use co2_client::{CollectionClient, FindQuery};

use crate::state::Resolution;

/// Every document of `collection`, unfiltered and unprojected.
pub fn view_all<C>(client: &C, collection: &str) -> Resolution
where
    C: CollectionClient + ?Sized,
{
    let result = client.find(collection, &FindQuery::all());
    match &result {
        Ok(rows) => tracing::debug!(collection, rows = rows.len(), "loaded collection"),
        Err(e) => tracing::warn!(collection, error = %e, "collection fetch failed"),
    }
    Resolution::from_fetch(result)
}
