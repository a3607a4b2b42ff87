use std::collections::{HashMap, HashSet};

use bson::{Bson, Document};
use co2_client::codec::display_text;
use co2_client::{ClientError, CollectionClient, FindQuery};

pub const ID_FIELD: &str = "_id";
const DEFAULT_DISPLAY_FIELD: &str = "nome";
const DISPLAY_FIELD_OVERRIDES: &[(&str, &str)] = &[("localizacao", "descricao")];

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionItem {
    pub label: String,
    pub id: Bson,
}

/// Label -> `_id` choices for one collection, in the order the documents
/// were returned.
///
/// Labels are unique. When several documents share a display value, each of
/// them is labelled `"<value> (<id>)"` instead, with a `" [n]"` suffix if
/// that text is already some other entry's label, so no identifier becomes
/// unreachable. `collisions()` counts the entries that were relabelled.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionMap {
    collection: String,
    display_field: String,
    items: Vec<SelectionItem>,
    collisions: usize,
}

impl SelectionMap {
    pub fn new(
        collection: impl Into<String>,
        display_field: impl Into<String>,
        entries: Vec<(String, Bson)>,
    ) -> Self {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (label, _) in &entries {
            *seen.entry(label.as_str()).or_default() += 1;
        }
        let duplicated: Vec<bool> = entries
            .iter()
            .map(|(label, _)| seen[label.as_str()] > 1)
            .collect();

        // Unique display values keep their label; relabelled entries take
        // whatever is left.
        let mut taken: HashSet<String> = entries
            .iter()
            .zip(&duplicated)
            .filter(|(_, dup)| !**dup)
            .map(|((label, _), _)| label.clone())
            .collect();

        let mut collisions = 0;
        let items = entries
            .into_iter()
            .zip(duplicated)
            .map(|((label, id), dup)| {
                if !dup {
                    return SelectionItem { label, id };
                }
                collisions += 1;
                let base = format!("{label} ({})", display_text(&id));
                let mut candidate = base.clone();
                let mut n = 2;
                while !taken.insert(candidate.clone()) {
                    candidate = format!("{base} [{n}]");
                    n += 1;
                }
                SelectionItem {
                    label: candidate,
                    id,
                }
            })
            .collect();

        Self {
            collection: collection.into(),
            display_field: display_field.into(),
            items,
            collisions,
        }
    }

    pub fn empty(collection: impl Into<String>) -> Self {
        Self::new(collection, ID_FIELD, Vec::new())
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn display_field(&self) -> &str {
        &self.display_field
    }

    pub fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|i| i.label.as_str())
    }

    pub fn id_for(&self, label: &str) -> Option<&Bson> {
        self.items.iter().find(|i| i.label == label).map(|i| &i.id)
    }

    pub fn collisions(&self) -> usize {
        self.collisions
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn preferred_display_field(collection: &str) -> &'static str {
    DISPLAY_FIELD_OVERRIDES
        .iter()
        .find(|(name, _)| *name == collection)
        .map_or(DEFAULT_DISPLAY_FIELD, |(_, field)| *field)
}

/// Keep `preferred` unless the sampled document exists and lacks it, in
/// which case labels fall back to the identifier.
pub fn choose_display_field<'a>(preferred: &'a str, sample: Option<&Document>) -> &'a str {
    match sample {
        Some(doc) if !doc.contains_key(preferred) => ID_FIELD,
        _ => preferred,
    }
}

/// Probe one document, pick the display field, then fetch every
/// `{_id, display}` pair. Uncached; errors propagate.
pub fn build_selection_map<C>(client: &C, collection: &str) -> Result<SelectionMap, ClientError>
where
    C: CollectionClient + ?Sized,
{
    let sample = client.find_one(collection, &FindQuery::all())?;
    let display_field = choose_display_field(preferred_display_field(collection), sample.as_ref());

    let docs = client.find(collection, &FindQuery::all().project([display_field]))?;
    let mut entries = Vec::with_capacity(docs.len());
    for doc in docs {
        let Some(id) = doc.get(ID_FIELD).cloned() else {
            continue;
        };
        let label = doc
            .get(display_field)
            .map_or_else(|| display_text(&id), display_text);
        entries.push((label, id));
    }

    let map = SelectionMap::new(collection, display_field, entries);
    if map.collisions() > 0 {
        tracing::warn!(
            collection,
            display_field,
            collisions = map.collisions(),
            "duplicate display values, labels disambiguated by id"
        );
    }
    Ok(map)
}
