//! Fixed configuration: the collections exposed in the full view and the
//! relationship queries offered in the sidebar.

use crate::error::DashboardError;

pub const KEYSPACE: &str = "gestao_co2";

pub static COLLECTIONS: [&str; 10] = [
    "cidade",
    "emissor",
    "estado",
    "especie",
    "funcionario",
    "localizacao",
    "organizacao",
    "tipo_emissor",
    "emissores_por_cidade",
    "organizacoes_por_estado",
];

/// A lookup of `target` documents whose `filter_field` holds the `_id` of a
/// chosen `source` document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationQuery {
    pub key: &'static str,
    pub title: &'static str,
    pub source: &'static str,
    pub target: &'static str,
    pub filter_field: &'static str,
}

pub static RELATION_QUERIES: [RelationQuery; 3] = [
    RelationQuery {
        key: "emitters-by-city",
        title: "Find emitters by city",
        source: "cidade",
        target: "emissores_por_cidade",
        filter_field: "id_cidade",
    },
    RelationQuery {
        key: "cities-by-emitter",
        title: "Find cities by emitter",
        source: "emissor",
        target: "cidades_por_emissor",
        filter_field: "id_emissor",
    },
    RelationQuery {
        key: "organizations-by-state",
        title: "Find organizations by state",
        source: "estado",
        target: "organizacoes_por_estado",
        filter_field: "id_estado",
    },
];

pub fn relation_query(key: &str) -> Result<&'static RelationQuery, DashboardError> {
    RELATION_QUERIES
        .iter()
        .find(|q| q.key == key)
        .ok_or_else(|| DashboardError::UnknownQuery(key.to_string()))
}

pub fn collection(name: &str) -> Result<&'static str, DashboardError> {
    COLLECTIONS
        .iter()
        .copied()
        .find(|c| *c == name)
        .ok_or_else(|| DashboardError::UnknownCollection(name.to_string()))
}
