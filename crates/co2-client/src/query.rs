use bson::{Bson, Document};

/// A `find` / `find_one` request: an equality filter and an optional
/// inclusion projection. `_id` is always part of the returned documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub filter: Option<Document>,
    pub projection: Option<Vec<String>>,
}

impl FindQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        let mut filter = Document::new();
        filter.insert(field.into(), value.into());
        Self {
            filter: Some(filter),
            projection: None,
        }
    }

    pub fn project<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut projection: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if !projection.contains(&field) {
                projection.push(field);
            }
        }
        self.projection = Some(projection);
        self
    }
}
