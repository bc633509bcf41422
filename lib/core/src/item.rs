use serde::{Deserialize, Serialize};

/// External identifier of a catalog item, as assigned by the upstream data source
///
/// Integer ids are unsigned; catalogs carrying negative ids are rejected at load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Integer(u64),
    String(String),
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Integer(i) => write!(f, "{}", i),
            ItemId::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for ItemId {
    fn from(i: u64) -> Self {
        ItemId::Integer(i)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::String(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::String(s.to_string())
    }
}

/// One catalog entry
///
/// `position` is assigned when the catalog is built and indexes both the
/// catalog and the rows/columns of the similarity matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub position: usize,
}

impl Item {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, position: usize) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_untagged_serde() {
        let ids: Vec<ItemId> = serde_json::from_str(r#"[19995, "tt0499549"]"#).unwrap();
        assert_eq!(ids[0], ItemId::Integer(19995));
        assert_eq!(ids[1], ItemId::String("tt0499549".to_string()));
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[19995,"tt0499549"]"#);
    }

    #[test]
    fn test_item_id_display() {
        assert_eq!(ItemId::from(285).to_string(), "285");
        assert_eq!(ItemId::from("abc").to_string(), "abc");
    }
}
