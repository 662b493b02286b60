use serde::{Deserialize, Serialize};

/// Narrative relation between two titles.
///
/// Only prequel/sequel edges drive season chains; everything else the
/// metadata source reports (side stories, adaptations, ...) is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Prequel,
    Sequel,
    #[serde(other)]
    Other,
}

impl RelationType {
    pub fn from_upstream(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
            Some("PREQUEL") => RelationType::Prequel,
            Some("SEQUEL") => RelationType::Sequel,
            _ => RelationType::Other,
        }
    }
}

/// Target of a relation edge, identified by metadata-source id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RelationNode {
    pub id: u32,
    pub format: Option<String>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationEdge {
    pub relation_type: RelationType,
    pub node: RelationNode,
}

impl RelationEdge {
    pub fn new(relation_type: RelationType, id: u32, format: Option<&str>, title: &str) -> Self {
        Self {
            relation_type,
            node: RelationNode {
                id,
                format: format.map(str::to_string),
                title: title.to_string(),
            },
        }
    }

    pub fn prequel(id: u32, format: Option<&str>, title: &str) -> Self {
        Self::new(RelationType::Prequel, id, format, title)
    }

    pub fn sequel(id: u32, format: Option<&str>, title: &str) -> Self {
        Self::new(RelationType::Sequel, id, format, title)
    }
}
