use serde::{Deserialize, Serialize};

/// An ordered, speaker-homogeneous run of text produced by merging.
/// Transient: exists only between merging and classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub text: String,
    pub speaker: String,
}

/// Structured scheme classification for one segment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArgumentAnalysis {
    /// Argumentation scheme per Walton's taxonomy
    pub scheme: String,
    /// Ordered premises, possibly empty
    pub premises: Vec<String>,
    pub conclusion: String,
    /// Standard challenges associated with the scheme
    pub critical_questions: Vec<String>,
}

/// The unit of the final graph.
///
/// `id` is dense and 0-based, assigned in classification order, and equals the
/// argument's position in the arguments list at creation time. Ids are never
/// reused or renumbered, so every edge references a valid id for the lifetime
/// of one analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Argument {
    pub id: usize,
    pub text: String,
    pub speaker: String,
    pub scheme: String,
    pub premises: Vec<String>,
    pub conclusion: String,
    pub critical_questions: Vec<String>,
}

impl Argument {
    /// Combine a segment with its classification under the given id
    pub fn from_analysis(id: usize, segment: &Segment, analysis: ArgumentAnalysis) -> Self {
        Self {
            id,
            text: segment.text.clone(),
            speaker: segment.speaker.clone(),
            scheme: analysis.scheme,
            premises: analysis.premises,
            conclusion: analysis.conclusion,
            critical_questions: analysis.critical_questions,
        }
    }
}

/// Closed relation taxonomy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    Support,
    Attack,
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationType::Support => write!(f, "support"),
            RelationType::Attack => write!(f, "attack"),
        }
    }
}

/// A directed edge between two arguments, by id.
///
/// source == target is possible (degenerate but accepted); out-of-range ids
/// are an integrity fault caught at graph assembly, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relation {
    pub source: usize,
    pub target: usize,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_from_analysis() {
        let segment = Segment {
            text: "We must act now.".to_string(),
            speaker: "A".to_string(),
        };
        let analysis = ArgumentAnalysis {
            scheme: "Argument from Consequences".to_string(),
            premises: vec!["Delay is costly.".to_string()],
            conclusion: "We must act now.".to_string(),
            critical_questions: vec!["How likely are the consequences?".to_string()],
        };

        let arg = Argument::from_analysis(3, &segment, analysis);

        assert_eq!(arg.id, 3);
        assert_eq!(arg.speaker, "A");
        assert_eq!(arg.text, "We must act now.");
        assert_eq!(arg.premises.len(), 1);
    }

    #[test]
    fn test_relation_type_serialization() {
        let relation = Relation {
            source: 0,
            target: 1,
            relation_type: RelationType::Attack,
        };

        let json = serde_json::to_value(&relation).unwrap();
        assert_eq!(json["type"], "attack");

        let parsed: Relation = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.relation_type, RelationType::Attack);
    }
}
