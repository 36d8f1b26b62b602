use serde::Deserialize;
use serde_json::json;

use crate::models::{Argument, Relation, Segment};

/// System prompt for the merge-refinement call
pub const MERGE_SYSTEM_PROMPT: &str =
    "You are a debate analysis assistant specializing in argument segmentation.";

/// System prompt for classification and relation inference
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a debate analysis assistant.";

/// One reasoning step in the merge-refinement response
#[derive(Debug, Clone, Deserialize)]
pub struct MergeStep {
    pub explanation: String,
    pub output: String,
}

/// Step-by-step merge-refinement response; only `final_answer` is consumed
#[derive(Debug, Clone, Deserialize)]
pub struct MergedSegmentsResponse {
    pub steps: Vec<MergeStep>,
    pub final_answer: Vec<Segment>,
}

/// Relation-inference response wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct RelationsResponse {
    pub relations: Vec<Relation>,
}

/// Build the user prompt asking the model to refine locally-merged segments
pub fn build_merge_prompt(segments: &[Segment]) -> String {
    format!(
        "Analyze the following segments from a debate transcript. **Exclude any \
         interjections** and ensure that **only segments from the same speaker are \
         merged** into a given argument.\n\n{}\n\nIdentify which segments belong to \
         the same argument and should be merged. **Only merge segments that have the \
         same 'speaker'.**\n\nReturn a list of merged arguments, where each argument \
         is represented as an object with 'text' and 'speaker' keys.",
        serde_json::to_string_pretty(segments).unwrap_or_default()
    )
}

/// JSON schema for the merge-refinement response
pub fn merge_response_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "steps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "explanation": {"type": "string"},
                        "output": {"type": "string"}
                    },
                    "required": ["explanation", "output"],
                    "additionalProperties": false
                }
            },
            "final_answer": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "text": {"type": "string"},
                        "speaker": {"type": "string"}
                    },
                    "required": ["text", "speaker"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["steps", "final_answer"],
        "additionalProperties": false
    })
}

/// Build the user prompt for classifying one segment's argumentation scheme
pub fn build_classification_prompt(segment: &Segment) -> String {
    format!(
        "Analyze the following argument from a debate:\n\
         Speaker: {}\n\
         Text: \"{}\"\n\n\
         Provide the following information:\n\
         1. The argumentation scheme according to Walton's framework\n\
         2. The premises of the argument\n\
         3. The conclusion of the argument\n\
         4. Critical questions relevant to this argument scheme",
        segment.speaker, segment.text
    )
}

/// JSON schema for the per-segment classification response
pub fn classification_response_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "scheme": {"type": "string"},
            "premises": {"type": "array", "items": {"type": "string"}},
            "conclusion": {"type": "string"},
            "critical_questions": {"type": "array", "items": {"type": "string"}}
        },
        "required": ["scheme", "premises", "conclusion", "critical_questions"],
        "additionalProperties": false
    })
}

/// Build the user prompt for the single relation-inference call
pub fn build_relations_prompt(arguments: &[Argument]) -> String {
    format!(
        "Analyze the relationships between the following arguments in a debate:\n\n\
         {}\n\n\
         For each pair of arguments, determine if there is a support or attack \
         relationship or if they are unrelated. Return only the related pairs, \
         referencing arguments by their integer 'id'.",
        serde_json::to_string_pretty(arguments).unwrap_or_default()
    )
}

/// JSON schema for the relation-inference response
pub fn relations_response_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "relations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "source": {"type": "integer"},
                        "target": {"type": "integer"},
                        "type": {"type": "string", "enum": ["support", "attack"]}
                    },
                    "required": ["source", "target", "type"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["relations"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prompt_embeds_segments() {
        let segments = vec![Segment {
            text: "I think X.".to_string(),
            speaker: "A".to_string(),
        }];

        let prompt = build_merge_prompt(&segments);

        assert!(prompt.contains("I think X."));
        assert!(prompt.contains("Only merge segments"));
    }

    #[test]
    fn test_classification_prompt_names_speaker() {
        let segment = Segment {
            text: "Because Y.".to_string(),
            speaker: "B".to_string(),
        };

        let prompt = build_classification_prompt(&segment);

        assert!(prompt.contains("Speaker: B"));
        assert!(prompt.contains("Walton's framework"));
    }

    #[test]
    fn test_relations_schema_restricts_type() {
        let schema = relations_response_schema();
        let type_enum = &schema["properties"]["relations"]["items"]["properties"]["type"]["enum"];
        assert_eq!(type_enum[0], "support");
        assert_eq!(type_enum[1], "attack");
    }
}
