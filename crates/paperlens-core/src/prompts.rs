//! Fixed instructions and payload builders for each model exchange.

/// An instruction paired with the dynamic payload it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub instruction: String,
    pub payload: String,
}

pub const SEGMENT_PAPER: &str = r#"You are an expert at analyzing research papers. You will be given the complete text of a research paper.
Organize the text into the sections it already has. Look for headers such as "Introduction", "Methods", "Results" and "Discussion".
Keep all of the original text, paragraph breaks and citations.
Filter out images, tables and any other non-text content.
Repair extraction artifacts: join words broken by hyphenation or stray spaces, e.g. 'total- ly' becomes 'totally' and 'gh ost' becomes 'ghost'.
Return ONLY the section titles and the original, cleaned up text as JSON in this format:
{
    "sections": [
        {
            "title": "section title",
            "originalText": "complete text from the paper"
        }
    ]
}"#;

pub const OVERALL_SUMMARY: &str = r#"Create a condensed, effective summary of the entire paper and name its three key findings.
Return ONLY JSON in this format:
{
    "overallSummary": "condensed, effective summary of the paper",
    "mainFindings": ["key finding 1", "key finding 2", "key finding 3"]
}"#;

pub const SECTION_SUMMARY: &str = r#"Create a detailed summary of this section of a research paper.
Return ONLY JSON in this format:
{
    "sectionSummary": "detailed summary of the section",
    "keyFindings": ["finding 1", "finding 2"]
}"#;

pub const SECTION_REFERENCES: &str = r#"Suggest related topics and references for this section of a research paper.
For the references, find every in-text citation marker in the section and match it to the corresponding entry of the references list. Return each matched reference with the citation number exactly as it appears in the text. If the section contains no citations, return an empty "references" array.
Return ONLY JSON in this format:
{
    "relatedTopics": [
        {
            "title": "topic",
            "description": "description",
            "url": "url"
        }
    ],
    "references": [
        {
            "citation": "citation number",
            "title": "reference title",
            "url": "url"
        }
    ]
}"#;

/// Segment a full paper into titled sections.
pub fn segment_paper(full_text: &str) -> PromptSpec {
    PromptSpec {
        instruction: SEGMENT_PAPER.to_string(),
        payload: full_text.to_string(),
    }
}

pub fn overall_summary(full_text: &str) -> PromptSpec {
    PromptSpec {
        instruction: OVERALL_SUMMARY.to_string(),
        payload: format!("Create a summary of this paper: {full_text}"),
    }
}

pub fn section_summary(section_text: &str) -> PromptSpec {
    PromptSpec {
        instruction: SECTION_SUMMARY.to_string(),
        payload: section_payload(section_text),
    }
}

pub fn section_references(section_text: &str) -> PromptSpec {
    PromptSpec {
        instruction: SECTION_REFERENCES.to_string(),
        payload: section_payload(section_text),
    }
}

fn section_payload(section_text: &str) -> String {
    format!("Analyze this section: {section_text}")
}

/// Translate every string value of `content_json` into `language`.
pub fn translate(content_json: &str, language: &str) -> PromptSpec {
    let instruction = format!(
        "You are a professional translator of scientific writing. \
         Translate every string value of the JSON document you are given into the language \"{language}\". \
         Do not translate or alter URLs, technical terms or citation numbers. \
         Keep every key, the nesting and the number of array elements exactly as they are. \
         Return ONLY the translated JSON document."
    );
    PromptSpec {
        instruction,
        payload: content_json.to_string(),
    }
}
