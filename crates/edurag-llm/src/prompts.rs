//! Prompt builders for profile building and grading.
//!
//! All prompts instruct the model in Hebrew and demand a single JSON object
//! back. User payloads carry the course documents as a registry listing
//! followed by delimited text blobs, so the model can cite by `doc_id`.

use edurag_core::models::{Document, Solution, TrainerMode};
use serde_json::json;

/// Sampling temperature for profile, terminology, and solutions extraction.
pub const TEMP_EXTRACTION: f64 = 0.1;

/// Sampling temperature for grading.
pub const TEMP_GRADING: f64 = 0.2;

/// A retrieved snippet handed to the grading prompt.
#[derive(Debug, Clone)]
pub struct GroundingSnippet {
    pub doc_id: String,
    pub page: Option<u32>,
    pub topic: Option<String>,
    pub text: String,
}

/// System prompt for building the course profile.
pub fn profile_system_prompt() -> String {
    "אתה מנתח חומרי קורס אקדמיים בעברית ובונה פרופיל קורס מובנה.\n\
     קלט: רשימת מסמכים (DOC_REGISTRY) והטקסט המלא שלהם (TEXT_BLOBS).\n\
     מסמכי knowledge הם חומר הלימוד המוסמך; מסמכי style הם בחינות פתורות לדוגמה.\n\
     החזר אובייקט JSON יחיד בלבד, ללא טקסט נוסף, במבנה:\n\
     {\"course_profile\": {\"meta\": {...}, \"knowledge_brain\": {\"doctrines\": [], \
     \"statutes\": [], \"precedents\": [], \"topic_map\": []}, \
     \"style_brain\": {\"structure\": {}, \"voice_signature\": {}, \"grading_rubric\": {}, \
     \"style_sources\": []}}}\n\
     כל פריט חייב לכלול doc_id ומספר עמוד או ציטוט מדויק מהמקור. \
     אל תמציא תוכן שאינו מופיע במסמכים."
        .to_string()
}

/// System prompt for the terminology extraction call.
pub fn terminology_system_prompt() -> String {
    "אתה מחלץ מונחים קנוניים מחומרי קורס בעברית.\n\
     החזר אובייקט JSON יחיד: {\"terminology\": {\"canonical_terms\": [...]}}.\n\
     לכל מונח: canonical (הצורה המחייבת), aliases, definition קצרה, source עם doc_id \
     וציטוט מדויק, ו-reliability בין 0 ל-1.\n\
     העדף מונחים ממסמכי style כאשר הם סותרים ניסוח במסמכי knowledge."
        .to_string()
}

/// System prompt for extracting the solutions bank from style documents.
pub fn solutions_system_prompt() -> String {
    "אתה מחלץ פתרונות מלאים מתוך בחינות פתורות (מסמכי style).\n\
     החזר אובייקט JSON יחיד: {\"solutions_bank\": {\"enabled\": true, \"solutions\": [...]}}.\n\
     לכל פתרון: solution_id (S1-Q1 וכן הלאה), label, question_hint, answer_text \
     (הפתרון המלא כלשונו), ו-sources עם doc_id וציטוט.\n\
     העתק את נוסח הפתרון במדויק. אם אין פתרונות במסמכים, החזר רשימה ריקה."
        .to_string()
}

/// System prompt for grading in the given mode.
pub fn grading_system_prompt(mode: TrainerMode) -> String {
    let mode_clause = match mode {
        TrainerMode::Coach => {
            "מצב coach: בנוסף לאבחון, כתוב תשובה משופרת מלאה (improved_answer) \
             בקול ובמבנה של פתרונות הקורס."
        }
        TrainerMode::Examiner => {
            "מצב examiner: אבחן ותן רמזים ממוקדים בלבד. אל תכתוב תשובה משופרת \
             ואל תחשוף את הפתרון המלא."
        }
        TrainerMode::ExamRetry => {
            "מצב exam_retry: השווה את תשובת הסטודנט לפתרון הרלוונטי מבנק הפתרונות. \
             מלא comparison_to_solution עם solution_id, coverage_score, נקודות חסרות \
             ועודפות, והערות פער סגנון."
        }
    };

    format!(
        "אתה מאמן אקדמי הבודק תשובת סטודנט מול פרופיל הקורס וקטעי מקור מצורפים.\n\
         {}\n\
         החזר אובייקט JSON יחיד: {{\"trainer_result\": {{\"mode\": \"{}\", \
         \"score\": {{\"total\": 0-100, \"breakdown\": {{...}}}}, \"diagnostics\": [...], \
         \"sharpening_paragraph\": {{...}}, \"next_drill\": {{...}}, \
         \"telemetry_updates\": {{...}}}}}}.\n\
         כל אבחנה חייבת evidence עם doc_id וציטוט מדויק מקטעי המקור. \
         השתמש אך ורק במונחים הקנוניים של הקורס.",
        mode_clause, mode
    )
}

/// Pack course documents into the registry + blobs payload.
///
/// With `only_style`, knowledge documents are listed in the registry but
/// their text is omitted, keeping the solutions-extraction payload small.
pub fn pack_documents(docs: &[Document], only_style: bool) -> String {
    let registry: Vec<_> = docs
        .iter()
        .map(|d| {
            json!({
                "doc_id": d.id.0,
                "type": d.doc_type.to_string(),
                "name": d.name,
            })
        })
        .collect();

    let mut out = String::from("=== DOC_REGISTRY ===\n");
    out.push_str(&serde_json::to_string_pretty(&registry).unwrap_or_default());
    out.push_str("\n\n=== TEXT_BLOBS ===\n");

    for doc in docs {
        if only_style && doc.doc_type == edurag_core::models::DocType::Knowledge {
            continue;
        }
        out.push_str(&format!("--- {} | {} ---\n", doc.id, doc.name));
        out.push_str(&doc.text);
        out.push_str("\n\n");
    }

    out
}

/// Pack retrieved snippets into the grounding block of a grading payload.
pub fn pack_grounding(snippets: &[GroundingSnippet]) -> String {
    let mut out = String::from("=== GROUNDING_SNIPPETS ===\n");
    for snippet in snippets {
        let anchor = match (&snippet.page, &snippet.topic) {
            (Some(page), _) => format!("עמוד {}", page),
            (None, Some(topic)) => topic.clone(),
            (None, None) => String::new(),
        };
        out.push_str(&format!("--- {} | {} ---\n", snippet.doc_id, anchor));
        out.push_str(&snippet.text);
        out.push_str("\n\n");
    }
    out
}

/// Build the grading user payload: profile context, question, student answer,
/// optional solutions, and retrieved grounding.
pub fn grading_user_payload(
    profile_json: &str,
    question: &str,
    student_answer: &str,
    solutions: &[Solution],
    grounding: &[GroundingSnippet],
) -> String {
    let mut out = String::from("=== COURSE_PROFILE ===\n");
    out.push_str(profile_json);
    out.push_str("\n\n=== QUESTION ===\n");
    out.push_str(question);
    out.push_str("\n\n=== STUDENT_ANSWER ===\n");
    out.push_str(student_answer);
    out.push('\n');

    if !solutions.is_empty() {
        out.push_str("\n=== SOLUTIONS_BANK ===\n");
        out.push_str(&serde_json::to_string_pretty(solutions).unwrap_or_default());
        out.push('\n');
    }

    if !grounding.is_empty() {
        out.push('\n');
        out.push_str(&pack_grounding(grounding));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use edurag_core::models::{DocId, DocType};

    fn doc(id: &str, doc_type: DocType, text: &str) -> Document {
        Document {
            id: DocId(id.to_string()),
            doc_type,
            name: format!("{}.txt", id),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_pack_documents_includes_registry_and_blobs() {
        let docs = vec![
            doc("K1", DocType::Knowledge, "חומר ידע"),
            doc("S1", DocType::Style, "בחינה פתורה"),
        ];
        let payload = pack_documents(&docs, false);

        assert!(payload.contains("DOC_REGISTRY"));
        assert!(payload.contains("\"doc_id\": \"K1\""));
        assert!(payload.contains("--- K1 | K1.txt ---"));
        assert!(payload.contains("חומר ידע"));
        assert!(payload.contains("בחינה פתורה"));
    }

    #[test]
    fn test_pack_documents_only_style_skips_knowledge_text() {
        let docs = vec![
            doc("K1", DocType::Knowledge, "חומר ידע"),
            doc("S1", DocType::Style, "בחינה פתורה"),
        ];
        let payload = pack_documents(&docs, true);

        // Registry still lists both; only the style blob is included.
        assert!(payload.contains("\"doc_id\": \"K1\""));
        assert!(!payload.contains("חומר ידע"));
        assert!(payload.contains("בחינה פתורה"));
    }

    #[test]
    fn test_grading_payload_sections() {
        let grounding = vec![GroundingSnippet {
            doc_id: "K1".to_string(),
            page: Some(3),
            topic: None,
            text: "קטע מקור".to_string(),
        }];
        let payload = grading_user_payload("{}", "שאלה", "תשובה", &[], &grounding);

        assert!(payload.contains("=== QUESTION ==="));
        assert!(payload.contains("=== STUDENT_ANSWER ==="));
        assert!(payload.contains("=== GROUNDING_SNIPPETS ==="));
        assert!(payload.contains("עמוד 3"));
        assert!(!payload.contains("SOLUTIONS_BANK"));
    }

    #[test]
    fn test_grading_prompt_names_mode() {
        assert!(grading_system_prompt(TrainerMode::ExamRetry).contains("exam_retry"));
        assert!(grading_system_prompt(TrainerMode::Coach).contains("coach"));
    }
}
