//! Raw retrieval output -> canonical display record.
//!
//! Both entry points share the de-duplication rule: sources are compared
//! by exact path, pages ignored, first occurrence wins. Passages arrive
//! ranked by descending relevance, so "first" is also "best".

use crate::rag::retrieval::RawRetrievalResult;

use super::record::{DisplayRecord, DocumentSearchRecord, InquiryRecord, SubChoice};
use super::strings;

/// Normalize a document search response.
///
/// The most relevant passage becomes the main citation; every other
/// distinct source becomes a sub-choice in ranking order. An empty context
/// or the no-match sentinel produces a plain-message record with
/// `no_file_path` set.
pub fn document_search(raw: &RawRetrievalResult) -> DisplayRecord {
    if raw.context.is_empty() || raw.answer == strings::NO_DOC_MATCH_ANSWER {
        return DisplayRecord::DocumentSearch(DocumentSearchRecord {
            answer: Some(strings::NO_DOC_MATCH_MESSAGE.to_string()),
            no_file_path: true,
            ..Default::default()
        });
    }

    let main = &raw.context[0];

    let mut sub_choices: Vec<SubChoice> = Vec::new();
    let mut seen_sources: Vec<&str> = Vec::new();
    for passage in &raw.context[1..] {
        // The main document never repeats in the sub-list.
        if passage.source == main.source {
            continue;
        }
        // Multiple passages of one file collapse into its best-ranked hit.
        if seen_sources.contains(&passage.source.as_str()) {
            continue;
        }
        seen_sources.push(passage.source.as_str());
        sub_choices.push(SubChoice {
            source: passage.source.clone(),
            page_number: passage.page,
        });
    }

    let sub_message = if sub_choices.is_empty() {
        None
    } else {
        Some(strings::SUB_DOC_MESSAGE.to_string())
    };

    DisplayRecord::DocumentSearch(DocumentSearchRecord {
        main_message: Some(strings::MAIN_DOC_MESSAGE.to_string()),
        main_file_path: Some(main.source.clone()),
        main_page_number: main.page,
        sub_message,
        sub_choices,
        no_file_path: false,
        answer: None,
    })
}

/// Normalize an inquiry response.
///
/// The generated answer is kept verbatim. Unless the answer is the
/// no-match sentinel, every distinct cited source is formatted into the
/// citation list, pages shown 1-based.
pub fn inquiry(raw: &RawRetrievalResult) -> DisplayRecord {
    if raw.answer == strings::INQUIRY_NO_MATCH_ANSWER {
        return DisplayRecord::Inquiry(InquiryRecord {
            answer: raw.answer.clone(),
            message: None,
            file_info_list: None,
        });
    }

    let mut file_info_list: Vec<String> = Vec::new();
    let mut seen_sources: Vec<&str> = Vec::new();
    for passage in &raw.context {
        if seen_sources.contains(&passage.source.as_str()) {
            continue;
        }
        seen_sources.push(passage.source.as_str());

        let file_info = match passage.page {
            Some(page) => format!("{} (ページNo.{})", passage.source, page + 1),
            None => passage.source.clone(),
        };
        file_info_list.push(file_info);
    }

    DisplayRecord::Inquiry(InquiryRecord {
        answer: raw.answer.clone(),
        message: Some(strings::SOURCE_LABEL.to_string()),
        file_info_list: Some(file_info_list),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::retrieval::RetrievedPassage;

    fn passage(source: &str, page: Option<usize>) -> RetrievedPassage {
        RetrievedPassage {
            source: source.to_string(),
            page,
            content: String::new(),
        }
    }

    fn raw(answer: &str, context: Vec<RetrievedPassage>) -> RawRetrievalResult {
        RawRetrievalResult {
            answer: answer.to_string(),
            context,
        }
    }

    #[test]
    fn main_passage_is_top_ranked_hit() {
        let result = document_search(&raw(
            "some answer",
            vec![
                passage("hr/policy.pdf", Some(2)),
                passage("hr/policy.pdf", Some(5)),
                passage("it/handbook.pdf", None),
            ],
        ));

        let DisplayRecord::DocumentSearch(record) = result else {
            panic!("wrong mode");
        };
        assert_eq!(record.main_file_path.as_deref(), Some("hr/policy.pdf"));
        assert_eq!(record.main_page_number, Some(2));
        assert_eq!(record.main_message.as_deref(), Some(strings::MAIN_DOC_MESSAGE));
        // The second policy.pdf hit equals the main path and is dropped.
        assert_eq!(record.sub_choices.len(), 1);
        assert_eq!(record.sub_choices[0].source, "it/handbook.pdf");
        assert_eq!(record.sub_choices[0].page_number, None);
        assert_eq!(record.sub_message.as_deref(), Some(strings::SUB_DOC_MESSAGE));
        assert!(!record.no_file_path);
        assert!(record.answer.is_none());
    }

    #[test]
    fn main_page_number_absent_when_source_has_none() {
        let result = document_search(&raw("answer", vec![passage("memo.txt", None)]));

        let DisplayRecord::DocumentSearch(record) = result else {
            panic!("wrong mode");
        };
        assert_eq!(record.main_file_path.as_deref(), Some("memo.txt"));
        assert_eq!(record.main_page_number, None);
        assert!(record.sub_choices.is_empty());
        assert!(record.sub_message.is_none());
    }

    #[test]
    fn sub_choices_keep_first_occurrence_per_source_in_order() {
        let result = document_search(&raw(
            "answer",
            vec![
                passage("a.pdf", Some(0)),
                passage("b.pdf", Some(3)),
                passage("c.pdf", None),
                passage("b.pdf", Some(9)),
                passage("a.pdf", Some(4)),
                passage("d.pdf", Some(1)),
            ],
        ));

        let DisplayRecord::DocumentSearch(record) = result else {
            panic!("wrong mode");
        };
        let sources: Vec<&str> = record
            .sub_choices
            .iter()
            .map(|choice| choice.source.as_str())
            .collect();
        assert_eq!(sources, vec!["b.pdf", "c.pdf", "d.pdf"]);
        // b.pdf keeps the page of its highest-ranked occurrence.
        assert_eq!(record.sub_choices[0].page_number, Some(3));
    }

    #[test]
    fn empty_context_yields_no_match_record() {
        let result = document_search(&raw(strings::NO_DOC_MATCH_ANSWER, vec![]));

        let DisplayRecord::DocumentSearch(record) = result else {
            panic!("wrong mode");
        };
        assert!(record.no_file_path);
        assert_eq!(record.answer.as_deref(), Some(strings::NO_DOC_MATCH_MESSAGE));
        assert!(record.main_file_path.is_none());
        assert!(record.main_message.is_none());
        assert!(record.sub_choices.is_empty());
    }

    #[test]
    fn sentinel_answer_overrides_non_empty_context() {
        let result = document_search(&raw(
            strings::NO_DOC_MATCH_ANSWER,
            vec![passage("stale.pdf", Some(1))],
        ));

        let DisplayRecord::DocumentSearch(record) = result else {
            panic!("wrong mode");
        };
        assert!(record.no_file_path);
        assert!(record.main_file_path.is_none());
    }

    #[test]
    fn inquiry_formats_and_deduplicates_citations() {
        let result = inquiry(&raw(
            "result",
            vec![
                passage("a.csv", None),
                passage("a.csv", None),
                passage("b.csv", Some(0)),
            ],
        ));

        let DisplayRecord::Inquiry(record) = result else {
            panic!("wrong mode");
        };
        assert_eq!(record.answer, "result");
        assert_eq!(record.message.as_deref(), Some(strings::SOURCE_LABEL));
        assert_eq!(
            record.file_info_list,
            Some(vec!["a.csv".to_string(), "b.csv (ページNo.1)".to_string()])
        );
    }

    #[test]
    fn inquiry_sentinel_has_no_citation_block() {
        let result = inquiry(&raw(
            strings::INQUIRY_NO_MATCH_ANSWER,
            vec![passage("ignored.pdf", None)],
        ));

        let DisplayRecord::Inquiry(record) = result else {
            panic!("wrong mode");
        };
        assert_eq!(record.answer, strings::INQUIRY_NO_MATCH_ANSWER);
        assert!(record.message.is_none());
        assert!(record.file_info_list.is_none());
    }

    #[test]
    fn inquiry_with_empty_context_keeps_empty_citation_list() {
        let result = inquiry(&raw("answer without sources", vec![]));

        let DisplayRecord::Inquiry(record) = result else {
            panic!("wrong mode");
        };
        assert_eq!(record.file_info_list, Some(vec![]));
        assert_eq!(record.message.as_deref(), Some(strings::SOURCE_LABEL));
    }

    #[test]
    fn missing_answer_is_treated_as_empty_string() {
        // Serde fills a missing answer with "" upstream; "" is not a
        // sentinel, so normalization proceeds over the context.
        let result = document_search(&raw("", vec![passage("a.pdf", None)]));
        let DisplayRecord::DocumentSearch(record) = result else {
            panic!("wrong mode");
        };
        assert_eq!(record.main_file_path.as_deref(), Some("a.pdf"));
    }
}
