//! Chapter/segment lookup inside a media composition

use tracing::debug;

use crate::composition::{Chapter, MediaComposition, Segment};
use crate::error::ResolveError;
use crate::urn::Identifier;

/// The node a request resolved to.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    pub chapter: &'a Chapter,
    /// Position of `chapter` in the chapter list.
    pub chapter_index: usize,
    /// Set when the request named a segment of `chapter`.
    pub segment: Option<&'a Segment>,
}

/// Find the chapter, and possibly the segment, that `requested_id` denotes.
///
/// `chapterUrn`/`segmentUrn` on the document take precedence over the
/// requested id. First match wins.
pub fn locate<'a>(
    composition: &'a MediaComposition,
    requested_id: &str,
) -> Result<Located<'a>, ResolveError> {
    let chapter_id = urn_field_id(composition.chapter_urn.as_deref())
        .unwrap_or_else(|| requested_id.to_string());

    let (chapter_index, chapter) = composition
        .chapter_list
        .iter()
        .enumerate()
        .find(|(_, chapter)| chapter.id() == chapter_id)
        .ok_or_else(|| ResolveError::ChapterNotFound { id: chapter_id.clone() })?;

    if requested_id == chapter_id {
        debug!(chapter = %chapter_id, "Located chapter");
        return Ok(Located {
            chapter,
            chapter_index,
            segment: None,
        });
    }

    let segment_id = urn_field_id(composition.segment_urn.as_deref())
        .unwrap_or_else(|| requested_id.to_string());

    let segment = chapter
        .segment_list
        .iter()
        .find(|segment| segment.id() == segment_id)
        .ok_or(ResolveError::SegmentNotFound { id: segment_id })?;

    debug!(chapter = %chapter_id, segment = %segment.id(), "Located segment");
    Ok(Located {
        chapter,
        chapter_index,
        segment: Some(segment),
    })
}

fn urn_field_id(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| Identifier::parse(v).local_id().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composition(json: &str) -> MediaComposition {
        serde_json::from_str(json).unwrap()
    }

    const TWO_CHAPTERS: &str = r#"{
        "chapterList": [
            {"id": "ch1", "segmentList": [{"id": "s1"}, {"id": "s2"}]},
            {"id": "ch2", "segmentList": [{"id": "s3"}]}
        ]
    }"#;

    #[test]
    fn test_every_present_chapter_is_found() {
        let doc = composition(TWO_CHAPTERS);
        for (index, id) in ["ch1", "ch2"].iter().enumerate() {
            let located = locate(&doc, id).unwrap();
            assert_eq!(located.chapter.id(), *id);
            assert_eq!(located.chapter_index, index);
            assert!(located.segment.is_none());
        }
    }

    #[test]
    fn test_absent_chapter_fails() {
        let doc = composition(r#"{"chapterList": []}"#);
        let err = locate(&doc, "xyz").unwrap_err();
        assert!(matches!(err, ResolveError::ChapterNotFound { ref id } if id == "xyz"));
    }

    #[test]
    fn test_segment_via_document_urns() {
        let doc = composition(
            r#"{
                "chapterUrn": "urn:srf:video:ch2",
                "segmentUrn": "urn:srf:video:s3",
                "chapterList": [{"id": "ch1"}, {"id": "ch2", "segmentList": [{"id": "s3"}]}]
            }"#,
        );
        let located = locate(&doc, "s3").unwrap();
        assert_eq!(located.chapter.id(), "ch2");
        assert_eq!(located.segment.unwrap().id(), "s3");
    }

    #[test]
    fn test_segment_falls_back_to_requested_id() {
        let doc = composition(
            r#"{
                "chapterUrn": "urn:srf:video:ch1",
                "chapterList": [{"id": "ch1", "segmentList": [{"id": "s1"}, {"id": "s2"}]}]
            }"#,
        );
        for id in ["s1", "s2"] {
            assert_eq!(locate(&doc, id).unwrap().segment.unwrap().id(), id);
        }
        let err = locate(&doc, "s9").unwrap_err();
        assert!(matches!(err, ResolveError::SegmentNotFound { ref id } if id == "s9"));
    }

    #[test]
    fn test_chapter_urn_not_in_list() {
        let doc = composition(
            r#"{"chapterUrn": "urn:srf:video:gone", "chapterList": [{"id": "ch1"}]}"#,
        );
        let err = locate(&doc, "ch1").unwrap_err();
        assert!(matches!(err, ResolveError::ChapterNotFound { ref id } if id == "gone"));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let doc = composition(
            r#"{"chapterList": [{"id": "dup", "title": "first"}, {"id": "dup", "title": "second"}]}"#,
        );
        let located = locate(&doc, "dup").unwrap();
        assert_eq!(located.chapter.info.title.as_deref(), Some("first"));
        assert_eq!(located.chapter_index, 0);
    }
}
