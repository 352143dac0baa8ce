use crate::age::normalize_age_at;
use crate::error::ParseError;
use crate::extract::extract_all;
use crate::types::{LIVE_LENGTH, ResultRecord, Text, VideoRenderer};
use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;

const VIDEO_RENDERER: &str = "videoRenderer";
/// Channel cards, shelves and ads share the renderer shape but never carry an
/// upload age, so its presence marks a real video result.
const PUBLISHED_TIME: &str = "publishedTimeText";

/// Turn a results page's initial data into records, stamped with the current time.
pub fn parse_page(page_data: &Value) -> Result<Vec<ResultRecord>, ParseError> {
    parse_page_at(page_data, Local::now())
}

/// Same as [`parse_page`] with an explicit clock.
///
/// Candidates without a published time are skipped. Any other gap in a
/// candidate, or an age that does not normalise, fails the whole page.
pub fn parse_page_at(
    page_data: &Value,
    now: DateTime<Local>,
) -> Result<Vec<ResultRecord>, ParseError> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for candidate in extract_all(VIDEO_RENDERER, page_data) {
        if candidate.get(PUBLISHED_TIME).is_none() {
            skipped += 1;
            continue;
        }
        records.push(build_record(candidate, now)?);
    }

    tracing::debug!(
        target: "youtube.parse",
        records = records.len(),
        skipped,
        "youtube.parse.page"
    );
    Ok(records)
}

fn build_record(candidate: &Value, now: DateTime<Local>) -> Result<ResultRecord, ParseError> {
    let raw_id = candidate
        .get("videoId")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>");

    let renderer = VideoRenderer::deserialize(candidate).map_err(|e| ParseError::MalformedRecord {
        video_id: raw_id.to_string(),
        field: VIDEO_RENDERER,
        reason: e.to_string(),
    })?;

    let missing = |field: &'static str| ParseError::MalformedRecord {
        video_id: raw_id.to_string(),
        field,
        reason: "is missing or empty".to_string(),
    };

    let video_id = renderer
        .video_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| missing("videoId"))?;
    let age_display = renderer
        .published_time_text
        .as_ref()
        .and_then(Text::first)
        .ok_or_else(|| missing(PUBLISHED_TIME))?;
    let title = renderer
        .title
        .as_ref()
        .and_then(Text::first)
        .ok_or_else(|| missing("title"))?;
    let source = [
        &renderer.owner_text,
        &renderer.long_byline_text,
        &renderer.short_byline_text,
    ]
    .into_iter()
    .find_map(|text| text.as_ref().and_then(Text::first))
    .ok_or_else(|| missing("ownerText"))?;
    let length = duration_badge(&renderer).map_err(|()| missing("thumbnailOverlayTimeStatusRenderer"))?;

    let age_seconds = normalize_age_at(age_display, now.date_naive())?;

    Ok(ResultRecord {
        scraped_at: now,
        page_number: 1,
        age_display: age_display.to_string(),
        age_seconds,
        source: source.to_string(),
        title: title.to_string(),
        video_id: video_id.to_string(),
        length: length.to_string(),
    })
}

/// Duration text of the first overlay, or [`LIVE_LENGTH`] when there is no
/// time badge. A badge without text is an error.
fn duration_badge(renderer: &VideoRenderer) -> Result<&str, ()> {
    let badge = renderer
        .thumbnail_overlays
        .as_ref()
        .and_then(|overlays| overlays.first())
        .and_then(|first| first.thumbnail_overlay_time_status_renderer.as_ref());

    match badge {
        None => Ok(LIVE_LENGTH),
        Some(status) => status.text.as_ref().and_then(Text::first).ok_or(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 2, 14, 12, 0, 0).unwrap()
    }

    fn video(id: &str, channel: &str, age: &str, length: Option<&str>) -> Value {
        let overlays = match length {
            Some(l) => json!([
                {"thumbnailOverlayTimeStatusRenderer": {"text": {"simpleText": l}, "style": "DEFAULT"}},
                {"thumbnailOverlayToggleButtonRenderer": {}}
            ]),
            None => json!([{"thumbnailOverlayNowPlayingRenderer": {}}]),
        };
        json!({
            "videoRenderer": {
                "videoId": id,
                "title": {"runs": [{"text": format!("Title {id}")}]},
                "ownerText": {"runs": [{"text": channel}]},
                "publishedTimeText": {"simpleText": age},
                "thumbnailOverlays": overlays
            }
        })
    }

    fn page(items: Vec<Value>) -> Value {
        json!({
            "contents": {
                "twoColumnSearchResultsRenderer": {
                    "primaryContents": {
                        "sectionListRenderer": {
                            "contents": [{"itemSectionRenderer": {"contents": items}}]
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn builds_records_in_page_order() {
        let data = page(vec![
            video("a1", "tagesschau", "vor 3 Stunden", Some("12:34")),
            video("b2", "ZDFheute", "15.01.2023", Some("1:02:03")),
        ]);
        let records = parse_page_at(&data, now()).unwrap();

        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.video_id, "a1");
        assert_eq!(first.source, "tagesschau");
        assert_eq!(first.title, "Title a1");
        assert_eq!(first.age_display, "vor 3 Stunden");
        assert_eq!(first.age_seconds, 10_800);
        assert_eq!(first.length, "12:34");
        assert_eq!(first.page_number, 1);
        assert_eq!(first.scraped_at, now());
        assert_eq!(records[1].age_seconds, 30 * 86_400);
    }

    #[test]
    fn candidates_without_published_time_are_skipped() {
        let mut channel_card = video("c3", "Some Channel", "vor 1 Tag", Some("1:00"));
        channel_card["videoRenderer"]
            .as_object_mut()
            .unwrap()
            .remove("publishedTimeText");
        let data = page(vec![
            channel_card,
            video("d4", "phoenix", "vor 1 Tag", Some("5:00")),
            json!({"videoRenderer": "not even an object"}),
        ]);
        let records = parse_page_at(&data, now()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].video_id, "d4");
    }

    #[test]
    fn no_time_badge_means_live() {
        let data = page(vec![video("e5", "WELT Nachrichtensender", "vor 2 Stunden", None)]);
        let records = parse_page_at(&data, now()).unwrap();
        assert_eq!(records[0].length, LIVE_LENGTH);
        assert!(records[0].is_live());
    }

    #[test]
    fn missing_or_empty_overlays_mean_live() {
        let mut v = video("f6", "ntv", "vor 2 Stunden", Some("3:00"));
        v["videoRenderer"]["thumbnailOverlays"] = json!([]);
        let mut w = video("g7", "ntv", "vor 2 Stunden", Some("3:00"));
        w["videoRenderer"].as_object_mut().unwrap().remove("thumbnailOverlays");
        let records = parse_page_at(&page(vec![v, w]), now()).unwrap();
        assert!(records.iter().all(ResultRecord::is_live));
    }

    #[test]
    fn badge_only_counts_on_first_overlay() {
        let mut v = video("h8", "ARD", "vor 2 Stunden", None);
        v["videoRenderer"]["thumbnailOverlays"] = json!([
            {"thumbnailOverlayNowPlayingRenderer": {}},
            {"thumbnailOverlayTimeStatusRenderer": {"text": {"simpleText": "9:99"}}}
        ]);
        let records = parse_page_at(&page(vec![v]), now()).unwrap();
        assert_eq!(records[0].length, LIVE_LENGTH);
    }

    #[test]
    fn live_badge_with_runs_uses_its_text() {
        let mut v = video("i9", "ARD", "vor 2 Stunden", None);
        v["videoRenderer"]["thumbnailOverlays"] = json!([
            {"thumbnailOverlayTimeStatusRenderer": {"text": {"runs": [{"text": "LIVE"}]}, "style": "LIVE"}}
        ]);
        let records = parse_page_at(&page(vec![v]), now()).unwrap();
        assert_eq!(records[0].length, "LIVE");
    }

    #[test]
    fn records_nested_deeper_are_found() {
        let data = json!({
            "onResponseReceivedCommands": [{
                "appendContinuationItemsAction": {
                    "continuationItems": [{
                        "itemSectionRenderer": {
                            "contents": [
                                {"shelfRenderer": {"content": {"verticalListRenderer": {
                                    "items": [video("j1", "MDR", "vor 5 Tagen", Some("2:00"))]
                                }}}},
                                video("k2", "BR24", "vor 6 Tagen", Some("4:00"))
                            ]
                        }
                    }]
                }
            }]
        });
        let ids: Vec<_> = parse_page_at(&data, now())
            .unwrap()
            .into_iter()
            .map(|r| r.video_id)
            .collect();
        assert_eq!(ids, vec!["j1", "k2"]);
    }

    #[test]
    fn bad_age_fails_the_page() {
        let data = page(vec![
            video("l3", "SWR", "vor 3 Stunden", Some("1:00")),
            video("m4", "SWR", "vor 5 Lichtjahren", Some("1:00")),
        ]);
        let err = parse_page_at(&data, now()).unwrap_err();
        assert!(matches!(err, ParseError::UnknownAgeUnit { .. }));
    }

    #[test]
    fn missing_owner_is_malformed() {
        let mut v = video("n5", "SWR", "vor 3 Stunden", Some("1:00"));
        v["videoRenderer"].as_object_mut().unwrap().remove("ownerText");
        let err = parse_page_at(&page(vec![v]), now()).unwrap_err();
        match err {
            ParseError::MalformedRecord {
                video_id, field, ..
            } => {
                assert_eq!(video_id, "n5");
                assert_eq!(field, "ownerText");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn byline_stands_in_for_owner_text() {
        let mut v = video("o6", "SWR", "vor 3 Stunden", Some("1:00"));
        let obj = v["videoRenderer"].as_object_mut().unwrap();
        obj.remove("ownerText");
        obj.insert(
            "longBylineText".into(),
            json!({"runs": [{"text": "SWR Aktuell"}]}),
        );
        let records = parse_page_at(&page(vec![v]), now()).unwrap();
        assert_eq!(records[0].source, "SWR Aktuell");
    }

    #[test]
    fn empty_title_runs_are_malformed() {
        let mut v = video("p7", "SWR", "vor 3 Stunden", Some("1:00"));
        v["videoRenderer"]["title"] = json!({"runs": []});
        let err = parse_page_at(&page(vec![v]), now()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRecord { field: "title", .. }));
    }

    #[test]
    fn badge_without_text_is_malformed() {
        let mut v = video("q8", "SWR", "vor 3 Stunden", None);
        v["videoRenderer"]["thumbnailOverlays"] =
            json!([{"thumbnailOverlayTimeStatusRenderer": {"style": "DEFAULT"}}]);
        let err = parse_page_at(&page(vec![v]), now()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedRecord {
                field: "thumbnailOverlayTimeStatusRenderer",
                ..
            }
        ));
    }

    #[test]
    fn wrongly_typed_fields_are_malformed() {
        let mut v = video("r9", "SWR", "vor 3 Stunden", Some("1:00"));
        v["videoRenderer"]["videoId"] = json!(42);
        let err = parse_page_at(&page(vec![v]), now()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MalformedRecord {
                field: "videoRenderer",
                ..
            }
        ));
    }

    #[test]
    fn empty_page_has_no_records() {
        assert!(parse_page_at(&json!({}), now()).unwrap().is_empty());
    }
}
