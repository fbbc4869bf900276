use memopa_core::codec::marker::{decode, decode_preserving, encode, plain_text};
use memopa_core::{Segment, SegmentId};

fn shape(segments: &[Segment]) -> Vec<(bool, String, String)> {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Text { content, .. } => (true, content.clone(), String::new()),
            Segment::Card { title, body, .. } => (false, title.clone(), body.clone()),
        })
        .collect()
}

#[test]
fn decode_of_encode_keeps_contents_and_order() {
    let segments = vec![
        Segment::text("intro\n"),
        Segment::card("Entropy", "A measure of disorder."),
        Segment::text("middle "),
        Segment::card("Second", "multi\nline body"),
        Segment::text("tail"),
    ];

    let decoded = decode(&encode(&segments));

    assert_eq!(shape(&decoded), shape(&segments));
}

#[test]
fn encode_decode_encode_is_byte_stable() {
    let content = "a[CARD:x:::T1|||B1]b\n[CARD:y:::T2|||B2]";
    let once = encode(&decode(content));
    let twice = encode(&decode(&once));
    assert_eq!(once, content);
    assert_eq!(twice, once);
}

#[test]
fn unterminated_marker_stays_plain_text() {
    let content = "abc[CARD:not-a-valid-markerxyz";
    let segments = decode(content);
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].text_content(), Some(content));
}

#[test]
fn end_to_end_example_decodes_three_segments() {
    let segments = decode("Hello [CARD:abc:::Title|||Body] World");
    assert_eq!(
        shape(&segments),
        vec![
            (true, "Hello ".to_string(), String::new()),
            (false, "Title".to_string(), "Body".to_string()),
            (true, " World".to_string(), String::new()),
        ]
    );
    assert_eq!(segments[1].id().as_str(), "abc");
}

#[test]
fn stripping_markers_yields_run_contents() {
    let content = "one [CARD:a:::T|||B]two [CARD:broken] three";
    let segments = decode(content);
    assert_eq!(plain_text(&segments), "one two [CARD:broken] three");
}

#[test]
fn reparse_keeps_ids_of_unchanged_runs() {
    let first = decode("head[CARD:c:::T|||B]tail");
    let head_id = first[0].id().clone();
    let tail_id = first[2].id().clone();

    let reparsed = decode_preserving("head[CARD:c:::T|||B]tail", &first);

    assert_eq!(reparsed[0].id(), &head_id);
    assert_eq!(reparsed[1].id(), &SegmentId::parse("c").unwrap());
    assert_eq!(reparsed[2].id(), &tail_id);
}
