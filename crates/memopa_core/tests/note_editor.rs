use memopa_core::editor::clipboard::NoClipboard;
use memopa_core::{CardDraft, EditorMode, Note, NoteEditor, Segment, SegmentId, SelectionRange};

fn open(content: &str) -> NoteEditor {
    NoteEditor::open(Note::new(content), &NoClipboard)
}

fn first_run(editor: &NoteEditor) -> SegmentId {
    editor
        .segments()
        .iter()
        .find(|segment| segment.is_text())
        .map(|segment| segment.id().clone())
        .unwrap()
}

fn card_ids(editor: &NoteEditor) -> Vec<SegmentId> {
    editor
        .segments()
        .iter()
        .filter(|segment| segment.is_card())
        .map(|segment| segment.id().clone())
        .collect()
}

fn assert_invariants(editor: &NoteEditor) {
    let segments = editor.segments();
    assert!(!segments.is_empty());
    assert!(segments.last().unwrap().is_text());
}

#[test]
fn discard_collapses_card_into_newline() {
    let mut editor = open("Hello [CARD:abc:::Title|||Body] World");
    assert_eq!(editor.segments().len(), 3);

    let card_id = SegmentId::parse("abc").unwrap();
    assert!(editor.discard_card(&card_id));
    editor.sync_to_note();

    assert_eq!(editor.note().content, "Hello \n World");
    assert_eq!(editor.segments().len(), 1);
}

#[test]
fn insert_cards_splits_after_selected_line() {
    let mut editor = open("line1\nline2\nline3");
    let run = first_run(&editor);
    editor.set_selection(&run, SelectionRange::new(0, 5));

    assert!(editor.insert_cards(
        &run,
        &[CardDraft::new("T", "B")],
        SelectionRange::new(0, 5)
    ));

    let segments = editor.segments();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].text_content(), Some("line1\n"));
    assert_eq!(segments[0].id(), &run);
    assert!(matches!(
        &segments[1],
        Segment::Card { title, body, .. } if title == "T" && body == "B"
    ));
    assert_eq!(segments[2].text_content(), Some("line2\nline3"));
    assert!(editor.note().content.starts_with("line1\n[CARD:"));
}

#[test]
fn insert_cards_keeps_order_and_exact_card_text() {
    let mut editor = open("term");
    let run = first_run(&editor);

    editor.insert_cards(
        &run,
        &[
            CardDraft::new("a|||b", "x]y [CARD:q:::r|||s] C:\\tmp"),
            CardDraft::new("second", "z"),
        ],
        SelectionRange::default(),
    );

    let cards = editor
        .segments()
        .iter()
        .filter_map(|segment| match segment {
            Segment::Card { title, body, .. } => Some((title.as_str(), body.as_str())),
            Segment::Text { .. } => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        cards,
        vec![
            ("a|||b", "x]y [CARD:q:::r|||s] C:\\tmp"),
            ("second", "z")
        ]
    );
    assert_eq!(editor.segments().len(), 4);
    assert_invariants(&editor);
}

#[test]
fn insert_cards_after_literal_marker_prefix_keeps_text() {
    let mut editor = open("see [CARD: notation");
    let run = first_run(&editor);
    editor.set_selection(&run, SelectionRange::new(0, 3));

    assert!(editor.insert_cards(
        &run,
        &[CardDraft::new("Notation", "How to write it.")],
        SelectionRange::new(0, 3)
    ));

    let segments = editor.segments();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].text_content(), Some("see [CARD: notation"));
    assert_eq!(segments[0].id(), &run);
    assert!(matches!(
        &segments[1],
        Segment::Card { title, body, .. } if title == "Notation" && body == "How to write it."
    ));
    assert!(!segments[1].id().as_str().contains("notation"));
    assert!(editor.note().content.starts_with("see [CARD: notation[CARD:"));
}

#[test]
fn adopting_body_with_marker_prefix_keeps_neighbour_card() {
    let mut editor = open("intro\n");
    let run = first_run(&editor);

    editor.insert_cards(
        &run,
        &[
            CardDraft::new("Tip", "write [CARD: to start"),
            CardDraft::new("Other", "kept"),
        ],
        SelectionRange::default(),
    );
    let ids = card_ids(&editor);
    assert_eq!(ids.len(), 2);

    assert!(editor.adopt_card(&ids[0]));

    assert_eq!(card_ids(&editor), vec![ids[1].clone()]);
    let text: String = editor
        .segments()
        .iter()
        .filter_map(Segment::text_content)
        .collect();
    assert_eq!(text, "intro\n■ Tip\nwrite ［CARD: to start\n");
    assert!(matches!(
        &editor.segments()[1],
        Segment::Card { title, body, .. } if title == "Other" && body == "kept"
    ));
}

#[test]
fn out_of_range_selection_is_clamped() {
    let mut editor = open("hi");
    let run = first_run(&editor);

    let effective = editor
        .set_selection(&run, SelectionRange::new(1000, 1000))
        .unwrap();

    assert_eq!(effective, SelectionRange::new(2, 0));
    assert_eq!(editor.extract_target(&run).as_deref(), Some("hi"));
    assert_eq!(editor.focused_run(), Some(&run));
}

#[test]
fn selection_on_card_or_unknown_id_is_ignored() {
    let mut editor = open("a[CARD:c:::T|||B]");
    let card = SegmentId::parse("c").unwrap();
    assert!(editor.set_selection(&card, SelectionRange::new(0, 1)).is_none());
    assert!(editor
        .set_selection(&SegmentId::mint(), SelectionRange::new(0, 1))
        .is_none());
    assert!(editor.focused_run().is_none());
}

#[test]
fn adopt_renders_heading_and_body_into_text() {
    let mut editor = open("Intro[CARD:c:::Entropy|||Disorder measure.]after");
    let card = SegmentId::parse("c").unwrap();

    assert!(editor.adopt_card(&card));

    assert!(card_ids(&editor).is_empty());
    assert_eq!(
        editor.note().content,
        "Intro\n■ Entropy\nDisorder measure.\nafter"
    );
    assert_eq!(editor.segments().len(), 1);
}

#[test]
fn adopt_and_discard_ignore_unknown_ids() {
    let mut editor = open("text[CARD:c:::T|||B]");
    let before = editor.note().content.clone();
    let run = first_run(&editor);

    assert!(!editor.adopt_card(&SegmentId::mint()));
    assert!(!editor.discard_card(&SegmentId::mint()));
    assert!(!editor.discard_card(&run));

    assert_eq!(editor.note().content, before);
}

#[test]
fn update_text_keeps_run_id_and_syncs_note() {
    let mut editor = open("draft[CARD:c:::T|||B]");
    let run = first_run(&editor);

    assert!(editor.update_text(&run, "final"));

    assert_eq!(editor.segments()[0].id(), &run);
    assert_eq!(editor.note().content, "final[CARD:c:::T|||B]");
    assert!(!editor.update_text(&SegmentId::mint(), "lost"));
}

#[test]
fn update_text_reclamps_recorded_selection() {
    let mut editor = open("hello world");
    let run = first_run(&editor);
    editor.set_selection(&run, SelectionRange::new(6, 5));

    editor.update_text(&run, "hey");

    assert_eq!(editor.selection(&run), Some(SelectionRange::new(3, 0)));
    assert_eq!(editor.extract_target(&run).as_deref(), Some("hey"));
}

#[test]
fn empty_note_offers_clipboard_once() {
    let clipboard = Some("pasted [CARD:k:::Kept|||Card]".to_string());
    let mut editor = NoteEditor::open(Note::new(""), &clipboard);
    assert_eq!(
        editor.clipboard_suggestion(),
        Some("pasted [CARD:k:::Kept|||Card]")
    );

    assert!(editor.accept_clipboard_suggestion());
    assert!(!editor.accept_clipboard_suggestion());

    assert_eq!(editor.note().content, "pasted [CARD:k:::Kept|||Card]");
    assert_eq!(card_ids(&editor), vec![SegmentId::parse("k").unwrap()]);
    assert_invariants(&editor);
}

#[test]
fn clipboard_is_ignored_for_filled_notes_and_blank_text() {
    let clipboard = Some("text".to_string());
    let editor = NoteEditor::open(Note::new("existing"), &clipboard);
    assert!(editor.clipboard_suggestion().is_none());

    let blank = Some("  \n".to_string());
    let mut editor = NoteEditor::open(Note::new(""), &blank);
    assert!(editor.clipboard_suggestion().is_none());
    assert!(!editor.dismiss_clipboard_suggestion());
}

#[test]
fn dismissed_suggestion_leaves_note_empty() {
    let clipboard = Some("text".to_string());
    let mut editor = NoteEditor::open(Note::new(""), &clipboard);

    assert!(editor.dismiss_clipboard_suggestion());
    assert!(!editor.accept_clipboard_suggestion());
    assert_eq!(editor.note().content, "");
}

#[test]
fn operation_sequence_from_empty_note_keeps_invariants() {
    let clipboard = Some("alpha\nbeta".to_string());
    let mut editor = NoteEditor::open(Note::new(""), &clipboard);
    assert_invariants(&editor);
    assert_eq!(editor.mode(), EditorMode::Idle);

    editor.accept_clipboard_suggestion();
    assert_invariants(&editor);

    let run = first_run(&editor);
    editor.set_selection(&run, SelectionRange::new(0, 5));
    editor.insert_cards(
        &run,
        &[CardDraft::new("A", "1"), CardDraft::new("B", "2")],
        SelectionRange::new(0, 5),
    );
    assert_invariants(&editor);
    assert_eq!(card_ids(&editor).len(), 2);

    let ids = card_ids(&editor);
    editor.adopt_card(&ids[0]);
    assert_invariants(&editor);
    editor.discard_card(&ids[1]);
    assert_invariants(&editor);

    let run = first_run(&editor);
    editor.update_text(&run, "");
    assert_invariants(&editor);

    editor.insert_cards(&run, &[CardDraft::new("tail", "card")], SelectionRange::default());
    assert_invariants(&editor);
    let last_card = card_ids(&editor).pop().unwrap();
    editor.discard_card(&last_card);
    assert_invariants(&editor);
    assert!(card_ids(&editor).is_empty());
}

#[test]
fn into_note_carries_latest_content() {
    let mut editor = open("x[CARD:c:::T|||B]");
    editor.discard_card(&SegmentId::parse("c").unwrap());
    let note = editor.into_note();
    assert_eq!(note.content, "x\n");
}
