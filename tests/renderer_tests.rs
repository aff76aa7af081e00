use anyhow::Result;
use form_mailer::{
    clients::{
        font_metrics::{HELVETICA_WIDTHS, string_width},
        pdf::{DocumentRenderer, PageLayout},
    },
    models::{field_spec::FieldSpec, form::FormLayout, payload::SubmissionPayload},
};
use lopdf::Document;

use crate::common::{all_lines, page_lines, render_form, text_runs};

fn payload(json: &str) -> Result<SubmissionPayload> {
    Ok(SubmissionPayload::parse(json.as_bytes())?)
}

/// Test: A single supplied field renders beside placeholders for the rest
#[test]
fn test_render_supplied_and_missing_fields() -> Result<()> {
    let renderer = DocumentRenderer::default();
    let form = FormLayout::basic_information();

    let document = render_form(&renderer, &form, &payload(r#"{"fullName": "Jane Doe"}"#)?)?;
    let lines = all_lines(document.as_bytes())?;

    assert!(lines.contains(&"Full Name: Jane Doe".to_string()));
    assert!(lines.contains(&"Dob: N/A".to_string()));
    assert!(lines.contains(&"Referee 2 Address: N/A".to_string()));
    assert!(lines.contains(&"Child 4 Age: N/A".to_string()));

    Ok(())
}

/// Test: Every field appears exactly once and in field spec order
#[test]
fn test_render_fields_once_in_order() -> Result<()> {
    let renderer = DocumentRenderer::default();
    let spec = FieldSpec::from_keys(["mobile", "fullName", "dob"]);

    let document = renderer.render(
        "Order Check",
        &spec,
        &payload(r#"{"dob": "1990-01-01", "fullName": "Jane Doe"}"#)?,
    )?;
    let lines = all_lines(document.as_bytes())?;

    assert_eq!(
        lines,
        vec![
            "Order Check".to_string(),
            "Mobile: N/A".to_string(),
            "Full Name: Jane Doe".to_string(),
            "Dob: 1990-01-01".to_string(),
        ]
    );

    Ok(())
}

/// Test: An empty payload still produces a valid all-placeholder document
#[test]
fn test_render_empty_payload() -> Result<()> {
    let renderer = DocumentRenderer::default();
    let form = FormLayout::attestation();

    let document = render_form(&renderer, &form, &SubmissionPayload::default())?;
    assert!(!document.is_empty());

    let doc = Document::load_mem(document.as_bytes())?;
    assert_eq!(doc.get_pages().len(), 1);

    let lines = all_lines(document.as_bytes())?;
    assert_eq!(lines[0], "Attestation Form");
    assert!(lines[1..].iter().all(|line| line.ends_with(": N/A")));
    assert_eq!(lines.len(), 11);

    Ok(())
}

/// Test: Rendering is byte-for-byte deterministic
#[test]
fn test_render_is_deterministic() -> Result<()> {
    let renderer = DocumentRenderer::default();
    let form = FormLayout::basic_information();
    let input = payload(r#"{"fullName": "Jane Doe", "mobile": "0800"}"#)?;

    let first = render_form(&renderer, &form, &input)?;
    let second = render_form(&renderer, &form, &input)?;

    assert_eq!(first.as_bytes(), second.as_bytes());

    Ok(())
}

/// Test: Keys outside the field spec do not change the output
#[test]
fn test_render_ignores_extra_keys() -> Result<()> {
    let renderer = DocumentRenderer::default();
    let form = FormLayout::attestation();

    let plain = render_form(&renderer, &form, &payload(r#"{"fullName": "Jane Doe"}"#)?)?;
    let extra = render_form(
        &renderer,
        &form,
        &payload(r#"{"fullName": "Jane Doe", "unrelated": "value", "other": 7}"#)?,
    )?;

    assert_eq!(plain.as_bytes(), extra.as_bytes());

    Ok(())
}

/// Test: The long basic information form spills onto a second page
#[test]
fn test_render_paginates_long_forms() -> Result<()> {
    let renderer = DocumentRenderer::default();
    let form = FormLayout::basic_information();
    let document = render_form(&renderer, &form, &SubmissionPayload::default())?;

    let pages = page_lines(document.as_bytes())?;

    assert_eq!(document.page_count(), 2);
    assert_eq!(pages.len(), 2);
    assert!(pages[1].contains(&"Child 4 Age: N/A".to_string()));

    Ok(())
}

/// Test: Small pages produce one page per entry
#[test]
fn test_render_respects_page_layout() -> Result<()> {
    let layout = PageLayout {
        height: 100,
        margin: 20,
        ..PageLayout::default()
    };
    let renderer = DocumentRenderer::new(layout);
    let spec = FieldSpec::from_keys(["one", "two", "three"]);

    let document = renderer.render("Tiny", &spec, &SubmissionPayload::default())?;

    assert!(document.page_count() >= 2);
    assert_eq!(
        Document::load_mem(document.as_bytes())?.get_pages().len(),
        document.page_count()
    );

    Ok(())
}

/// Test: Long values wrap without losing words
#[test]
fn test_render_wraps_long_values() -> Result<()> {
    let renderer = DocumentRenderer::default();
    let spec = FieldSpec::from_keys(["comments"]);
    let comment = "word ".repeat(60);
    let input = SubmissionPayload::from(
        serde_json::json!({ "comments": comment.trim() })
            .as_object()
            .cloned()
            .unwrap_or_default(),
    );

    let document = renderer.render("Wrap", &spec, &input)?;
    let lines = all_lines(document.as_bytes())?;

    assert!(lines.len() > 2, "Comment should span several lines");
    let words: usize = lines[1..]
        .iter()
        .map(|line| line.split_whitespace().filter(|w| *w == "word").count())
        .sum();
    assert_eq!(words, 60);

    Ok(())
}

/// Test: PDF string delimiters in values do not corrupt the document
#[test]
fn test_render_escapes_markup_characters() -> Result<()> {
    let renderer = DocumentRenderer::default();
    let spec = FieldSpec::from_keys(["comments"]);
    let input = payload(r#"{"comments": "unbalanced ) paren ( and \\ slash"}"#)?;

    let document = renderer.render("Escape", &spec, &input)?;
    let lines = all_lines(document.as_bytes())?;

    assert_eq!(lines[1], r"Comments: unbalanced ) paren ( and \ slash");

    Ok(())
}

/// Test: Characters outside WinAnsi are replaced rather than dropped
#[test]
fn test_render_replaces_unencodable_characters() -> Result<()> {
    let renderer = DocumentRenderer::default();
    let spec = FieldSpec::from_keys(["fullName"]);
    let input = payload(r#"{"fullName": "Li 一 Wei\tTab"}"#)?;

    let document = renderer.render("Encoding", &spec, &input)?;
    let lines = all_lines(document.as_bytes())?;

    assert_eq!(lines[1], "Full Name: Li ? Wei Tab");

    Ok(())
}

/// Test: Typographic punctuation and the euro sign use their WinAnsi codes
#[test]
fn test_render_encodes_windows_1252_punctuation() -> Result<()> {
    let renderer = DocumentRenderer::default();
    let spec = FieldSpec::from_keys(["fullName"]);
    let input = payload(r#"{"fullName": "O’Brien €5 — “ok”"}"#)?;

    let document = renderer.render("Encoding", &spec, &input)?;
    let runs = text_runs(document.as_bytes())?;
    let line = &runs[1].bytes;

    assert_eq!(
        line.as_slice(),
        b"Full Name: O\x92Brien \x805 \x97 \x93ok\x94".as_slice()
    );
    assert!(!line.contains(&b'?'));

    Ok(())
}

/// Test: Wide glyphs wrap inside the right margin
#[test]
fn test_render_wraps_capitals_within_margin() -> Result<()> {
    let layout = PageLayout::default();
    let right_edge = layout.width - layout.margin;
    let renderer = DocumentRenderer::new(layout.clone());
    let spec = FieldSpec::from_keys(["comments"]);
    let input = payload(&format!(r#"{{"comments": "{}"}}"#, "W".repeat(70)))?;

    let document = renderer.render("Capitals", &spec, &input)?;
    let runs = text_runs(document.as_bytes())?;
    let body = &runs[1..];

    assert!(body.len() >= 2, "70 capitals cannot fit one line");
    for run in body {
        let width = string_width(&HELVETICA_WIDTHS, &run.bytes) * layout.body_size / 1000;
        assert!(
            run.x + width <= right_edge,
            "line of {} pt at x={} crosses the margin",
            width,
            run.x
        );
    }

    let capitals: usize = body
        .iter()
        .map(|run| run.bytes.iter().filter(|b| **b == b'W').count())
        .sum();
    assert_eq!(capitals, 70);

    Ok(())
}

/// Test: Whitespace-only values render as the placeholder
#[test]
fn test_render_blank_values_as_placeholder() -> Result<()> {
    let renderer = DocumentRenderer::default();
    let spec = FieldSpec::from_keys(["fullName", "mobile"]);
    let input = payload(r#"{"fullName": "   ", "mobile": "\t"}"#)?;

    let document = renderer.render("Blank", &spec, &input)?;
    let lines = all_lines(document.as_bytes())?;

    assert_eq!(lines, vec!["Blank", "Full Name: N/A", "Mobile: N/A"]);

    Ok(())
}
