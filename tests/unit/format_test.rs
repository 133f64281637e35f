//! Inline formatting of answer spans.

use pretty_assertions::assert_eq;
use starchat::markup::{classify_header, format_span, parse_emphasis};
use starchat::types::{ContentBlock, HeaderIcon, StyledRun};

#[test]
fn test_career_header_with_bullets() {
    assert_eq!(
        format_span("### Career\n• First\n• Second"),
        vec![
            ContentBlock::header(HeaderIcon::Career, "Career"),
            ContentBlock::list_item(1, vec![StyledRun::plain("First")]),
            ContentBlock::list_item(2, vec![StyledRun::plain("Second")]),
        ]
    );
}

#[test]
fn test_bold_and_italic_runs() {
    assert_eq!(
        parse_emphasis("**bold** and *italic*"),
        vec![
            StyledRun::bold("bold"),
            StyledRun::plain(" and "),
            StyledRun::italic("italic"),
        ]
    );
}

#[test]
fn test_paragraph_break_keeps_numbering() {
    let blocks = format_span("1. One\n\n2. Two\n## Health\n- Rest");
    assert_eq!(
        blocks,
        vec![
            ContentBlock::list_item(1, vec![StyledRun::plain("One")]),
            ContentBlock::list_item(2, vec![StyledRun::plain("Two")]),
            ContentBlock::header(HeaderIcon::Health, "Health"),
            ContentBlock::list_item(1, vec![StyledRun::plain("Rest")]),
        ]
    );
}

#[test]
fn test_html_heading_and_entities() {
    let blocks = format_span("<h3>Dasha &amp; Timing</h3>Jupiter &gt; Saturn");
    assert_eq!(
        blocks,
        vec![
            ContentBlock::header(HeaderIcon::Timing, "Dasha & Timing"),
            ContentBlock::plain(vec![StyledRun::plain("Jupiter > Saturn")]),
        ]
    );
}

#[test]
fn test_blank_and_tag_only_lines_emit_nothing() {
    assert!(format_span("   \n<br>\n\n").is_empty());
}

#[test]
fn test_header_classification_order() {
    assert_eq!(classify_header("Timing & Guidance"), HeaderIcon::TimingGuidance);
    assert_eq!(classify_header("Favourable Period"), HeaderIcon::Timing);
    assert_eq!(classify_header("Career Outlook"), HeaderIcon::Career);
    assert_eq!(classify_header("Something Else"), HeaderIcon::Default);
}
