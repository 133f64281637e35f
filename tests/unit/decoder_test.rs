//! Stream decoding over whole bodies.

use proptest::prelude::*;
use starchat::api::{ChunkDecoder, Flow};
use starchat::error::ChatError;

use crate::common::{chunk_line, stream_body};

const MALFORMED: &str = r#"data: {"status": "chunk", "response": broken"#;

#[test]
fn test_hello_world_stream() {
    let body = stream_body(&["Hello ", "World"]);
    assert_eq!(ChunkDecoder::decode_body(&body, |_| {}).unwrap(), "Hello World");
}

#[test]
fn test_bare_complete_without_chunks_is_empty() {
    let err = ChunkDecoder::decode_body("data: {\"status\":\"complete\"}\n\n", |_| {}).unwrap_err();
    assert!(matches!(err, ChatError::EmptyResponse));
}

#[test]
fn test_stream_without_done_still_finishes() {
    let body = format!("{}\n\n{}\n\n", chunk_line("no "), chunk_line("sentinel"));
    assert_eq!(ChunkDecoder::decode_body(&body, |_| {}).unwrap(), "no sentinel");
}

#[test]
fn test_feed_line_by_line() {
    let mut decoder = ChunkDecoder::new();
    let body = stream_body(&["a", "b"]);
    let mut flows = Vec::new();
    for line in body.lines() {
        flows.push(decoder.feed_line(line).unwrap().flow);
    }
    assert_eq!(flows.last(), Some(&Flow::Stop));
    assert_eq!(decoder.accumulator().text(), "ab");
    assert_eq!(decoder.dropped_lines(), 0);
    assert_eq!(decoder.finish().unwrap(), "ab");
}

#[test]
fn test_malformed_lines_are_counted() {
    let mut decoder = ChunkDecoder::new();
    decoder.feed_line(&chunk_line("ok")).unwrap();
    decoder.feed_line(MALFORMED).unwrap();
    assert_eq!(decoder.dropped_lines(), 1);
    assert_eq!(decoder.finish().unwrap(), "ok");
}

#[test]
fn test_realistic_answer_with_entities() {
    let body = [
        r###"data: {"status":"chunk","response":"## Career\n","chunk_index":0,"total_chunks":3}"###,
        r#"data: {"status":"chunk","response":"• Promotion &amp; travel\n","chunk_index":1,"total_chunks":3}"#,
        r#"data: {"status":"chunk","response":"&lt;b&gt;Soon&lt;/b&gt;","chunk_index":2,"total_chunks":3}"#,
        "data: [DONE]",
    ]
    .join("\n\n");
    let text = ChunkDecoder::decode_body(&body, |_| {}).unwrap();
    assert_eq!(text, "## Career\n• Promotion & travel\n<b>Soon</b>");
}

proptest! {
    #[test]
    fn every_third_line_malformed_keeps_well_formed_chunks(
        fragments in prop::collection::vec("[a-zA-Z0-9 ]{1,12}", 1..30)
    ) {
        let mut body = String::new();
        let mut expected = String::new();
        for (i, fragment) in fragments.iter().enumerate() {
            if i % 3 == 2 {
                body.push_str(MALFORMED);
            } else {
                body.push_str(&chunk_line(fragment));
                expected.push_str(fragment);
            }
            body.push('\n');
        }

        let result = ChunkDecoder::decode_body(&body, |_| {});
        if expected.trim().is_empty() {
            prop_assert!(matches!(result, Err(ChatError::EmptyResponse)));
        } else {
            prop_assert_eq!(result.unwrap(), expected);
        }
    }
}
