//! Section segmentation of finished answers.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use starchat::markup::segment;
use starchat::types::{ContentBlock, HeaderIcon, StyledRun};

#[test]
fn test_full_answer() {
    let answer = concat!(
        "<div class=\"quick-answer-card\"><strong>Quick Answer:</strong> Yes, by **2026**.</div>\n",
        "## Career Analysis\n",
        "1. Saturn supports *steady* growth\n",
        "2. Jupiter favours travel\n",
        "### Final Thoughts\n",
        "Stay patient.\n",
        "<div class=\"follow-up-questions\"><ul>",
        "<li>🔮 When will I get promoted?</li>",
        "<li>✨ What remedies help Saturn?</li>",
        "</ul></div>",
    );

    assert_eq!(
        segment(answer),
        vec![
            ContentBlock::QuickAnswer {
                runs: vec![
                    StyledRun::plain("Yes, by "),
                    StyledRun::bold("2026"),
                    StyledRun::plain("."),
                ],
            },
            ContentBlock::header(HeaderIcon::Analysis, "Career Analysis"),
            ContentBlock::list_item(
                1,
                vec![
                    StyledRun::plain("Saturn supports "),
                    StyledRun::italic("steady"),
                    StyledRun::plain(" growth"),
                ]
            ),
            ContentBlock::list_item(2, vec![StyledRun::plain("Jupiter favours travel")]),
            ContentBlock::FinalThoughts {
                runs: vec![StyledRun::plain("Stay patient.")],
            },
            ContentBlock::FollowUp {
                questions: vec![
                    "When will I get promoted?".to_string(),
                    "What remedies help Saturn?".to_string(),
                ],
            },
        ]
    );
}

#[test]
fn test_follow_up_without_emoji_uses_starters() {
    let blocks = segment(
        "<div class=\"follow-up-questions\">When will I marry? How to improve health?</div>",
    );
    assert_eq!(
        blocks,
        vec![ContentBlock::FollowUp {
            questions: vec![
                "When will I marry?".to_string(),
                "How to improve health?".to_string(),
            ],
        }]
    );
}

#[derive(Debug, Clone)]
enum Kind {
    Quick,
    Final,
    FollowUp,
}

fn region(kind: &Kind, word: &str) -> (String, ContentBlock) {
    match kind {
        Kind::Quick => (
            format!("<div class=\"quick-answer-card\">{word}</div>"),
            ContentBlock::QuickAnswer {
                runs: vec![StyledRun::plain(word)],
            },
        ),
        Kind::Final => (
            format!("<section class=\"final-thoughts-card\">{word}</section>"),
            ContentBlock::FinalThoughts {
                runs: vec![StyledRun::plain(word)],
            },
        ),
        Kind::FollowUp => {
            let question = format!("When will {word} happen?");
            (
                format!("<div class=\"follow-up-questions\"><li>{question}</li></div>"),
                ContentBlock::FollowUp {
                    questions: vec![question],
                },
            )
        }
    }
}

fn kind_strategy() -> impl Strategy<Value = Kind> {
    prop_oneof![Just(Kind::Quick), Just(Kind::Final), Just(Kind::FollowUp)]
}

proptest! {
    #[test]
    fn regions_become_typed_blocks_in_order(
        regions in prop::collection::vec((kind_strategy(), "[A-Z][a-z]{2,9}", "[a-z]{3,10}"), 1..8),
        tail in "[a-z]{3,10}",
    ) {
        let mut text = String::new();
        let mut expected = Vec::new();
        for (kind, word, filler) in &regions {
            let (markup, block) = region(kind, word);
            text.push_str(filler);
            text.push('\n');
            text.push_str(&markup);
            text.push('\n');
            expected.push(ContentBlock::plain(vec![StyledRun::plain(filler.as_str())]));
            expected.push(block);
        }
        text.push_str(&tail);
        expected.push(ContentBlock::plain(vec![StyledRun::plain(tail.as_str())]));

        prop_assert_eq!(segment(&text), expected);
    }
}
