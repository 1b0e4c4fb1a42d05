//! Tests for list parsing through the public API
//!
//! Each test parses a small document and checks the resulting tree with the fluent
//! assertions: nesting decided by marker style, blank-line handling, continuations,
//! and the attributes lists pick up from metadata.

use adoc::adoc::ast::{BulletStyle, CheckStyle, DelimitedKind};
use adoc::adoc::testing::assert_doc;
use adoc::adoc::{parse_draft_str, DraftDocument, ParseConfig};
use rstest::rstest;

fn parse(source: &str) -> DraftDocument {
    parse_draft_str(source, &ParseConfig::default())
}

#[test]
fn test_flat_unordered_list() {
    let doc = parse("Shopping:\n\n* apples\n* pears\n* plums\n");

    assert_doc(&doc)
        .block_count(2)
        .block(0, |block| {
            block.assert_paragraph().text("Shopping:");
        })
        .block(1, |block| {
            block
                .assert_list()
                .ordered(false)
                .item_count(3)
                .item(0, |item| {
                    item.text("apples").level(1).bullet(BulletStyle::OneAsterisk);
                })
                .item(2, |item| {
                    item.text("plums").no_sublist();
                });
        });
}

#[test]
fn test_nested_by_marker_length() {
    let doc = parse("* a\n** b\n*** c\n** d\n* e\n");

    assert_doc(&doc).block_count(1).block(0, |block| {
        block
            .assert_list()
            .item_count(2)
            .item(0, |item| {
                item.text("a").sublist(|nested| {
                    nested
                        .item_count(2)
                        .item(0, |item| {
                            item.text("b").level(2).sublist(|deeper| {
                                deeper.item_count(1).item(0, |item| {
                                    item.text("c").level(3);
                                });
                            });
                        })
                        .item(1, |item| {
                            item.text("d").no_sublist();
                        });
                });
            })
            .item(1, |item| {
                item.text("e").level(1);
            });
    });
}

#[test]
fn test_new_marker_style_nests_and_known_style_returns() {
    // `*` is unseen under `-`, so it nests; the second `-` climbs back out
    let doc = parse("- a\n* b\n- c\n");

    assert_doc(&doc).block(0, |block| {
        block
            .assert_list()
            .item_count(2)
            .item(0, |item| {
                item.sublist(|nested| {
                    nested.item(0, |item| {
                        item.level(2).bullet(BulletStyle::OneAsterisk);
                    });
                });
            })
            .item(1, |item| {
                item.text("c").bullet(BulletStyle::Dash);
            });
    });
}

#[rstest]
#[case::one_blank_line_joins("* a\n\n* b\n", 1)]
#[case::two_blank_lines_split("* a\n\n\n* b\n", 2)]
#[case::paragraph_between("* a\n\ntext\n\n* b\n", 3)]
fn test_blank_lines_between_items(#[case] source: &str, #[case] blocks: usize) {
    assert_doc(&parse(source)).block_count(blocks);
}

#[test]
fn test_item_text_runs_until_blank_line() {
    let doc = parse("* first line\n  second line\n* next\n");

    assert_doc(&doc).block(0, |block| {
        block.assert_list().item(0, |item| {
            item.text("first line\nsecond line").child_count(1);
        });
    });
}

#[test]
fn test_continuation_attaches_block_to_deepest_item() {
    let doc = parse("* a\n** b\n+\n----\ncode\n----\n* c\n");

    assert_doc(&doc).block_count(1).block(0, |block| {
        block
            .assert_list()
            .item_count(2)
            .item(0, |item| {
                item.sublist(|nested| {
                    nested.item(0, |item| {
                        item.child_count(2).child(1, |child| {
                            child
                                .assert_delimited()
                                .kind(DelimitedKind::Listing)
                                .lines(&["code"]);
                        });
                    });
                });
            })
            .item(1, |item| {
                item.text("c");
            });
    });
}

#[test]
fn test_blank_lines_before_continuation_climb_levels() {
    let doc = parse("* 1\n** 2\n*** 3\n\n\n+\nattached\n");

    assert_doc(&doc).block(0, |block| {
        block.assert_list().item(0, |item| {
            item.child_count(3)
                .child(1, |child| {
                    child.node_type("List");
                })
                .child(2, |child| {
                    child.assert_paragraph().text("attached");
                });
        });
    });
}

#[test]
fn test_fence_without_continuation_ends_list() {
    let doc = parse("* a\n----\ncode\n----\n* b\n");

    assert_doc(&doc)
        .block_count(3)
        .block(0, |block| {
            block.assert_list().item_count(1);
        })
        .block(1, |block| {
            block.assert_delimited().kind(DelimitedKind::Listing);
        })
        .block(2, |block| {
            block.assert_list().item_count(1);
        });
}

#[test]
fn test_ordered_styles() {
    let doc = parse(". one\n.. one a\n.. one b\n. two\n");

    assert_doc(&doc).block(0, |block| {
        block
            .assert_list()
            .ordered(true)
            .item(0, |item| {
                item.bullet(BulletStyle::OneDot).sublist(|nested| {
                    nested.ordered(true).item_count(2).item(1, |item| {
                        item.text("one b").bullet(BulletStyle::TwoDots);
                    });
                });
            })
            .item(1, |item| {
                item.text("two");
            });
    });
}

#[test]
fn test_explicit_start_is_recorded() {
    let doc = parse("4. four\n5. five\n");

    assert_doc(&doc).block(0, |block| {
        block
            .assert_list()
            .attribute("start", "4")
            .item(0, |item| {
                item.bullet(BulletStyle::Arabic);
            });
    });
}

#[test]
fn test_checklist() {
    let doc = parse("* [x] done\n* [ ] todo\n* plain\n");

    assert_doc(&doc).block(0, |block| {
        block
            .assert_list()
            .has_option("checklist")
            .item(0, |item| {
                item.check(CheckStyle::Checked).text("done");
            })
            .item(1, |item| {
                item.check(CheckStyle::Unchecked).text("todo");
            })
            .item(2, |item| {
                item.check(CheckStyle::NoCheck);
            });
    });
}

#[test]
fn test_metadata_lands_on_the_list_it_opens() {
    let doc = parse("[#top]\n* a\n[.compact]\n** b\n");

    assert_doc(&doc).block(0, |block| {
        block.id("top").assert_list().item(0, |item| {
            item.sublist(|nested| {
                nested.attribute("role", "compact");
            });
        });
    });
}

#[test]
fn test_depth_beyond_five_folds_with_warning() {
    let doc = parse("* 1\n** 2\n*** 3\n**** 4\n***** 5\n- 6\n");

    assert_eq!(doc.warnings.len(), 1);
    let deepest = |item: adoc::adoc::testing::ListItemAssertion<'_>| {
        item.sublist(|l5| {
            l5.item_count(2).item(1, |item| {
                item.level(5).bullet(BulletStyle::FiveAsterisks).text("6");
            });
        });
    };
    assert_doc(&doc).block(0, |block| {
        block.assert_list().item(0, |item| {
            item.sublist(|l2| {
                l2.item(0, |item| {
                    item.sublist(|l3| {
                        l3.item(0, |item| {
                            item.sublist(|l4| {
                                l4.item(0, deepest);
                            });
                        });
                    });
                });
            });
        });
    });
}

#[rstest]
#[case("*an invalid list item\n")]
#[case("-not a list\n")]
#[case("1.no space\n")]
fn test_glued_marker_is_paragraph(#[case] source: &str) {
    assert_doc(&parse(source)).block_count(1).block(0, |block| {
        block.node_type("Paragraph");
    });
}
