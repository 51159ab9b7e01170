//! Selection routing across a sequential decoder chain.
//!
//! These tests drive whole element scripts through [`ReplyDriver`] (or call
//! the chain directly where a crafted cursor is needed) and observe which
//! child answered each position via [`Label`]-style leaves:
//!
//! - **Sequence starts**: every position-0 element advances the cursor one
//!   child forward, so a run of replies on one context walks the chain.
//! - **Nil bypass**: absent values are placed without a selection call but
//!   still consume their position in the group.
//! - **Cycle restarts**: a child reporting its cycle complete hands the
//!   same position back to child 0, without disturbing group progress.
//!
//! [`Label`]: redpoll_tests::Label

use redpoll_driver::{Progress, ReplyDriver};
use redpoll_reply::{
    CompositeDecoder, DecodeContext, SequenceCursor, SequenceDecoder, UnitCollector,
};
use redpoll_tests::{CountingCycle, agg, bulk, nil, render, tagged};
use redpoll_types::ReplyValue;

// ── Sequence starts ───────────────────────────────────────────────────────

#[test]
fn each_reply_start_routes_to_the_next_child() {
    let chain = SequenceDecoder::new(vec![tagged("first"), tagged("second"), tagged("rest")]);
    let mut driver = ReplyDriver::new(&chain);

    // Three scalar replies on one context: each begins at position 0, so
    // each lands on the next child's leaf.
    for expected in ["first", "second", "rest"] {
        let progress = driver.feed(bulk(b"payload")).expect("scalar reply should decode");
        assert_eq!(
            progress,
            Progress::Complete(ReplyValue::Text(expected.to_owned()))
        );
        driver.begin_next().expect("completed reply should rearm");
    }

    let cursor = driver.context().cursor().copied().expect("selection ran");
    assert_eq!(cursor.active(), Some(2));
}

// ── Nil bypass ────────────────────────────────────────────────────────────

#[test]
fn nil_is_placed_without_consulting_selection() {
    // The counting cycle hands out one field per *consultation*, so the
    // decoded tags reveal exactly how many selection calls happened.
    let chain = SequenceDecoder::new(vec![
        Box::new(CountingCycle::new(&["f0", "f1", "f2"])),
        tagged("group"),
    ]);
    let mut driver = ReplyDriver::new(&chain);

    let value = driver
        .feed_all([agg(3), bulk(b"x"), nil(), bulk(b"y")])
        .expect("script should decode")
        .into_value()
        .expect("script should complete the reply");

    // Two consultations, not three: the nil went straight into the group.
    assert_eq!(render(&value), r#"["group", "f0", nil, "f1"]"#);
}

// ── Cycle restarts ────────────────────────────────────────────────────────

#[test]
fn cycle_restarts_are_absorbed_within_one_group() {
    let chain = SequenceDecoder::new(vec![
        Box::new(CountingCycle::new(&["seq", "body"])),
        tagged("entries"),
    ]);
    let mut driver = ReplyDriver::new(&chain);

    // Five elements over a two-field cycle: each completed round reports a
    // restart, which is answered by child 0 — here the cycle itself,
    // starting its next round.
    let value = driver
        .feed_all([agg(5), bulk(b"1"), bulk(b"a"), bulk(b"2"), bulk(b"b"), bulk(b"3")])
        .expect("script should decode")
        .into_value()
        .expect("script should complete the reply");

    assert_eq!(
        render(&value),
        r#"["entries", "seq", "body", "seq", "body", "seq"]"#
    );
    // The cycle declined the group, so assembly advanced to the collector.
    let cursor = driver.context().cursor().copied().expect("selection ran");
    assert_eq!(cursor.active(), Some(1));
}

#[test]
fn absorbed_restart_is_answered_by_the_first_child() {
    let chain = SequenceDecoder::new(vec![tagged("head"), Box::new(UnitCollector::new(1))]);

    // Active child 1 always reports its cycle complete; some group progress
    // is already on the cursor.
    let mut ctx = DecodeContext::with_cursor(SequenceCursor::at(1));
    ctx.cursor_mut().bump_produced();

    let selection = chain
        .select_decoder(4, &mut ctx)
        .expect("the restart should be absorbed, not surfaced");
    let leaf = selection.element().expect("absorption must yield a leaf");
    let value = leaf
        .decode(b"payload", &DecodeContext::new())
        .expect("label leaf cannot fail");
    assert_eq!(value, ReplyValue::Text("head".to_owned()));

    let cursor = ctx.cursor().copied().expect("cursor was crafted above");
    assert_eq!(cursor.active(), Some(0), "restart pins back to child 0");
    assert_eq!(cursor.produced(), Some(0), "group progress survives the restart");
}
