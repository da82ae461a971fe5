use decision_companion::workflow::{
    ProgressMark, Question, QuestionNavigator, WorkflowError,
};
use std::time::{Duration, Instant};

const DELAY: Duration = Duration::from_millis(300);

fn navigator(texts: &[&str]) -> QuestionNavigator {
    QuestionNavigator::new(texts.iter().map(|text| Question::new(*text)).collect())
}

#[test]
fn index_stays_in_bounds_for_any_move_sequence() {
    let mut nav = navigator(&["one", "two", "three"]);
    let moves = [
        false, false, true, true, true, true, true, false, true, false, false, false, false,
    ];
    for forward in moves {
        if forward {
            nav.advance();
        } else {
            nav.retreat();
        }
        assert!(nav.index() < nav.len(), "index {} escaped", nav.index());
    }

    while nav.advance() {}
    assert_eq!(nav.index(), 2);
    assert!(!nav.advance(), "advance at the last index is a no-op");
    assert_eq!(nav.index(), 2);

    while nav.retreat() {}
    assert_eq!(nav.index(), 0);
    assert!(!nav.retreat(), "retreat at index 0 is a no-op");
}

#[test]
fn completeness_requires_trimmed_non_empty_answers() {
    let mut nav = navigator(&["one", "two"]);
    assert!(!nav.is_complete());
    assert_eq!(nav.unanswered_indices(), vec![0, 1]);

    nav.set_answer(0, "Money").expect("answer first");
    nav.set_answer(1, "   ").expect("answer second");
    assert!(!nav.is_complete());
    assert_eq!(nav.unanswered_indices(), vec![1]);

    nav.set_answer(1, "I might fail").expect("answer second");
    assert!(nav.is_complete());
    assert!(nav.unanswered_indices().is_empty());
}

#[test]
fn set_answer_rejects_out_of_range_indices() {
    let mut nav = navigator(&["only"]);
    let err = nav.set_answer(3, "x").expect_err("out of range");
    assert_eq!(
        err,
        WorkflowError::AnswerIndexOutOfRange { index: 3, len: 1 }
    );
}

#[test]
fn next_gating_requires_an_answer_on_the_current_question() {
    let mut nav = navigator(&["one", "two"]);
    assert!(!nav.can_advance());
    nav.set_answer(0, "Growth").expect("answer");
    assert!(nav.can_advance());
    nav.advance();
    nav.set_answer(1, "I might regret it").expect("answer");
    assert!(!nav.can_advance(), "last question never advances");
    assert!(nav.can_retreat());
}

#[test]
fn choice_selection_auto_advances_once_due() {
    let mut nav = navigator(&["one", "two", "three"]);
    let start = Instant::now();

    let scheduled = nav
        .select_choice("Stability", start, DELAY)
        .expect("select")
        .expect("advance scheduled");
    assert_eq!(scheduled.from_index, 0);
    assert_eq!(nav.current().map(|q| q.answer.as_str()), Some("Stability"));

    assert!(!nav.poll(start + Duration::from_millis(299)));
    assert_eq!(nav.index(), 0);
    assert!(nav.poll(start + DELAY));
    assert_eq!(nav.index(), 1);
    assert!(nav.pending().is_none());
    assert!(!nav.poll(start + Duration::from_secs(5)), "fires once");
}

#[test]
fn selecting_on_the_last_question_schedules_nothing() {
    let mut nav = navigator(&["one", "two"]);
    nav.advance();
    let scheduled = nav
        .select_choice("Peace of mind", Instant::now(), DELAY)
        .expect("select");
    assert_eq!(scheduled, None);
    assert_eq!(nav.index(), 1);
}

#[test]
fn navigating_away_cancels_the_pending_advance() {
    let start = Instant::now();

    let mut retreated = navigator(&["one", "two", "three"]);
    retreated.advance();
    retreated
        .select_choice("Money", start, DELAY)
        .expect("select");
    retreated.retreat();
    assert!(retreated.pending().is_none());
    assert!(!retreated.poll(start + DELAY));
    assert_eq!(retreated.index(), 0);

    let mut other_answer = navigator(&["one", "two", "three"]);
    other_answer
        .select_choice("Money", start, DELAY)
        .expect("select");
    other_answer.set_answer(2, "typed ahead").expect("answer");
    assert!(!other_answer.poll(start + DELAY));
    assert_eq!(other_answer.index(), 0);

    let mut cancelled = navigator(&["one", "two"]);
    cancelled
        .select_choice("Rest", start, DELAY)
        .expect("select");
    assert!(cancelled.cancel_pending());
    assert!(!cancelled.poll(start + DELAY));
}

#[test]
fn reselecting_replaces_the_pending_advance() {
    let mut nav = navigator(&["one", "two"]);
    let start = Instant::now();
    nav.select_choice("Rest", start, DELAY).expect("select");
    nav.select_choice("Money", start + Duration::from_millis(200), DELAY)
        .expect("reselect");

    assert!(!nav.poll(start + DELAY), "first schedule was replaced");
    assert!(nav.poll(start + Duration::from_millis(500)));
    assert_eq!(nav.index(), 1);
    assert_eq!(nav.questions()[0].answer, "Money");
}

#[test]
fn progress_projection_marks_current_answered_and_pending() {
    let mut nav = navigator(&["one", "two", "three"]);
    nav.set_answer(0, "Money").expect("answer");
    nav.advance();

    assert_eq!(
        nav.progress(),
        vec![
            ProgressMark::Answered,
            ProgressMark::Current,
            ProgressMark::Pending
        ]
    );
    assert_eq!(nav.position_label().as_deref(), Some("Question 2 of 3"));
}
