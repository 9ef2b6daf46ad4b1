#![forbid(unsafe_code)]
use chrono::NaiveDate;
use garde::{
    Duty, Greedy, InternRecord, Month, Roster, RosterError, Scheduler, SlotKind, MIN_REST_DAYS,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 5, d).unwrap()
}

fn sample() -> Vec<InternRecord> {
    vec![
        InternRecord::new("alice", true, true),
        InternRecord::new("bob", true, false),
        InternRecord::new("chloe", false, true),
    ]
}

#[test]
fn records_are_validated() {
    let mut records = sample();
    records.push(InternRecord::new("  ", true, true));
    assert_eq!(
        Roster::from_records(&records).unwrap_err(),
        RosterError::EmptyName { index: 3 }
    );

    let mut records = sample();
    records.push(InternRecord::new("bob", false, true));
    assert_eq!(
        Roster::from_records(&records).unwrap_err(),
        RosterError::DuplicateName("bob".into())
    );
}

#[test]
fn eligibility_flags_gate_each_duty() {
    let roster = Roster::from_records(&sample()).unwrap();
    let alice = roster.find_by_name("alice").unwrap().id;
    let bob = roster.find_by_name("bob").unwrap().id;
    let chloe = roster.find_by_name("chloe").unwrap().id;

    assert_eq!(roster.candidates(date(1), Duty::Er), vec![alice, chloe]);
    assert_eq!(roster.candidates(date(1), Duty::Department), vec![alice, bob]);
    assert!(!roster.availability(bob, date(1), Duty::Er));
    assert!(!roster.availability(chloe, date(1), Duty::Department));
}

#[test]
fn forbidden_days_block_availability() {
    let mut records = sample();
    records[0].forbidden_days = vec![date(4)];
    let roster = Roster::from_records(&records).unwrap();
    let alice = roster.find_by_name("alice").unwrap().id;
    assert!(!roster.availability(alice, date(4), Duty::Department));
    assert!(roster.availability(alice, date(5), Duty::Department));
}

#[test]
fn rest_window_spans_one_day_each_side() {
    let roster = Roster::from_records(&sample()).unwrap();
    let alice = roster.find_by_name("alice").unwrap().id;
    let month = Month::generate(2023, 5, 2).unwrap();
    let mut s = Scheduler::new(roster, month);
    s.assign(9, SlotKind::Department, alice).unwrap(); // 10 mai

    let roster = s.roster();
    assert!(roster.availability(alice, date(8), Duty::Department));
    assert!(!roster.availability(alice, date(9), Duty::Department));
    assert!(!roster.availability(alice, date(10), Duty::Er));
    assert!(!roster.availability(alice, date(11), Duty::Department));
    assert!(roster.availability(alice, date(12), Duty::Department));
}

#[test]
fn candidates_can_be_empty() {
    let roster = Roster::from_records(&[InternRecord::new("solo", true, false)]).unwrap();
    assert!(roster.candidates(date(1), Duty::Er).is_empty());
    assert!(Roster::from_records(&[]).unwrap().candidates(date(1), Duty::Department).is_empty());
}

#[test]
fn reset_clears_assignments() {
    let roster = Roster::from_records(&sample()).unwrap();
    let bob = roster.find_by_name("bob").unwrap().id;
    let mut s = Scheduler::new(roster, Month::generate(2023, 5, 2).unwrap());
    s.assign(0, SlotKind::Department, bob).unwrap();
    let (mut roster, _, _) = s.into_parts();
    assert_eq!(roster.get(bob).unwrap().shifts, vec![date(1)]);

    roster.reset();
    assert!(roster.iter().all(|i| i.shifts.is_empty()));
}

#[test]
fn rest_window_is_configurable() {
    let roster = Roster::from_records(&sample()).unwrap().with_min_rest_days(3);
    let alice = roster.find_by_name("alice").unwrap().id;
    let mut s = Scheduler::new(roster, Month::generate(2023, 5, 2).unwrap());
    s.assign(0, SlotKind::Department, alice).unwrap();
    assert!(!s.roster().availability(alice, date(3), Duty::Department));
    assert!(s.roster().availability(alice, date(4), Duty::Department));
}

#[test]
fn rest_window_cannot_be_shortened() {
    for days in [0, 1, -5] {
        let roster = Roster::from_records(&sample()).unwrap().with_min_rest_days(days);
        assert_eq!(roster.min_rest_days(), MIN_REST_DAYS);

        let alice = roster.find_by_name("alice").unwrap().id;
        let mut s = Scheduler::new(roster, Month::generate(2023, 5, 2).unwrap());
        s.assign(1, SlotKind::Er1, alice).unwrap();
        assert!(!s.roster().availability(alice, date(2), Duty::Department));
        assert!(!s.roster().availability(alice, date(3), Duty::Department));
        assert!(s.assign(1, SlotKind::Department, alice).is_err());
    }

    let lone = vec![InternRecord::new("alice", true, true)];
    let roster = Roster::from_records(&lone).unwrap().with_min_rest_days(0);
    let mut s = Scheduler::new(roster, Month::generate(2023, 5, 2).unwrap());
    let err = s.run(&Greedy, &mut ChaCha8Rng::seed_from_u64(0)).unwrap_err();
    assert!(err.is_infeasible());
}
