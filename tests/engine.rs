#![forbid(unsafe_code)]
use chrono::NaiveDate;
use garde::{
    AssignOptions, Greedy, InternRecord, Month, Roster, SchedError, Scheduler, SlotKind, Strategy,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn both_eligible(n: usize) -> Vec<InternRecord> {
    (0..n)
        .map(|i| InternRecord::new(format!("intern{i}"), true, true))
        .collect()
}

fn scheduler(records: &[InternRecord], year: i32, month: u32, first_er_day: u32) -> Scheduler {
    Scheduler::new(
        Roster::from_records(records).unwrap(),
        Month::generate(year, month, first_er_day).unwrap(),
    )
}

fn assert_valid(s: &Scheduler) {
    assert!(s.month().is_complete());
    assert!(s.detect_conflicts().is_empty(), "{:?}", s.detect_conflicts());

    for intern in s.roster().iter() {
        for (i, a) in intern.shifts.iter().enumerate() {
            for b in intern.shifts.iter().skip(i + 1) {
                assert!((*b - *a).num_days().abs() >= 2, "{} on {a} and {b}", intern.name);
            }
        }
    }

    for day in s.month().days() {
        let dept = day.department().unwrap();
        assert!(s.roster().get(dept).unwrap().department);
        if let Some([Some(a), Some(b)]) = day.er() {
            assert_ne!(a, b);
            assert!(s.roster().get(a).unwrap().er);
            assert!(s.roster().get(b).unwrap().er);
        } else {
            assert!(!day.requires_extra());
        }
    }
}

#[test]
fn five_interns_fill_february() {
    for seed in 0..20 {
        let mut s = scheduler(&both_eligible(5), 2023, 2, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        s.run(&Greedy, &mut rng).unwrap();

        assert_valid(&s);
        let score = s.score();
        assert!(score.is_finite());
        assert!(score >= 0.0);
        // 28 gardes de service + 7 jours × 2 urgences
        let total: usize = s.roster().iter().map(|i| i.shifts.len()).sum();
        assert_eq!(total, 28 + 14);
    }
}

#[test]
fn lone_er_intern_cannot_cover_both_er_slots() {
    let records = vec![
        InternRecord::new("alice", true, true),
        InternRecord::new("bob", true, false),
        InternRecord::new("chloe", true, false),
    ];
    let mut s = scheduler(&records, 2023, 5, 1);
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let err = s.run(&Greedy, &mut rng).unwrap_err();

    match err {
        SchedError::NoAvailableCandidate { date, slot } => {
            assert_eq!(date, NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());
            assert_eq!(slot, SlotKind::Er2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(s.month().days()[0].slot(SlotKind::Er1).unwrap().is_some());
}

#[test]
fn same_seed_same_schedule() {
    let run = |seed| {
        let mut s = scheduler(&both_eligible(6), 2023, 5, 2);
        s.run(&Greedy, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        s.into_parts()
    };
    let (roster_a, month_a, tally_a) = run(11);
    let (roster_b, month_b, tally_b) = run(11);
    assert_eq!(month_a, month_b);
    assert_eq!(roster_a, roster_b);
    assert_eq!(tally_a, tally_b);
}

#[test]
fn most_rested_candidate_wins() {
    let records = vec![
        InternRecord::new("alice", true, true),
        InternRecord::new("bob", true, true),
    ];
    let roster = Roster::from_records(&records).unwrap();
    let alice = roster.find_by_name("alice").unwrap().id;
    let bob = roster.find_by_name("bob").unwrap().id;

    let mut s = Scheduler::new(roster, Month::generate(2023, 5, 2).unwrap());
    s.assign(0, SlotKind::Department, alice).unwrap();
    let day4 = NaiveDate::from_ymd_opt(2023, 5, 4).unwrap();
    assert_eq!(s.recency_score(alice, day4), 3);
    assert_eq!(s.recency_score(bob, day4), 100);

    for seed in 0..10 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let picked = Greedy::best_candidate(&mut s, day4, SlotKind::Department, &mut rng).unwrap();
        assert_eq!(picked, bob);
    }
}

#[test]
fn ties_are_broken_at_random() {
    let records = both_eligible(4);
    let day1 = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
    let mut s = scheduler(&records, 2023, 5, 2);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let picks: std::collections::BTreeSet<_> = (0..64)
        .map(|_| Greedy::best_candidate(&mut s, day1, SlotKind::Department, &mut rng).unwrap())
        .collect();
    assert!(picks.len() > 1);
}

#[test]
fn eligibility_is_respected_with_disjoint_pools() {
    let records = vec![
        InternRecord::new("d1", true, false),
        InternRecord::new("d2", true, false),
        InternRecord::new("d3", true, false),
        InternRecord::new("e1", false, true),
        InternRecord::new("e2", false, true),
        InternRecord::new("e3", false, true),
    ];
    for seed in 0..10 {
        let mut s = scheduler(&records, 2023, 5, 2);
        s.run(&Greedy, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        assert_valid(&s);
        for intern in s.roster().iter().filter(|i| !i.department) {
            assert_eq!(s.tally().get(intern.id).er, intern.shifts.len() as u32);
        }
    }
}

#[test]
fn step_limit_aborts_trial() {
    let roster = Roster::from_records(&both_eligible(5)).unwrap();
    let month = Month::generate(2023, 5, 2).unwrap();
    let opts = AssignOptions {
        max_steps: 5,
        ..AssignOptions::default()
    };
    let mut s = Scheduler::with_options(roster, month, opts);
    let err = s.run(&Greedy, &mut ChaCha8Rng::seed_from_u64(1)).unwrap_err();
    assert!(matches!(err, SchedError::StepLimitExceeded { limit: 5 }));
    assert!(err.is_infeasible());
    assert_eq!(s.steps(), 5);
}

#[test]
fn greedy_reports_its_name() {
    assert_eq!(<Greedy as Strategy<ChaCha8Rng>>::name(&Greedy), "greedy");
}

#[test]
fn assigning_a_missing_slot_fails() {
    let mut s = scheduler(&both_eligible(2), 2023, 5, 2);
    let id = s.roster().iter().next().unwrap().id;
    let err = s.assign(0, SlotKind::Er1, id).unwrap_err();
    assert!(matches!(err, SchedError::MissingSlot { slot: SlotKind::Er1, .. }));
    assert!(s.roster().get(id).unwrap().shifts.is_empty());
}

#[test]
fn occupied_slot_is_not_overwritten() {
    let mut s = scheduler(&both_eligible(2), 2023, 5, 2);
    let ids: Vec<_> = s.roster().iter().map(|i| i.id).collect();
    s.assign(0, SlotKind::Department, ids[0]).unwrap();

    let err = s.assign(0, SlotKind::Department, ids[1]).unwrap_err();
    assert!(matches!(err, SchedError::SlotTaken { slot: SlotKind::Department, .. }));
    assert_eq!(s.month().days()[0].department(), Some(ids[0]));
    assert_eq!(s.roster().get(ids[0]).unwrap().shifts.len(), 1);
    assert!(s.roster().get(ids[1]).unwrap().shifts.is_empty());
    assert_eq!(s.tally().get(ids[1]).shifts, 0);
}

#[test]
fn assign_enforces_availability() {
    let records = vec![
        InternRecord::new("alice", true, true),
        InternRecord::new("bob", true, false),
    ];
    let mut s = scheduler(&records, 2023, 5, 2);
    let alice = s.roster().find_by_name("alice").unwrap().id;
    let bob = s.roster().find_by_name("bob").unwrap().id;

    s.assign(0, SlotKind::Department, alice).unwrap();
    // lendemain : repos insuffisant
    let err = s.assign(1, SlotKind::Er1, alice).unwrap_err();
    assert!(matches!(
        err,
        SchedError::Unavailable { slot: SlotKind::Er1, intern, .. } if intern == alice
    ));
    // bob n'est pas habilité aux urgences
    let err = s.assign(1, SlotKind::Er1, bob).unwrap_err();
    assert!(matches!(err, SchedError::Unavailable { .. }));
    assert!(!err.is_infeasible());

    assert_eq!(s.month().days()[1].slot(SlotKind::Er1), Some(None));
    assert_eq!(s.roster().get(alice).unwrap().shifts.len(), 1);
    assert_eq!(s.tally().get(alice).er, 0);
    assert!(s.detect_conflicts().iter().all(|c| c.intern.is_none()));

    s.assign(2, SlotKind::Department, alice).unwrap();
}
