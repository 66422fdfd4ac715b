//! Randomized checks of the classifier's invariants.
//!
//! Inputs come from a seeded `StdRng` so failures are reproducible.

use chrono::NaiveDate;
use ledger_classifier::{
    classify_record, generate, Action, AmountCompare, Money, Predicate, Rule, RuleTable, Split,
    Target, TransactionRecord,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

const CASES: usize = 500;

fn record(narration: &str, amount: Decimal) -> TransactionRecord {
    TransactionRecord::new(
        NaiveDate::from_ymd_opt(2025, 10, 24).unwrap(),
        narration,
        amount,
        "NOK",
    )
}

/// Signed amount in cents between -1,000,000.00 and 1,000,000.00.
fn random_amount(rng: &mut StdRng) -> Decimal {
    Decimal::new(rng.gen_range(-100_000_000i64..=100_000_000), 2)
}

/// Percentages with two decimals summing to exactly 100.
fn random_split(rng: &mut StdRng) -> Split {
    let parts = rng.gen_range(1..=6);
    let mut remaining: i64 = 10_000;
    let mut pairs = Vec::new();
    for i in 0..parts {
        let share = if i == parts - 1 {
            remaining
        } else {
            let left_for_others = (parts - i - 1) as i64;
            rng.gen_range(1..=remaining - left_for_others)
        };
        remaining -= share;
        pairs.push((format!("Expenses:Part{}", i), Decimal::new(share, 2)));
    }
    Split::from_pairs(pairs).unwrap()
}

fn random_action(rng: &mut StdRng) -> Action {
    let base = if rng.gen_bool(0.5) {
        Target::single("Expenses:Base")
    } else {
        Target::Split(random_split(rng))
    };
    match rng.gen_range(0..3) {
        0 => Action::from(base),
        1 => Action::Split(random_split(rng)),
        _ => {
            let pct = Decimal::new(rng.gen_range(1..=10_000), 2);
            Action::shared(base, "Assets:Receivables:Alex", pct).unwrap()
        }
    }
}

#[test]
fn test_postings_always_sum_to_amount() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..CASES {
        let action = random_action(&mut rng);
        let amount = random_amount(&mut rng);
        let postings = generate(&action, &record("X", amount)).unwrap();

        let total: Money = postings.iter().map(|p| p.amount).sum();
        assert_eq!(total.value(), amount, "{:?} over {}", action, amount);
        for posting in &postings {
            assert_eq!(posting.amount.value().scale(), 2);
        }
    }
}

#[test]
fn test_posting_count_and_order_follow_action() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..CASES {
        let split = random_split(&mut rng);
        let expected: Vec<String> = split.allocations().iter().map(|a| a.account().to_string()).collect();
        let postings = generate(&Action::Split(split), &record("X", random_amount(&mut rng))).unwrap();
        let accounts: Vec<String> = postings.into_iter().map(|p| p.account).collect();
        assert_eq!(accounts, expected);
    }
}

#[test]
fn test_earliest_matching_rule_wins_under_permutation() {
    let mut rng = StdRng::seed_from_u64(42);
    let target = record("REMA 1000 OSLO", Decimal::new(15050, 2));

    let non_matching: Vec<Rule> = vec![
        Rule::new(Predicate::text("KIWI"), Action::single("Expenses:Kiwi")),
        Rule::new(Predicate::text("SPOTIFY"), Action::single("Expenses:Music")),
        Rule::new(
            Predicate::amount(AmountCompare::greater_than(Decimal::from(1000))),
            Action::single("Expenses:Big"),
        ),
        Rule::new(
            Predicate::text("REMA").with_amount(AmountCompare::less_than(Decimal::from(10))),
            Action::single("Expenses:Snacks"),
        ),
    ];
    let first = Rule::new(Predicate::regex(r"rema\s*1000").unwrap(), Action::single("Expenses:First"));
    let second = Rule::new(Predicate::text("OSLO"), Action::single("Expenses:Second"));

    for _ in 0..CASES {
        let mut others = non_matching.clone();
        others.shuffle(&mut rng);
        let split_at = rng.gen_range(0..=others.len());
        let (before, after) = others.split_at(split_at);
        let gap = rng.gen_range(0..=after.len());

        let mut rules = before.to_vec();
        rules.push(first.clone());
        rules.extend_from_slice(&after[..gap]);
        rules.push(second.clone());
        rules.extend_from_slice(&after[gap..]);

        let table = RuleTable::new(rules, Action::single("Expenses:Uncategorized"));
        assert_eq!(table.classify(&target), &Action::single("Expenses:First"));
    }
}

#[test]
fn test_classification_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..CASES {
        let table = RuleTable::new(
            vec![Rule::new(Predicate::text("REMA"), random_action(&mut rng))],
            random_action(&mut rng),
        );
        let narration = if rng.gen_bool(0.5) { "REMA 1000" } else { "KIWI" };
        let rec = record(narration, random_amount(&mut rng));

        let first = classify_record(&table, rec.clone()).unwrap();
        let second = classify_record(&table, rec).unwrap();
        assert_eq!(first, second);
    }
}
