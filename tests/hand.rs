//! Card and hand scoring tests.

use bjround::hand::incremental_value;
use bjround::{Card, Hand, Suit};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn hand(ranks: &[u8]) -> Hand {
    ranks
        .iter()
        .map(|&rank| Card::new(Suit::Spades, rank))
        .collect::<Vec<_>>()
        .into()
}

#[test]
fn card_values_and_labels() {
    assert_eq!(Card::new(Suit::Hearts, 1).value(), 11);
    assert_eq!(Card::new(Suit::Hearts, 7).value(), 7);
    assert_eq!(Card::new(Suit::Hearts, 12).value(), 10);
    assert_eq!(Card::new(Suit::Hearts, 1).label(), "A");
    assert_eq!(Card::new(Suit::Clubs, 10).label(), "10");
    assert_eq!(Card::new(Suit::Clubs, 13).label(), "K");
    assert!(!Card::new(Suit::Clubs, 14).is_valid());
}

#[test]
fn random_cards_are_valid() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..500 {
        assert!(Card::random(&mut rng).is_valid());
    }
}

#[test]
fn value_mapping_picks_rank() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    assert_eq!(Card::for_value(1, &mut rng).rank, 1);
    assert_eq!(Card::for_value(6, &mut rng).rank, 6);
    assert_eq!(Card::for_value(10, &mut rng).rank, 10);
    assert_eq!(Card::for_value(11, &mut rng).rank, 11);
    assert_eq!(Card::for_value(11, &mut rng).value(), 10);
    assert_eq!(Card::for_value(0, &mut rng).rank, 1);
}

#[test]
fn soft_aces_resolve_one_at_a_time() {
    assert_eq!(hand(&[1, 1, 1, 1]).value(), 14);
    assert!(hand(&[1, 6]).is_soft());
    assert!(!hand(&[1, 6, 10]).is_soft());
}

#[test]
fn face_cards_count_ten() {
    assert_eq!(hand(&[11, 12]).value(), 20);
    assert_eq!(hand(&[13, 5, 9]).value(), 24);
    assert!(hand(&[13, 5, 9]).is_bust());
}

#[test]
fn incremental_ace_counts_low_near_the_top() {
    let ace = Card::new(Suit::Hearts, 1);
    assert_eq!(incremental_value(&ace, 0), 11);
    assert_eq!(incremental_value(&ace, 10), 11);
    assert_eq!(incremental_value(&ace, 11), 1);
    assert_eq!(incremental_value(&Card::new(Suit::Hearts, 12), 15), 10);
}

#[test]
fn empty_hand_scores_zero() {
    assert_eq!(Hand::new().value(), 0);
    assert!(Hand::new().is_empty());
}
