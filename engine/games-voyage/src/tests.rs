use super::*;
use engine_core::{ActionId, CardId, TokenKind, HAND_SIZE};
use hex_grid::{Direction, Path, Sector};
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn voyage() -> Voyage {
    Voyage::new(Arc::new(HexGrid::generate().unwrap()), RulesConfig::default())
}

fn fresh(voyage: &Voyage, seed: u64) -> (Position, ChaCha20Rng) {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let position = voyage.new_game(&mut rng).unwrap();
    (position, rng)
}

#[test]
fn test_new_game_layout() {
    let voyage = voyage();
    let (pos, _) = fresh(&voyage, 42);
    let config = voyage.config();

    assert_eq!(pos.catalog.len(), 6 * config.deck_size);
    assert_eq!(pos.card_count(), 6 * config.deck_size);
    assert_eq!(pos.hand.len(), config.starting_hand);
    assert_eq!(pos.ship, voyage.grid().home_index());
    assert_eq!(pos.speed, config.speed);
    assert_eq!(pos.round, 0);

    let unlocked: Vec<Sector> = pos.decks.iter().filter(|d| d.unlocked).map(|d| d.sector).collect();
    assert_eq!(unlocked, vec![Sector::A, Sector::B]);

    let tokens: usize = pos.tokens.iter().flatten().filter(|t| t.is_some()).count();
    assert_eq!(tokens, config.token_spawns_per_round);
}

#[test]
fn test_deck_cards_live_in_their_sector() {
    let voyage = voyage();
    let (pos, _) = fresh(&voyage, 7);
    let grid = voyage.grid();

    for deck in &pos.decks {
        for &card in &deck.cards {
            let cell = pos.catalog.location_of(card);
            assert_eq!(grid.sector_of(cell), Some(deck.sector));
        }
    }
    for &card in &pos.hand {
        let cell = pos.catalog.location_of(card);
        assert!(grid.sector_of(cell).is_some());
    }
}

#[test]
fn test_new_game_is_deterministic() {
    let voyage = voyage();
    let (a, _) = fresh(&voyage, 99);
    let (b, _) = fresh(&voyage, 99);
    let (c, _) = fresh(&voyage, 100);
    assert_eq!(a.hand, b.hand);
    assert_eq!(a.decks, b.decks);
    assert_eq!(a.tokens, b.tokens);
    assert_eq!(*a.catalog, *b.catalog);
    assert_ne!(a.decks, c.decks);
}

#[test]
fn test_move_two_north_from_home() {
    let voyage = voyage();
    let grid = voyage.grid_arc();
    let codec = ActionCodec::new(grid.clone());
    let (pos, mut rng) = fresh(&voyage, 1);

    let mv = Move::MoveTo(Path::new(vec![Direction::North, Direction::North]));
    let id = codec.encode(&mv, &pos).unwrap();
    let a2 = grid.index_of("A2-0").unwrap();
    assert_eq!(Some(id), codec.move_id(a2));

    let decoded = codec.decode(id, &pos).unwrap();
    let next = voyage.apply(&pos, &decoded, &mut rng).unwrap();
    assert_eq!(next.ship, a2);
    assert_eq!(next.actions_this_round, 1);
}

#[test]
fn test_move_beyond_speed_is_rejected() {
    let voyage = voyage();
    let (pos, mut rng) = fresh(&voyage, 1);
    let mv = Move::MoveTo(Path::new(vec![Direction::North; 3]));
    assert_eq!(
        voyage.apply(&pos, &mv, &mut rng),
        Err(RuleError::Illegal(mv.clone()))
    );
}

#[test]
fn test_play_card_scores_and_spends_cargo() {
    let voyage = voyage();
    let (mut pos, mut rng) = fresh(&voyage, 3);
    let card = pos.hand[0];
    pos.ship = pos.catalog.location_of(card);
    let kind = pos.catalog.options(card)[0];

    let plain = voyage
        .apply(&pos, &Move::PlayCard { slot: 0, option: 0 }, &mut rng)
        .unwrap();
    assert_eq!(plain.score, 1);
    assert_eq!(plain.hand.len(), pos.hand.len() - 1);
    assert_eq!(plain.discard, vec![card]);
    assert_eq!(plain.markers[pos.ship], 1);

    pos.cargo[kind.index()] = 2;
    let boosted = voyage
        .apply(&pos, &Move::PlayCard { slot: 0, option: 0 }, &mut rng)
        .unwrap();
    assert_eq!(boosted.score, 3);
    assert_eq!(boosted.cargo_of(kind), 1);
}

#[test]
fn test_play_card_away_from_location_is_illegal() {
    let voyage = voyage();
    let (pos, mut rng) = fresh(&voyage, 3);
    // Cards never live on the home cell.
    let mv = Move::PlayCard { slot: 0, option: 0 };
    assert!(matches!(
        voyage.apply(&pos, &mv, &mut rng),
        Err(RuleError::Illegal(_))
    ));
}

#[test]
fn test_draw_and_discard_draw() {
    let voyage = voyage();
    let grid = voyage.grid_arc();
    let (mut pos, mut rng) = fresh(&voyage, 5);
    pos.ship = grid.index_of("A1-0").unwrap();

    let top = pos.deck(Sector::A).top().unwrap();
    let drawn = voyage
        .apply(
            &pos,
            &Move::DrawCard {
                zone: Sector::A,
                discard: None,
            },
            &mut rng,
        )
        .unwrap();
    assert_eq!(drawn.hand.last(), Some(&top));
    assert_eq!(drawn.deck(Sector::A).len(), pos.deck(Sector::A).len() - 1);

    // Fill the hand, then only the discard form is legal.
    let mut full = pos.clone();
    while full.hand.len() < HAND_SIZE {
        let card = full.deck_mut(Sector::B).draw().unwrap();
        full.hand.push(card);
    }
    let plain = Move::DrawCard {
        zone: Sector::A,
        discard: None,
    };
    assert!(!voyage.is_legal(&full, &plain));
    let swap = Move::DrawCard {
        zone: Sector::A,
        discard: Some(1),
    };
    let dropped = full.hand[1];
    let next = voyage.apply(&full, &swap, &mut rng).unwrap();
    assert_eq!(next.hand.len(), HAND_SIZE);
    assert_eq!(next.discard.last(), Some(&dropped));
    assert_eq!(next.hand.last(), Some(&top));
    assert_eq!(next.card_count(), full.card_count());
}

#[test]
fn test_draw_from_locked_sector_is_illegal() {
    let voyage = voyage();
    let grid = voyage.grid_arc();
    let (mut pos, mut rng) = fresh(&voyage, 5);
    pos.ship = grid.index_of("D1-0").unwrap();
    let mv = Move::DrawCard {
        zone: Sector::D,
        discard: None,
    };
    assert!(matches!(
        voyage.apply(&pos, &mv, &mut rng),
        Err(RuleError::Illegal(_))
    ));
}

#[test]
fn test_collect_moves_token_to_cargo() {
    let voyage = voyage();
    let grid = voyage.grid_arc();
    let (mut pos, mut rng) = fresh(&voyage, 11);
    let home = grid.home_index();
    pos.tokens[home] = [None, Some(TokenKind::Onyx)];

    let next = voyage
        .apply(&pos, &Move::Collect { slot: 1 }, &mut rng)
        .unwrap();
    assert_eq!(next.token_at(home, 1), None);
    assert_eq!(next.cargo_of(TokenKind::Onyx), 1);

    assert!(matches!(
        voyage.apply(&pos, &Move::Collect { slot: 0 }, &mut rng),
        Err(RuleError::Illegal(_))
    ));
}

#[test]
fn test_pass_ends_round_and_spawns_tokens() {
    let voyage = voyage();
    let (pos, mut rng) = fresh(&voyage, 13);
    let before: usize = pos.tokens.iter().flatten().filter(|t| t.is_some()).count();

    let next = voyage.apply(&pos, &Move::Pass, &mut rng).unwrap();
    assert_eq!(next.round, 1);
    assert_eq!(next.actions_this_round, 0);
    let after: usize = next.tokens.iter().flatten().filter(|t| t.is_some()).count();
    assert_eq!(after, before + voyage.config().token_spawns_per_round);

    // Round 2 unlocks the next deck in sector order.
    let next = voyage.apply(&next, &Move::Pass, &mut rng).unwrap();
    assert_eq!(next.round, 2);
    assert!(next.deck(Sector::C).unlocked);
    assert!(!next.deck(Sector::D).unlocked);
}

#[test]
fn test_round_ends_after_action_budget() {
    let voyage = voyage();
    let grid = voyage.grid_arc();
    let (pos, mut rng) = fresh(&voyage, 17);
    let hop = |d: Direction| Move::MoveTo(Path::new(vec![d]));

    let one = voyage.apply(&pos, &hop(Direction::North), &mut rng).unwrap();
    let two = voyage.apply(&one, &hop(Direction::South), &mut rng).unwrap();
    assert_eq!(two.round, 0);
    assert_eq!(two.ship, grid.home_index());
    let three = voyage.apply(&two, &hop(Direction::SouthEast), &mut rng).unwrap();
    assert_eq!(three.round, 1);
    assert_eq!(three.actions_this_round, 0);
}

#[test]
fn test_terminal_scores() {
    let voyage = voyage();
    let (mut pos, mut rng) = fresh(&voyage, 19);
    assert_eq!(voyage.terminal_score(&pos), None);

    pos.score = 4;
    pos.round = voyage.config().max_rounds;
    let score = voyage.terminal_score(&pos).unwrap();
    assert!((score - 0.4).abs() < 1e-6);
    assert_eq!(voyage.apply(&pos, &Move::Pass, &mut rng), Err(RuleError::GameOver));

    pos.round = 0;
    pos.score = voyage.config().target_score;
    assert_eq!(voyage.terminal_score(&pos), Some(1.0));
}

#[test]
fn test_heuristic_stays_below_win() {
    let voyage = voyage();
    let (mut pos, _) = fresh(&voyage, 23);
    assert_eq!(voyage.heuristic(&pos), 0.0);
    pos.score = 9;
    pos.cargo = [3, 3, 3, 3, 3];
    assert!(voyage.heuristic(&pos) < 1.0);
    pos.score = 2;
    pos.cargo = [2, 0, 0, 0, 0];
    assert!((voyage.heuristic(&pos) - 0.3).abs() < 1e-6);
}

/// Random legal playouts, checking the codec against the rules at every step.
#[test]
fn test_codec_agrees_with_rules_along_random_games() {
    let voyage = voyage();
    let codec = ActionCodec::new(voyage.grid_arc());

    for seed in 0..4 {
        let (mut pos, mut rng) = fresh(&voyage, seed);
        let cards = pos.card_count();
        let mut steps = 0;

        while voyage.terminal_score(&pos).is_none() && steps < 120 {
            let mask = codec.legality_mask(&pos);
            assert!(mask.is_legal(codec.layout().pass()));

            for raw in 0..codec.len() as u32 {
                let id = ActionId(raw);
                match codec.decode(id, &pos) {
                    Ok(mv) => {
                        assert_eq!(mask.is_legal(id), voyage.is_legal(&pos, &mv), "{mv}");
                        if mask.is_legal(id) {
                            assert_eq!(codec.encode(&mv, &pos), Ok(id));
                        } else {
                            let mut probe = rng.clone();
                            assert!(matches!(
                                voyage.apply(&pos, &mv, &mut probe),
                                Err(RuleError::Illegal(_))
                            ));
                        }
                    }
                    Err(_) => assert!(!mask.is_legal(id)),
                }
            }

            let legal = mask.legal_ids();
            let id = *legal.choose(&mut rng).unwrap();
            let mv = codec.decode(id, &pos).unwrap();
            pos = voyage.apply(&pos, &mv, &mut rng).unwrap();
            assert_eq!(pos.card_count(), cards);
            steps += 1;
        }
    }
}

#[test]
fn test_layout_metadata() {
    let voyage = voyage();
    let codec = ActionCodec::new(voyage.grid_arc());
    let meta = layout_metadata(&codec);
    assert_eq!(meta.env_id, ENV_ID);
    assert_eq!(meta.num_actions, 198);
    assert!(!meta.description.is_empty());
}

#[test]
fn test_card_ids_are_sector_major() {
    let voyage = voyage();
    let (pos, _) = fresh(&voyage, 29);
    let size = voyage.config().deck_size as u16;
    let first_c = CardId(2 * size);
    assert!(pos.catalog.card(first_c).key.starts_with('C'));
}
