use rand::SeedableRng;
use rand::rngs::{StdRng, ThreadRng};
use std::fs;
use zone_dice::history::HISTORY_CAPACITY;
use std::str::FromStr;
use strum::IntoEnumIterator;
use zone_dice::skills::{self, find_skill};
use zone_dice::*;

fn die(color: DieColor, value: u8) -> DieResult {
    DieResult::new(color, value)
}

#[test]
fn test_roll_pool_matches_config() {
    let config = DiceConfig::new(3, 2, 4);
    let mut faces: RngFaces<ThreadRng> = RngFaces::default();
    let results = roll_pool(&config, &mut faces);

    assert_eq!(results.len(), 9);
    assert_eq!(results.iter().filter(|d| d.color == DieColor::Green).count(), 3);
    assert_eq!(results.iter().filter(|d| d.color == DieColor::Yellow).count(), 2);
    assert_eq!(results.iter().filter(|d| d.color == DieColor::Black).count(), 4);
    assert!(results.iter().all(|d| (1..=6).contains(&d.value) && !d.pushed));

    // Every die gets its own id.
    let mut ids: Vec<_> = results.iter().map(|d| d.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 9);
}

#[test]
fn test_empty_config_rolls_nothing() {
    let mut faces = SequenceFaces::new([4]);
    assert!(roll_pool(&DiceConfig::default(), &mut faces).is_empty());
    assert!(DiceConfig::new(0, 0, 0).is_empty());
}

#[test]
fn test_faces_are_uniform() {
    let mut faces = RngFaces::new(StdRng::seed_from_u64(7));
    let rolls = 60_000;
    let mut counts = [0u32; 6];
    for _ in 0..rolls {
        let face = faces.roll_face();
        assert!((1..=6).contains(&face));
        counts[(face - 1) as usize] += 1;
    }

    let expected = rolls as f64 / 6.0;
    let chi_square: f64 = counts
        .iter()
        .map(|&observed| (observed as f64 - expected).powi(2) / expected)
        .sum();
    // Five degrees of freedom; 30 is far beyond the 0.001 critical value.
    assert!(chi_square < 30.0, "chi-square {} for {:?}", chi_square, counts);
}

#[test]
fn test_classification_per_color() {
    let green_six = die(DieColor::Green, 6);
    assert!(green_six.is_success());
    assert!(!green_six.is_pushable());

    let green_one = die(DieColor::Green, 1);
    assert!(!green_one.is_failure());
    assert!(green_one.is_pushable());

    let yellow_one = die(DieColor::Yellow, 1);
    assert!(yellow_one.is_failure());
    assert!(!yellow_one.is_broken_gear());
    assert!(!yellow_one.is_pushable());
    assert!(!die(DieColor::Yellow, 6).is_pushable());
    assert!(die(DieColor::Yellow, 4).is_pushable());

    let black_one = die(DieColor::Black, 1);
    assert!(black_one.is_failure());
    assert!(black_one.is_broken_gear());
    assert!(!black_one.is_pushable());
    assert!(die(DieColor::Black, 2).is_pushable());
    assert!(!die(DieColor::Black, 6).is_pushable());
}

#[test]
fn test_pushed_dice_are_never_pushable() {
    for color in [DieColor::Green, DieColor::Yellow, DieColor::Black] {
        for value in 1..=6 {
            let mut pushed = die(color, value);
            pushed.pushed = true;
            assert!(!pushed.is_pushable(), "{} {} was pushable", color, value);
        }
    }
}

#[test]
fn test_summary_counts_broken_gear_as_failure() {
    let results = vec![
        die(DieColor::Green, 6),
        die(DieColor::Green, 1),
        die(DieColor::Yellow, 6),
        die(DieColor::Yellow, 1),
        die(DieColor::Black, 1),
        die(DieColor::Black, 1),
        die(DieColor::Black, 4),
    ];
    let summary = summarize(&results);
    assert_eq!(
        summary,
        RollSummary {
            success_count: 2,
            failure_count: 3,
            broken_gear_count: 2,
        }
    );

    // Same dice, same summary, in any order.
    assert_eq!(summarize(&results), summary);
    let mut reversed = results.clone();
    reversed.reverse();
    assert_eq!(summarize(&reversed), summary);
}

#[test]
fn test_push_rerolls_only_pushable_dice() {
    let mut faces = SequenceFaces::new([6, 3, 1, 4]);
    let rolled = roll_pool(&DiceConfig::new(2, 1, 1), &mut faces);
    let values: Vec<u8> = rolled.iter().map(|d| d.value).collect();
    assert_eq!(values, vec![6, 3, 1, 4]);

    let mut push_faces = SequenceFaces::new([1, 5]);
    let pushed = push_pool(&rolled, &mut push_faces);

    assert_eq!(pushed.len(), rolled.len());
    // Locked dice carried over untouched.
    assert_eq!(pushed[0], rolled[0]);
    assert_eq!(pushed[2], rolled[2]);
    // Rerolled dice keep their color and are marked.
    assert_eq!((pushed[1].color, pushed[1].value, pushed[1].pushed), (DieColor::Green, 1, true));
    assert_eq!((pushed[3].color, pushed[3].value, pushed[3].pushed), (DieColor::Black, 5, true));
    assert_ne!(pushed[1].id, rolled[1].id);

    assert!(!any_pushable(&pushed));
}

#[test]
fn test_push_with_nothing_pushable_is_unchanged() {
    let results = vec![die(DieColor::Green, 6), die(DieColor::Black, 1)];
    let mut faces = SequenceFaces::new([3]);
    assert_eq!(push_pool(&results, &mut faces), results);
}

#[test]
fn test_glyphs() {
    assert_eq!(die(DieColor::Green, 6).glyph(), "☢️");
    assert_eq!(die(DieColor::Yellow, 1).glyph(), "☣️");
    assert_eq!(die(DieColor::Black, 1).glyph(), "💥");
    assert_eq!(die(DieColor::Green, 1).glyph(), "1");
    assert_eq!(die(DieColor::Black, 4).glyph(), "4");
}

#[test]
fn test_roller_rejects_empty_pool() {
    let mut roller = DiceRoller::new("dice");
    let mut faces = SequenceFaces::new([6]);

    assert_eq!(roller.roll(&mut faces, "").unwrap_err(), DiceError::EmptyPool);
    assert!(roller.history().is_empty());
    assert!(!roller.is_rolling());
}

#[test]
fn test_huge_pool_counts_do_not_overflow() {
    let config = DiceConfig::new(u32::MAX, 1, 0);
    assert_eq!(config.total(), u32::MAX);
    assert!(!config.is_empty());
    assert!(!DiceConfig::new(u32::MAX, u32::MAX, u32::MAX).is_empty());
}

#[test]
fn test_roller_rejects_oversized_pool() {
    let mut roller = DiceRoller::new("dice");
    let mut faces = SequenceFaces::new([4]);

    roller.set_config(DiceConfig::new(u32::MAX, 1, 0));
    assert_eq!(
        roller.roll(&mut faces, "").unwrap_err(),
        DiceError::PoolTooLarge(u32::MAX)
    );
    assert!(roller.history().is_empty());
    assert!(roller.results().is_empty());
    assert!(!roller.is_rolling());

    roller.set_config(DiceConfig::new(MAX_POOL_DICE, 0, 0));
    let results = roller.roll(&mut faces, "").expect("largest allowed pool");
    assert_eq!(results.len() as u32, MAX_POOL_DICE);
}

#[test]
fn test_roller_rejects_overlapping_rolls() {
    let mut roller = DiceRoller::new("dice");
    roller.set_config(DiceConfig::new(1, 1, 0));
    let mut faces = SequenceFaces::new([3, 4]);

    roller.roll(&mut faces, "").expect("first roll");
    assert!(roller.is_rolling());
    assert!(!roller.can_push());
    assert_eq!(roller.roll(&mut faces, "").unwrap_err(), DiceError::RollInProgress);
    assert_eq!(roller.push(&mut faces).unwrap_err(), DiceError::RollInProgress);
    assert_eq!(roller.history().len(), 1);

    roller.settle();
    assert!(roller.can_push());
}

#[test]
fn test_roller_push_flow_and_labels() {
    let mut roller = DiceRoller::new("dice");
    roller.set_config(DiceConfig::new(1, 1, 1));
    let mut faces = SequenceFaces::new([2, 3, 4]);

    roller.roll(&mut faces, "  ").expect("roll");
    let summary = roller.settle();
    assert_eq!(summary, RollSummary::default());
    assert_eq!(roller.history().latest().unwrap().description, "Roll 1");

    let mut push_faces = SequenceFaces::new([6, 1, 1]);
    roller.push(&mut push_faces).expect("push");
    let summary = roller.settle();
    assert_eq!(
        summary,
        RollSummary {
            success_count: 1,
            failure_count: 2,
            broken_gear_count: 1,
        }
    );

    let latest = roller.history().latest().unwrap();
    assert_eq!(latest.description, "Roll 1 (Push)");
    assert!(latest.is_push());
    assert_eq!(roller.history().len(), 2);

    // Only one push per roll.
    assert!(!roller.can_push());
    assert_eq!(roller.push(&mut push_faces).unwrap_err(), DiceError::NothingToPush);
    assert_eq!(roller.history().len(), 2);
}

#[test]
fn test_roller_push_keeps_custom_description() {
    let mut roller = DiceRoller::new("skill");
    roller.set_config(DiceConfig::new(0, 2, 0));
    let mut faces = SequenceFaces::new([3]);

    roller.roll(&mut faces, "Climb the pylon").unwrap();
    roller.settle();
    roller.push(&mut faces).unwrap();
    roller.settle();

    let descriptions: Vec<&str> = roller
        .history()
        .list()
        .iter()
        .map(|entry| entry.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["Climb the pylon (Push)", "Climb the pylon"]);
}

#[test]
fn test_roller_invalid_push_leaves_state_alone() {
    let mut roller = DiceRoller::new("dice");
    roller.set_config(DiceConfig::new(1, 0, 1));
    let mut faces = SequenceFaces::new([6, 1]);
    roller.roll(&mut faces, "").unwrap();
    roller.settle();

    let before = roller.results().to_vec();
    assert_eq!(roller.push(&mut faces).unwrap_err(), DiceError::NothingToPush);
    assert_eq!(roller.results(), before.as_slice());
    assert_eq!(roller.history().len(), 1);
    assert!(!roller.is_rolling());
}

#[test]
fn test_history_is_bounded_newest_first() {
    let mut roller = DiceRoller::new("dice");
    roller.set_config(DiceConfig::new(1, 0, 0));
    let mut faces = SequenceFaces::new([6]);

    for _ in 0..15 {
        roller.roll(&mut faces, "").unwrap();
        roller.settle();
        assert!(roller.history().len() <= HISTORY_CAPACITY);
    }

    assert_eq!(roller.history().len(), HISTORY_CAPACITY);
    // Numbering follows the log length, which stops growing at capacity.
    assert_eq!(roller.history().latest().unwrap().description, "Roll 11");

    roller.clear_history();
    assert!(roller.history().is_empty());
}

#[test]
fn test_history_record_keeps_latest_first() {
    let mut history = RollHistory::new();
    for i in 0..12 {
        history.record(HistoryEntry::new(vec![die(DieColor::Green, 6)], format!("entry {}", i)));
    }
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history.list()[0].description, "entry 11");
    assert_eq!(history.list()[9].description, "entry 2");
}

#[test]
fn test_history_book_streams_are_disjoint() {
    let mut book = HistoryBook::new(MemoryStorage::new());
    book.record("skill", HistoryEntry::new(vec![die(DieColor::Yellow, 6)], "Shoot"))
        .unwrap();
    book.record("rot-damage", HistoryEntry::new(vec![die(DieColor::Green, 2)], "Damage"))
        .unwrap();
    book.record("skill", HistoryEntry::new(vec![die(DieColor::Yellow, 1)], "Sneak"))
        .unwrap();

    let skill = book.list("skill");
    assert_eq!(skill.len(), 2);
    assert_eq!(skill[0].description, "Sneak");
    assert_eq!(book.list("rot-damage").len(), 1);
    assert!(book.list("rot-protection").is_empty());

    book.clear("skill").unwrap();
    assert!(book.list("skill").is_empty());
    assert_eq!(book.list("rot-damage").len(), 1);
}

#[test]
fn test_history_book_bounds_persisted_streams() {
    let mut book = HistoryBook::new(MemoryStorage::new());
    for i in 0..13 {
        book.record("dice", HistoryEntry::new(vec![die(DieColor::Black, 3)], format!("{}", i)))
            .unwrap();
    }
    let entries = book.list("dice");
    assert_eq!(entries.len(), HISTORY_CAPACITY);
    assert_eq!(entries[0].description, "12");
}

#[test]
fn test_malformed_history_loads_empty() {
    let mut storage = MemoryStorage::new();
    storage.set("history_skill", "{ this is not json").unwrap();
    let mut book = HistoryBook::new(storage);

    assert!(book.list("skill").is_empty());

    // Recording over the corrupted value starts a fresh log.
    book.record("skill", HistoryEntry::new(vec![die(DieColor::Green, 6)], "Fresh"))
        .unwrap();
    assert_eq!(book.list("skill").len(), 1);
}

#[test]
fn test_history_with_impossible_faces_is_dropped() {
    let mut book = HistoryBook::new(MemoryStorage::new());
    book.record("dice", HistoryEntry::new(vec![die(DieColor::Black, 3)], "Tampered"))
        .unwrap();
    book.record("dice", HistoryEntry::new(vec![die(DieColor::Green, 5)], "Valid"))
        .unwrap();

    let mut storage = book.into_storage();
    let raw = storage.get("history_dice").unwrap().expect("stored history");
    assert!(raw.contains("\"value\":3"));
    storage
        .set("history_dice", &raw.replace("\"value\":3", "\"value\":9"))
        .unwrap();
    let book = HistoryBook::new(storage);

    let entries = book.list("dice");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].description, "Valid");
    assert_eq!(entries[0].results[0].value, 5);
}

#[test]
fn test_file_storage_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut roller = DiceRoller::new("skill");
    roller.set_config(DiceConfig::new(2, 1, 1));
    let mut faces = SequenceFaces::new([6, 2, 1, 1]);
    roller.roll(&mut faces, "Force the door").unwrap();
    roller.settle();

    let mut book = HistoryBook::new(FileStorage::new(dir.path()));
    book.save("skill", roller.history()).unwrap();
    assert!(dir.path().join("history_skill.json").exists());

    let reloaded = HistoryBook::new(FileStorage::new(dir.path())).load("skill");
    assert_eq!(&reloaded, roller.history());
    assert_eq!(
        reloaded.latest().unwrap().summary(),
        RollSummary {
            success_count: 1,
            failure_count: 2,
            broken_gear_count: 1,
        }
    );
}

#[test]
fn test_file_storage_rejects_unsafe_keys() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut storage = FileStorage::new(dir.path());
    assert!(matches!(
        storage.set("../escape", "{}"),
        Err(StorageError::InvalidKey(_))
    ));
    assert!(storage.get("missing").unwrap().is_none());
}

#[test]
fn test_character_sheet_from_json() {
    let json_str = fs::read_to_string("tests/dummy_character_sheet.json")
        .expect("Failed to read dummy character sheet JSON file");
    let sheet: CharacterSheet = serde_json::from_str(&json_str).expect("Failed to parse JSON");

    assert_eq!(sheet.name, "Raven");
    assert_eq!(sheet.role, Role::Stalker);
    assert_eq!(sheet.skill(BaseSkill::Shoot), 3);
    assert_eq!(sheet.skill(BaseSkill::Heal), 0);

    // Tiny items and worn armor weigh nothing.
    assert_eq!(sheet.carried_weight(), 2);
    assert_eq!(sheet.max_carry_weight(), 6);
    assert!(!sheet.is_encumbered());

    // Trauma takes an attribute die away.
    assert_eq!(sheet.base_skill_pool(BaseSkill::Shoot, 2), DiceConfig::new(4, 3, 2));
    let shoot = find_skill("shoot").expect("shoot skill");
    assert_eq!(sheet.pool_for(shoot, 2), Some(DiceConfig::new(4, 3, 2)));

    let own = find_skill(Role::Stalker.specialist_skill_id()).expect("specialist skill");
    assert_eq!(sheet.pool_for(own, 0), Some(DiceConfig::new(4, 2, 0)));
    let other = find_skill("boss-command").expect("boss skill");
    assert_eq!(sheet.pool_for(other, 0), None);

    let rot = sheet.rot_config(3).expect("sheet has rot points");
    assert_eq!(rot.rot_points, 4);
    assert!(rot.rot_resistant);
    assert_eq!(rot.suit_rating, Some(2));
}

#[test]
fn test_character_sheet_persistence() {
    let mut storage = MemoryStorage::new();
    assert_eq!(CharacterSheet::load(&storage), CharacterSheet::default());

    let mut sheet = CharacterSheet::new("Dusk", Role::DogHandler);
    sheet.set_rot_points(14);
    sheet.set_skill(BaseSkill::KnowTheZone, 2);
    sheet.rot_suit = Some(RotSuit::new("Old suit", 9));
    assert_eq!(sheet.rot_points, 10);
    assert_eq!(sheet.rot_suit.as_ref().unwrap().rating, 6);

    sheet.save(&mut storage).unwrap();
    assert_eq!(CharacterSheet::load(&storage), sheet);

    storage.set("character", "[1, 2").unwrap();
    assert_eq!(CharacterSheet::load(&storage), CharacterSheet::default());
}

#[test]
fn test_sheet_without_rot_has_no_exposure() {
    let mut sheet = CharacterSheet::new("Dusk", Role::Fixer);
    sheet.rot_suit = Some(RotSuit::new("Old suit", 3));
    assert_eq!(sheet.rot_points, 0);
    assert_eq!(sheet.rot_config(3), None);

    sheet.set_rot_points(1);
    let rot = sheet.rot_config(3).expect("one rot point");
    assert_eq!(rot.rot_points, 1);
    assert_eq!(rot.suit_rating, Some(3));
}

#[test]
fn test_every_base_skill_is_in_the_catalog() {
    let sheet = CharacterSheet::new("Dusk", Role::Fixer);
    let catalog: Vec<_> = skills::base_skills().collect();
    assert_eq!(catalog.len(), BaseSkill::iter().count());

    for skill in BaseSkill::iter() {
        let info = catalog
            .iter()
            .find(|info| info.name == skill.to_string())
            .unwrap_or_else(|| panic!("{} missing from the catalog", skill));
        assert_eq!(find_skill(info.id), Some(*info));
        assert_eq!(info.attribute, skill.attribute());
        assert_eq!(BaseSkill::from_str(info.name), Ok(skill));
        assert_eq!(sheet.pool_for(info, 1), Some(sheet.base_skill_pool(skill, 1)));
    }

    let sneak = find_skill("sneak").expect("sneak skill");
    assert!(sneak.stunts.is_empty());
    let summary = RollSummary {
        success_count: 3,
        ..RollSummary::default()
    };
    assert!(sneak.available_stunts(&summary).is_empty());
}

#[test]
fn test_stunts_unlock_at_two_successes() {
    let fight = find_skill("fight").expect("fight skill");
    let one = RollSummary {
        success_count: 1,
        ..RollSummary::default()
    };
    let two = RollSummary {
        success_count: 2,
        ..RollSummary::default()
    };
    assert!(fight.available_stunts(&one).is_empty());
    assert_eq!(fight.available_stunts(&two).len(), fight.stunts.len());
    assert!(find_skill("no-such-skill").is_none());
}

#[test]
fn test_settings_defaults_and_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    assert_eq!(Settings::load(dir.path()), Settings::default());

    let settings = Settings {
        animation_ms: 0,
        debug_mode: true,
        ..Settings::default()
    };
    settings.save(dir.path()).unwrap();
    assert_eq!(Settings::load(dir.path()), settings);

    fs::write(dir.path().join("settings.json"), "not json").unwrap();
    assert_eq!(Settings::load(dir.path()), Settings::default());
}
