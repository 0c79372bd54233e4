use arcana_catalog::*;
use arcana_db::*;

fn spell(book: &str, name: &str, level: u32, school: School, casters: &[Caster]) -> Spell {
    Spell {
        book: book.to_string(),
        name: name.to_string(),
        level,
        school,
        ritual: false,
        guild: false,
        category: None,
        range: "Touch".to_string(),
        duration: "Instantaneous".to_string(),
        casting_time: "1 action".to_string(),
        description: String::new(),
        casters: casters.to_vec(),
        components: vec![Component::simple("verbal"), Component::simple("somatic")],
    }
}

fn fixtures() -> Vec<Spell> {
    let mut cure = spell("Player's Handbook", "Cure Wounds", 1, School::Evocation, &[
        Caster::Bard,
        Caster::Cleric,
        Caster::Druid,
    ]);
    cure.description = "A creature you touch regains hit points; magic to heal.".to_string();

    let mut heal = spell("Player's Handbook", "Heal", 6, School::Evocation, &[
        Caster::Cleric,
        Caster::Druid,
    ]);
    heal.range = "60 feet".to_string();
    heal.description = "Choose a creature that you can see.".to_string();

    let mut healing_word = spell("Player's Handbook", "Healing Word", 1, School::Evocation, &[
        Caster::Bard,
        Caster::Cleric,
    ]);
    healing_word.casting_time = "1 bonus action".to_string();

    let mut alarm = spell("Player's Handbook", "Alarm", 1, School::Abjuration, &[
        Caster::Ranger,
        Caster::Wizard,
    ]);
    alarm.ritual = true;
    alarm.duration = "8 hours".to_string();
    alarm.components.push(Component::material(Some("a tiny bell".to_string())));

    let mut friendship = spell("Xanathar's Guide", "Animal Friendship", 1, School::Enchantment, &[
        Caster::Bard,
        Caster::Druid,
    ]);
    friendship.category = Some("Beasts".to_string());

    let shapes = spell("Xanathar's Guide", "Animal Shapes", 8, School::Transmutation, &[
        Caster::Druid,
    ]);

    let mut water = spell("Dead Man's Chest", "Control Water", 4, School::Transmutation, &[
        Caster::Cleric,
        Caster::Druid,
        Caster::Wizard,
    ]);
    water.guild = true;
    water.category = Some("Elemental".to_string());

    let mut fireball = spell("Player's Handbook", "Fireball", 3, School::Evocation, &[
        Caster::Sorcerer,
        Caster::Wizard,
    ]);
    fireball.range = "150 feet".to_string();

    let percent = spell("Odd Book", "100% Chance_of Rain", 2, School::Conjuration, &[
        Caster::Druid,
    ]);

    vec![cure, heal, healing_word, alarm, friendship, shapes, water, fireball, percent]
}

fn setup_db() -> rusqlite::Connection {
    let mut conn = open_memory().unwrap();
    insert_spells(&mut conn, &fixtures()).unwrap();
    conn
}

fn keys(spells: &[Spell]) -> Vec<(String, String)> {
    spells
        .iter()
        .map(|s| (s.book.clone(), s.name.clone()))
        .collect()
}

fn criteria_cases() -> Vec<Criteria> {
    let c = Criteria::new;
    vec![
        c(),
        Criteria { name: Some("animal".into()), ..c() },
        Criteria { name: Some("ANIMAL".into()), ..c() },
        Criteria { book: Some("player's".into()), ..c() },
        Criteria { level: Some("1".into()), ..c() },
        Criteria { level: Some("(1, 3)".into()), ..c() },
        Criteria { school: Some("(evocation, 'abjuration')".into()), ..c() },
        Criteria { caster: Some("wizard".into()), ..c() },
        Criteria { caster: Some("(sorcerer, ranger)".into()), ..c() },
        Criteria { ritual: Some(true), ..c() },
        Criteria { guild: Some(true), ..c() },
        Criteria { guild: Some(false), level: Some("1".into()), ..c() },
        Criteria { category: Some("beast".into()), ..c() },
        Criteria { range: Some("feet".into()), ..c() },
        Criteria { duration: Some("hours".into()), ..c() },
        Criteria { casting_time: Some("bonus".into()), ..c() },
        Criteria { description: Some("creature".into()), ..c() },
        Criteria { general: Some("heal".into()), caster: Some("cleric".into()), ..c() },
        Criteria { general: Some("transmutation".into()), ..c() },
        Criteria { name: Some("100%".into()), ..c() },
        Criteria { name: Some("e_o".into()), ..c() },
        Criteria { name: Some("x' OR '1'='1".into()), ..c() },
    ]
}

#[test]
fn sql_results_agree_with_in_memory_evaluation() {
    let conn = setup_db();
    let all = fixtures();

    for criteria in criteria_cases() {
        let predicate = criteria.compile().unwrap();
        let from_sql = find_spells(&conn, &predicate, None, None).unwrap();

        let mut expected: Vec<Spell> = all
            .iter()
            .filter(|s| predicate.matches(s))
            .cloned()
            .collect();
        expected.sort_by(|a, b| a.natural_key().cmp(&b.natural_key()));

        assert_eq!(keys(&from_sql), keys(&expected), "criteria: {criteria:?}");
        assert_eq!(
            count_spells(&conn, &predicate).unwrap(),
            expected.len() as i64,
            "criteria: {criteria:?}"
        );
    }
}

#[test]
fn empty_predicate_returns_everything_in_key_order() {
    let conn = setup_db();
    let spells = find_spells(&conn, &Predicate::True, None, None).unwrap();
    assert_eq!(spells.len(), fixtures().len());

    let found = keys(&spells);
    let mut sorted = found.clone();
    sorted.sort();
    assert_eq!(found, sorted);
}

#[test]
fn stored_spells_round_trip() {
    let conn = setup_db();
    for original in fixtures() {
        let loaded = find_spell(&conn, &original.book, &original.name)
            .unwrap()
            .unwrap();
        assert_eq!(loaded, original);
    }
    assert!(find_spell(&conn, "Player's Handbook", "Wish").unwrap().is_none());
}

#[test]
fn level_list_is_a_union() {
    let conn = setup_db();
    let criteria = Criteria {
        level: Some("(1,3)".into()),
        ..Criteria::new()
    };
    let spells = find_spells(&conn, &criteria.compile().unwrap(), None, None).unwrap();
    assert_eq!(spells.len(), 5);
    assert!(spells.iter().all(|s| s.level == 1 || s.level == 3));
}

#[test]
fn animal_matches_three_of_seventeen_in_any_case() {
    let mut conn = open_memory().unwrap();
    let mut batch = Vec::new();
    for name in ["Animal Friendship", "Animal Messenger", "Conjure Animals"] {
        batch.push(spell("PHB", name, 2, School::Enchantment, &[Caster::Druid]));
    }
    for i in 0..14 {
        batch.push(spell("PHB", &format!("Filler {i}"), 1, School::Illusion, &[Caster::Wizard]));
    }
    insert_spells(&mut conn, &batch).unwrap();

    for needle in ["animal", "ANIMAL", "aNiMaL"] {
        let criteria = Criteria {
            name: Some(needle.into()),
            ..Criteria::new()
        };
        let spells = find_spells(&conn, &criteria.compile().unwrap(), None, None).unwrap();
        assert_eq!(spells.len(), 3, "needle: {needle}");
    }
}

#[test]
fn general_search_combines_with_caster() {
    let conn = setup_db();
    let criteria = Criteria {
        general: Some("heal".into()),
        caster: Some("cleric".into()),
        ..Criteria::new()
    };
    let spells = find_spells(&conn, &criteria.compile().unwrap(), None, None).unwrap();
    let names: Vec<&str> = spells.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Cure Wounds", "Heal", "Healing Word"]);
}

#[test]
fn level_sort_breaks_ties_by_natural_key() {
    let conn = setup_db();
    let sort = SortOrder::ascending(Column::Level);
    let spells = find_spells(&conn, &Predicate::True, Some(&sort), None).unwrap();

    let levels: Vec<u32> = spells.iter().map(|s| s.level).collect();
    assert_eq!(levels, vec![1, 1, 1, 1, 2, 3, 4, 6, 8]);

    let level_one: Vec<&str> = spells[..4].iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        level_one,
        vec!["Alarm", "Cure Wounds", "Healing Word", "Animal Friendship"]
    );

    let mut expected = fixtures();
    sort.sort(&mut expected);
    assert_eq!(keys(&spells), keys(&expected));
}

#[test]
fn descending_sort() {
    let conn = setup_db();
    let sort: SortOrder = "level desc".parse().unwrap();
    let spells = find_spells(&conn, &Predicate::True, Some(&sort), None).unwrap();
    assert_eq!(spells[0].name, "Animal Shapes");
    assert_eq!(spells[1].name, "Heal");
}

#[test]
fn limit_caps_results() {
    let conn = setup_db();
    let spells = find_spells(&conn, &Predicate::True, None, Some(2)).unwrap();
    assert_eq!(spells.len(), 2);
    assert_eq!(spells[0].name, "Control Water");

    assert!(find_spells(&conn, &Predicate::True, None, Some(0))
        .unwrap()
        .is_empty());
    assert_eq!(
        find_spells(&conn, &Predicate::True, None, Some(100)).unwrap().len(),
        fixtures().len()
    );
}

#[test]
fn no_match_is_an_empty_vec() {
    let conn = setup_db();
    let criteria = Criteria {
        name: Some("Wish".into()),
        ..Criteria::new()
    };
    assert!(find_spells(&conn, &criteria.compile().unwrap(), None, None)
        .unwrap()
        .is_empty());
}

#[test]
fn injection_shaped_value_does_not_disturb_table() {
    let conn = setup_db();
    let criteria = Criteria {
        name: Some("'; DROP TABLE spells; --".into()),
        ..Criteria::new()
    };
    assert!(find_spells(&conn, &criteria.compile().unwrap(), None, None)
        .unwrap()
        .is_empty());
    assert_eq!(count_spells(&conn, &Predicate::True).unwrap(), 9);
}

#[test]
fn stats_count_every_dimension() {
    let conn = setup_db();
    let stats = catalog_stats(&conn).unwrap();

    assert_eq!(stats.total, 9);
    assert_eq!(stats.books["Player's Handbook"], 5);
    assert_eq!(stats.books["Xanathar's Guide"], 2);
    assert_eq!(stats.levels[&1], 4);
    assert_eq!(stats.levels[&8], 1);
    assert_eq!(stats.schools[&School::Evocation], 4);
    assert!(!stats.schools.contains_key(&School::Necromancy));

    assert_eq!(stats.casters.len(), Caster::all().len());
    assert_eq!(stats.casters[&Caster::Druid], 6);
    assert_eq!(stats.casters[&Caster::Cleric], 4);
    assert_eq!(stats.casters[&Caster::Warlock], 0);
}

#[test]
fn stats_on_empty_catalog() {
    let conn = open_memory().unwrap();
    let stats = catalog_stats(&conn).unwrap();
    assert_eq!(stats.total, 0);
    assert!(stats.books.is_empty());
    assert!(stats.casters.values().all(|&n| n == 0));
}
