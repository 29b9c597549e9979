use paddock::{
    fence::rectangle_perimeter, AnimalKind, Farm, FarmConfig, FarmError, FarmEvent, PastureId,
    Side, StockPolicy, TileCoord, TileGrid,
};

/// 6x4 farm with a 2x2 pasture (capacity 8) and a 1x2 pasture (capacity 4)
fn two_pasture_farm(config: FarmConfig) -> (Farm<TileGrid>, PastureId, PastureId) {
    let mut farm = Farm::new(TileGrid::rectangle(6, 4), config);
    for (tile, side) in rectangle_perimeter(TileCoord::new(1, 1), TileCoord::new(2, 2)) {
        farm.add_fence(tile, side).unwrap();
    }
    for (tile, side) in rectangle_perimeter(TileCoord::new(4, 1), TileCoord::new(4, 2)) {
        farm.add_fence(tile, side).unwrap();
    }
    let big = farm.pasture_at(TileCoord::new(1, 1)).unwrap().id();
    let small = farm.pasture_at(TileCoord::new(4, 1)).unwrap().id();
    farm.drain_events();
    (farm, big, small)
}

#[test]
fn add_succeeds_up_to_capacity() {
    let (mut farm, big, _) = two_pasture_farm(FarmConfig::default());

    farm.add_animals(big, AnimalKind::Sheep, 5).unwrap();
    assert!(farm.can_add_animals(big, 3).unwrap());
    assert!(!farm.can_add_animals(big, 4).unwrap());

    farm.add_animals(big, AnimalKind::Boar, 3).unwrap();
    let pasture = farm.pasture(big).unwrap();
    assert_eq!(pasture.total_animals(), 8);
    assert_eq!(pasture.free_capacity(), 0);
}

#[test]
fn one_over_capacity_fails_and_leaves_stock() {
    let (mut farm, big, _) = two_pasture_farm(FarmConfig::default());
    farm.add_animals(big, AnimalKind::Sheep, 5).unwrap();
    farm.drain_events();

    // capacity 8, holding 5
    let err = farm.add_animals(big, AnimalKind::Cattle, 8 - 5 + 1).unwrap_err();

    assert_eq!(
        err,
        FarmError::CapacityExceeded {
            pasture: big,
            requested: 4,
            held: 5,
            capacity: 8,
        }
    );
    let pasture = farm.pasture(big).unwrap();
    assert_eq!(pasture.animal_count(AnimalKind::Sheep), 5);
    assert_eq!(pasture.animal_count(AnimalKind::Cattle), 0);
    assert!(farm.events().is_empty());
}

#[test]
fn removing_too_many_fails_and_exact_removal_drops_entry() {
    let (mut farm, big, _) = two_pasture_farm(FarmConfig::default());
    farm.add_animals(big, AnimalKind::Cattle, 3).unwrap();

    let err = farm.remove_animals(big, AnimalKind::Cattle, 4).unwrap_err();
    assert_eq!(
        err,
        FarmError::InsufficientStock {
            pasture: big,
            kind: AnimalKind::Cattle,
            requested: 4,
            held: 3,
        }
    );
    assert_eq!(farm.pasture(big).unwrap().animal_count(AnimalKind::Cattle), 3);

    farm.remove_animals(big, AnimalKind::Cattle, 3).unwrap();
    let pasture = farm.pasture(big).unwrap();
    assert_eq!(pasture.animal_count(AnimalKind::Cattle), 0);
    assert!(pasture.stock().is_empty());
}

#[test]
fn unknown_pasture_is_reported() {
    let (mut farm, big, _) = two_pasture_farm(FarmConfig::default());
    farm.recompute();

    // ids from before the recompute are gone
    assert_eq!(
        farm.add_animals(big, AnimalKind::Sheep, 1),
        Err(FarmError::UnknownPasture(big))
    );
    assert_eq!(
        farm.can_add_animals(big, 1),
        Err(FarmError::UnknownPasture(big))
    );
}

#[test]
fn stock_mutations_emit_updates() {
    let (mut farm, big, _) = two_pasture_farm(FarmConfig::default());

    farm.add_animals(big, AnimalKind::Sheep, 2).unwrap();
    farm.remove_animals(big, AnimalKind::Sheep, 1).unwrap();

    let events = farm.drain_events();
    assert_eq!(events.len(), 2);
    match &events[1] {
        FarmEvent::PastureUpdated { id, pasture } => {
            assert_eq!(*id, big);
            assert_eq!(pasture.animal_count(AnimalKind::Sheep), 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn fence_edit_discards_animals_by_default() {
    let (mut farm, big, _) = two_pasture_farm(FarmConfig::default());
    farm.add_animals(big, AnimalKind::Sheep, 4).unwrap();

    // an unrelated edit still rebuilds every pasture
    farm.add_fence(TileCoord::new(0, 0), Side::Right).unwrap();

    let rebuilt = farm.pasture_at(TileCoord::new(1, 1)).unwrap();
    assert_ne!(rebuilt.id(), big);
    assert_eq!(rebuilt.total_animals(), 0);
}

#[test]
fn carry_over_policy_keeps_animals_of_unchanged_pastures() {
    let config = FarmConfig {
        stock_on_recompute: StockPolicy::CarryOverUnchanged,
        ..FarmConfig::default()
    };
    let (mut farm, big, small) = two_pasture_farm(config);
    farm.add_animals(big, AnimalKind::Sheep, 4).unwrap();
    farm.add_animals(small, AnimalKind::Boar, 2).unwrap();

    // split the small pasture, leave the big one alone
    farm.add_fence(TileCoord::new(4, 1), Side::Top).unwrap();

    let big_now = farm.pasture_at(TileCoord::new(2, 2)).unwrap();
    assert_eq!(big_now.animal_count(AnimalKind::Sheep), 4);
    let halves: u32 = [TileCoord::new(4, 1), TileCoord::new(4, 2)]
        .into_iter()
        .map(|tile| farm.pasture_at(tile).unwrap().total_animals())
        .sum();
    assert_eq!(halves, 0, "changed pastures start empty");
}

#[test]
fn losing_a_structure_releases_excess_animals() {
    let (mut farm, big, _) = two_pasture_farm(FarmConfig::default());
    farm.add_structure(TileCoord::new(1, 2)).unwrap();
    assert_eq!(farm.pasture(big).unwrap().capacity(), 16);
    farm.add_animals(big, AnimalKind::Sheep, 6).unwrap();
    farm.add_animals(big, AnimalKind::Cattle, 6).unwrap();

    let change = farm
        .remove_structure(TileCoord::new(1, 2))
        .unwrap()
        .expect("capacity drops");

    assert_eq!(change.current, 8);
    let pasture = farm.pasture(big).unwrap();
    assert_eq!(pasture.total_animals(), 8);
    assert_eq!(pasture.animal_count(AnimalKind::Sheep), 4);
    assert_eq!(pasture.animal_count(AnimalKind::Cattle), 4);
}

#[test]
fn move_animals_is_all_or_nothing() {
    let (mut farm, big, small) = two_pasture_farm(FarmConfig::default());
    farm.add_animals(big, AnimalKind::Sheep, 6).unwrap();

    let err = farm
        .move_animals(big, small, AnimalKind::Sheep, 5)
        .unwrap_err();
    assert!(matches!(err, FarmError::CapacityExceeded { pasture, .. } if pasture == small));
    assert_eq!(farm.pasture(big).unwrap().animal_count(AnimalKind::Sheep), 6);

    farm.move_animals(big, small, AnimalKind::Sheep, 4).unwrap();
    assert_eq!(farm.pasture(big).unwrap().animal_count(AnimalKind::Sheep), 2);
    assert_eq!(farm.pasture(small).unwrap().animal_count(AnimalKind::Sheep), 4);
}

#[test]
fn carry_over_drops_stock_that_no_longer_fits() {
    let config = FarmConfig {
        stock_on_recompute: StockPolicy::CarryOverUnchanged,
        ..FarmConfig::default()
    };
    let (mut farm, big, small) = two_pasture_farm(config);
    farm.add_structure(TileCoord::new(1, 1)).unwrap();
    farm.add_animals(big, AnimalKind::Cattle, 12).unwrap();
    farm.add_animals(small, AnimalKind::Sheep, 3).unwrap();

    // the host drops the structure without notifying, the next edit rebuilds
    farm.tiles_mut().remove_structure(TileCoord::new(1, 1));
    farm.add_fence(TileCoord::new(0, 0), Side::Top).unwrap();

    let big_now = farm.pasture_at(TileCoord::new(1, 1)).unwrap();
    assert_eq!(big_now.capacity(), 8);
    assert_eq!(big_now.total_animals(), 0, "12 cattle exceed the new capacity");
    let small_now = farm.pasture_at(TileCoord::new(4, 2)).unwrap();
    assert_eq!(small_now.animal_count(AnimalKind::Sheep), 3);
}
