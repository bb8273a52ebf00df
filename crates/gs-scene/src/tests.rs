use gs_math::{approx_eq_vec3, Vec3};
use gs_save_load::{
    diagnostic::DiagnosticKind,
    entity::Entity,
    field::StateRef,
    graph::SceneGraph,
    manager::GameStateManager,
    settings::SaveSettings,
    GameState,
};

use crate::prelude::*;

#[derive(GameState, Debug, Default, Clone, PartialEq)]
struct Health {
    #[game_state]
    current: i32,
    #[game_state]
    regen: f32,
}

#[derive(GameState, Debug, Default, Clone, PartialEq)]
struct Follower {
    #[game_state]
    leader: Option<Entity>,
    #[game_state]
    leader_health: Option<StateRef<Health>>,
    #[game_state]
    waypoints: Vec<Vec3>,
    path_cache: Vec<Vec3>,
}

/// Not persisted.
#[derive(Debug, PartialEq)]
struct MeshHandle(u32);

fn init_logging() {
    let _ = gs_log::init_console(gs_log::LevelFilter::Debug);
}

fn file_manager(dir: &tempfile::TempDir) -> GameStateManager {
    GameStateManager::with_file_storage(SaveSettings {
        directory: Some(dir.path().into()),
        ..Default::default()
    })
}

/// The same level as a freshly loaded session would build it. `reversed` spawns the entities in
/// the opposite order so handles differ from the first build.
fn build_level(reversed: bool) -> Scene {
    let mut scene = Scene::new();
    let mut names = vec!["Camera", "Captain", "Sailor", "Crate"];
    if reversed {
        names.reverse();
    }
    for name in names {
        scene.spawn(name);
    }

    let captain = scene.find("Captain").unwrap();
    let sailor = scene.find("Sailor").unwrap();
    let camera = scene.find("Camera").unwrap();
    scene.add_state(captain, Health::default()).unwrap();
    scene.add_state(sailor, Health::default()).unwrap();
    scene.add_state(sailor, Follower::default()).unwrap();
    scene.add_component(camera, MeshHandle(3)).unwrap();
    scene
}

fn play(scene: &mut Scene) {
    let captain = scene.find("Captain").unwrap();
    let sailor = scene.find("Sailor").unwrap();

    *scene.get_mut::<Health>(captain).unwrap() = Health {
        current: 80,
        regen: 0.25,
    };
    scene.get_mut::<Health>(sailor).unwrap().current = 15;

    let follower = scene.get_mut::<Follower>(sailor).unwrap();
    follower.leader = Some(captain);
    follower.leader_health = Some(StateRef::new(captain));
    follower.waypoints = vec![Vec3::new(0.0, 0.0, 1.0), Vec3::new(4.5, 0.0, -2.0)];
    follower.path_cache = vec![Vec3::ONE];

    let transform = scene.transform_mut(captain).unwrap();
    transform.position = Vec3::new(10.0, 0.5, -3.0);
    transform.euler_angles = Vec3::new(0.0, 45.0, 0.0);
    scene.set_active(sailor, false).unwrap();
}

#[test]
fn save_and_load_in_new_session() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();

    let mut scene = build_level(false);
    play(&mut scene);
    let diagnostics = file_manager(&dir).save(&scene).unwrap();
    assert!(diagnostics.is_empty());

    let mut scene = build_level(true);
    let diagnostics = file_manager(&dir).load(&mut scene).unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let captain = scene.find("Captain").unwrap();
    let sailor = scene.find("Sailor").unwrap();
    assert_eq!(
        scene.get::<Health>(captain),
        Some(&Health {
            current: 80,
            regen: 0.25
        })
    );
    assert_eq!(scene.get::<Health>(sailor).unwrap().current, 15);

    let follower = scene.get::<Follower>(sailor).unwrap();
    assert_eq!(follower.leader, Some(captain));
    assert_eq!(follower.leader_health, Some(StateRef::new(captain)));
    assert_eq!(follower.waypoints.len(), 2);
    assert!(approx_eq_vec3(
        follower.waypoints[1],
        Vec3::new(4.5, 0.0, -2.0),
        1e-6
    ));
    assert!(follower.path_cache.is_empty());

    let transform = scene.transform(captain).unwrap();
    assert!(approx_eq_vec3(
        transform.position,
        Vec3::new(10.0, 0.5, -3.0),
        1e-6
    ));
    assert_eq!(transform.euler_angles, Vec3::new(0.0, 45.0, 0.0));
    assert!(!scene.is_active_self(sailor));
    assert!(scene.is_active_self(captain));
}

#[test]
fn load_without_save_reports_not_found() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let mut scene = build_level(false);
    play(&mut scene);

    let manager = file_manager(&dir);
    assert!(!manager.exists());
    assert!(manager.load(&mut scene).is_err());
    assert_eq!(
        scene.get::<Health>(scene.find("Captain").unwrap()).unwrap().current,
        80
    );
}

#[test]
fn plain_components_are_left_alone() {
    let mut scene = build_level(false);
    play(&mut scene);
    let camera = scene.find("Camera").unwrap();

    let manager = GameStateManager::new(
        gs_save_load::storage::MemoryStorage::new(),
        SaveSettings::default(),
    );
    let (text, _) = manager.encode_to_string(&scene).unwrap();
    assert!(!text.contains("Camera"));
    assert!(!text.contains("Crate"));
    assert!(!text.contains("path_cache"));

    scene.get_mut::<MeshHandle>(camera).unwrap().0 = 9;
    manager.decode_from_str(&mut scene, &text).unwrap();
    assert_eq!(scene.get::<MeshHandle>(camera), Some(&MeshHandle(9)));
}

#[test]
fn despawned_reference_saves_as_absent() {
    let mut scene = build_level(false);
    play(&mut scene);
    let captain = scene.find("Captain").unwrap();
    assert!(scene.despawn(captain));

    let manager = GameStateManager::new(
        gs_save_load::storage::MemoryStorage::new(),
        SaveSettings::default(),
    );
    let (text, _) = manager.encode_to_string(&scene).unwrap();

    let mut scene = build_level(false);
    play(&mut scene);
    let diagnostics = manager.decode_from_str(&mut scene, &text).unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");

    let follower = scene.get::<Follower>(scene.find("Sailor").unwrap()).unwrap();
    assert_eq!(follower.leader, None);
    assert_eq!(follower.leader_health, None);
}

#[test]
fn renamed_entity_is_reported() {
    let mut scene = build_level(false);
    play(&mut scene);
    let manager = GameStateManager::new(
        gs_save_load::storage::MemoryStorage::new(),
        SaveSettings::default(),
    );
    let (text, _) = manager.encode_to_string(&scene).unwrap();

    let mut scene = build_level(false);
    let captain = scene.find("Captain").unwrap();
    scene.set_name(captain, "Admiral").unwrap();

    let diagnostics = manager.decode_from_str(&mut scene, &text).unwrap();
    // Once for the entity itself, once for each reference to it.
    assert_eq!(diagnostics.count(DiagnosticKind::UnknownEntity), 2);
    assert_eq!(diagnostics.count(DiagnosticKind::UnknownEntityOrComponent), 1);
    assert_eq!(scene.get::<Health>(captain).unwrap().current, 0);
    assert_eq!(
        scene.get::<Health>(scene.find("Sailor").unwrap()).unwrap().current,
        15
    );
}

#[test]
fn persistable_entities_include_inactive() {
    let mut scene = build_level(false);
    let sailor = scene.find("Sailor").unwrap();
    scene.set_active(sailor, false).unwrap();

    let persistable = scene.persistable_entities();
    assert_eq!(persistable.len(), 2);
    let entry = persistable.iter().find(|p| p.entity == sailor).unwrap();
    assert_eq!(entry.components, ["Health", "Follower"]);
    assert_eq!(scene.all_entities().len(), 4);
}

#[test]
fn latest_state_of_a_type_wins() {
    let mut scene = Scene::new();
    let e = scene.spawn("Dummy");
    scene
        .add_state(
            e,
            Health {
                current: 1,
                regen: 0.0,
            },
        )
        .unwrap();
    scene
        .add_state(
            e,
            Health {
                current: 2,
                regen: 0.0,
            },
        )
        .unwrap();

    assert_eq!(scene.get::<Health>(e).unwrap().current, 2);
    let state = scene.component(e, "Health").unwrap();
    assert_eq!(
        state.as_any().downcast_ref::<Health>().unwrap().current,
        2
    );

    assert_eq!(scene.remove::<Health>(e), 2);
    assert!(scene.component(e, "Health").is_none());
}

#[test]
fn despawn_invalidates_handles() {
    let mut scene = Scene::new();
    let ship = scene.spawn("Ship");
    let dock = scene.spawn("Dock");
    scene
        .add_state(
            ship,
            Health {
                current: 5,
                regen: 0.0,
            },
        )
        .unwrap();

    assert!(scene.despawn(ship));
    assert!(!scene.despawn(ship));
    assert!(!scene.is_alive(ship));
    assert_eq!(scene.len(), 1);
    assert_eq!(
        scene.set_name(ship, "Wreck"),
        Err(SceneError::NoSuchEntity(ship))
    );

    // The freed slot is reused under a new version.
    let raft = scene.spawn("Raft");
    assert_eq!(raft.id(), ship.id());
    assert_ne!(raft, ship);
    assert!(scene.name(ship).is_none());
    assert!(scene.get::<Health>(raft).is_none());
    assert!(scene.component(ship, "Health").is_none());
    assert_eq!(scene.entities().collect::<Vec<_>>(), vec![raft, dock]);
    assert_eq!(scene.find("Dock"), Some(dock));
    assert_eq!(scene.transform(raft), Some(&Transform::default()));
    scene.transform_mut(raft).unwrap().position = Vec3::ONE;
    assert_eq!(scene.transform(raft), Some(&Transform::from_position(Vec3::ONE)));
}
