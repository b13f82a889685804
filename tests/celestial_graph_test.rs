use nalgebra::Point3;
use orrery::{
    body::BodyType,
    celestial_graph::{CelestialGraph, NewBody},
    collaborators::CameraPosition,
    constants::J2000_JD,
    orbit::Orbit,
    orrery_errors::OrreryError,
    scene::{transform::Transform, NodeKind},
};

mod common;
use common::{assert_point_close, earth_elements, elements, ephemeris, solar_system_graph};

#[test]
fn test_solar_system_population() {
    let mut graph = solar_system_graph();
    let entries = [
        ephemeris("Titan", BodyType::Moon, 606, elements(0.008, 0.0288, 10.0)),
        ephemeris("Saturn", BodyType::Planet, 699, elements(9.54, 0.0565, 317.0)),
        ephemeris("Earth", BodyType::Planet, 399, earth_elements()),
        ephemeris("Moon", BodyType::Moon, 301, elements(0.00257, 0.0549, 135.0)),
    ];
    assert_eq!(graph.populate_from_ephemeris(&entries).unwrap(), 4);
    assert_eq!(graph.len(), 5);

    let saturn = graph.find_by_name("Saturn").unwrap();
    let titan = graph.find_by_name("Titan").unwrap();
    assert_eq!(titan.parent, saturn.representation);
    assert_eq!(graph.find_by_id(301).unwrap().model, "Moon");

    // the ring hangs under Saturn, next to Titan and its trace
    let children = graph.scene().node(saturn.representation).unwrap().children();
    assert_eq!(children.len(), 3);
    assert!(children.contains(&titan.representation));
}

#[test]
fn test_moon_world_position_composes() {
    let mut graph = solar_system_graph();
    graph
        .populate_from_ephemeris(&[
            ephemeris("Earth", BodyType::Planet, 399, earth_elements()),
            ephemeris("Moon", BodyType::Moon, 301, elements(0.00257, 0.0549, 135.0)),
        ])
        .unwrap();

    for day in [0.0, 10.0, 200.0] {
        let time = J2000_JD + day;
        graph.update_positions(time).unwrap();

        let earth = graph.find_by_name("Earth").unwrap();
        let moon = graph.find_by_name("Moon").unwrap();
        let earth_local = earth.orbit.as_ref().unwrap().propagator().position_at(time).unwrap();
        let moon_local = moon.orbit.as_ref().unwrap().propagator().position_at(time).unwrap();

        assert_point_close(
            &graph.world_position(moon.representation).unwrap(),
            &Point3::from(earth_local + moon_local),
            1e-9,
        );
    }
}

#[test]
fn test_second_insertion_is_a_no_op() {
    let mut graph = solar_system_graph();
    let root = graph.scene().root();
    let add = |graph: &mut CelestialGraph, id| {
        let node = graph
            .scene_mut()
            .create("voyager", NodeKind::Group, Transform::identity());
        graph.add_body(NewBody {
            parent: root,
            body_type: BodyType::PlayerObject,
            orbit: Some(Orbit::new("Voyager", earth_elements()).unwrap()),
            representation: node,
            always_show_path: true,
            object_id: id,
            model: "Voyager".into(),
            owner: Some("bob".into()),
        })
    };

    assert!(add(&mut graph, 10).is_ok());
    let before = graph.len();
    assert_eq!(
        add(&mut graph, 11),
        Err(OrreryError::DuplicateBody("Voyager".into()))
    );
    assert_eq!(graph.len(), before);
    assert!(graph.find_by_id(11).is_none());
}

#[test]
fn test_lookup_misses_are_absent() {
    let graph = solar_system_graph();
    assert!(graph.find_by_name("Nibiru").is_none());
    assert!(graph.find_by_id(0xdead).is_none());
}

#[test]
fn test_asteroid_belt_lod() {
    let mut graph = solar_system_graph();
    let records = orrery::feed::read_asteroid_records(
        "\
orbit_id,owner_id,object_id,display_name,diameter,a,e,i,om,w,w_bar,ma,epoch,P,n
1 Ceres (A801 AA),,1001,1 Ceres,939.4,2.77,0.0785,10.59,80.3,73.6,,77.37,2451545.0,1681.6,
4 Vesta (A807 FA),alice,1004,4 Vesta,525.4,2.36,0.089,7.14,103.8,151.2,,20.86,2451545.0,1325.7,
433 Eros (A898 PA),bob,1433,433 Eros,_,1.458,0.223,10.83,304.3,178.8,,271.1,2451545.0,,0.5598
1 Ceres (A801 AA),,1001,1 Ceres,939.4,2.77,0.0785,10.59,80.3,73.6,,77.37,2451545.0,1681.6,
"
        .as_bytes(),
    )
    .unwrap();

    let added = records
        .iter()
        .filter(|record| graph.add_new_asteroid(record).is_ok())
        .count();
    assert_eq!(added, 3);
    assert_eq!(graph.points().len(), 3);

    graph.update_positions(J2000_JD + 30.0).unwrap();
    let eros = graph.find_by_name("433 Eros").unwrap().representation;
    let position = graph.world_position(eros).unwrap();

    graph.update_lod(&CameraPosition(position)).unwrap();
    let NodeKind::Lod(levels) = &graph.scene().node(eros).unwrap().kind else {
        panic!("asteroids are LOD nodes");
    };
    assert_eq!(levels.active(), 0);
    assert_eq!(levels.len(), 3);
    // cost never grows with distance
    assert!(levels.levels().windows(2).all(|w| w[0].cost >= w[1].cost));
}
