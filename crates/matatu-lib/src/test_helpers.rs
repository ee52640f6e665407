// Test-only network fixtures shared across module tests.

use crate::network::Network;

/// Three connected nodes plus an isolated one.
///
/// Edges: 0 -5- 1 -3- 2; node 3 has a position but no edges.
pub(crate) fn triangle() -> Network {
    let mut network = Network::new();
    network.add_node(0, 0.3146, 32.5761);
    network.add_node(1, 0.3191, 32.5836);
    network.add_node(2, 0.3175, 32.5800);
    network.add_node(3, 0.3270, 32.5690);
    network.add_edge(0, 1, 5.0);
    network.add_edge(1, 2, 3.0);
    network
}

/// A congested edge (0, 1) with two detours of different cost.
///
/// Direct: 0 -4- 1. Detours: 0 -2- 2 -3- 1 (cost 5) and 0 -4- 3 -4- 1
/// (cost 8).
pub(crate) fn detour_junction() -> Network {
    let mut network = Network::new();
    network.add_node(0, 0.3146, 32.5761);
    network.add_node(1, 0.3191, 32.5836);
    network.add_node(2, 0.3175, 32.5800);
    network.add_node(3, 0.3120, 32.5750);
    network.add_edge(0, 1, 4.0);
    network.add_edge(0, 2, 2.0);
    network.add_edge(2, 1, 3.0);
    network.add_edge(0, 3, 4.0);
    network.add_edge(3, 1, 4.0);
    network
}

/// Eight fully connected city locations loosely modelled on central Kampala.
pub(crate) fn city() -> Network {
    let mut network = Network::new();
    let locations = [
        (0, 0.3146, 32.5761), // taxi park
        (1, 0.3191, 32.5836), // mall
        (2, 0.3175, 32.5800), // market
        (3, 0.3130, 32.5780), // side street
        (4, 0.3120, 32.5750), // open market
        (5, 0.3270, 32.5690), // junction
        (6, 0.3381, 32.5696), // campus
        (7, 0.3250, 32.6100), // industrial area
    ];
    for (id, lat, lon) in locations {
        network.add_node(id, lat, lon);
    }

    let roads = [
        (0, 1, 5.0),
        (0, 2, 3.0),
        (2, 1, 4.0),
        (0, 3, 2.0),
        (3, 4, 3.0),
        (2, 5, 8.0),
        (5, 6, 4.0),
        (1, 7, 10.0),
    ];
    for (from, to, travel_time) in roads {
        network.add_edge(from, to, travel_time);
    }
    network
}
