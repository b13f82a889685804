pub mod asteroid;
pub mod body;
pub mod body_visuals;
pub mod celestial_graph;
pub mod collaborators;
pub mod constants;
pub mod feed;
pub mod kepler;
pub mod orbit;
pub mod orbital_elements;
pub mod orrery_errors;
pub mod point_cloud;
pub mod propagator;
pub mod scene;
pub mod time;
