//! Reading station velocities and writing strain results

mod geojson;
mod gmt;
mod velocity;

pub use geojson::{to_geojson, write_geojson};
pub use gmt::{
    eigen_arrow, write_eigenvectors, write_polygon_values, write_strain_outputs, write_uplift,
    StrainQuantity,
};
pub use velocity::{
    parse_blacklist, parse_gmt_vels, parse_station_vels, read_blacklist, read_velocities,
    write_gmt_vels, write_station_vels, write_velocities, VelocityFormat,
};
