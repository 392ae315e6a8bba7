//! Report rendering for METAR Card
//!
//! Renders a decoded METAR as an HTML page, captures it as an image with a
//! headless browser and wires the whole `metar <icao>` flow together.

pub mod command;
pub mod html;
pub mod screenshot;

pub use command::{matches_command, MetarCommand, Reply};
pub use html::render_html;
pub use screenshot::{HeadlessBrowser, Screenshotter};
