pub mod camera;
pub mod car;
pub mod clock;
pub mod constants;
pub mod input;
pub mod race;
pub mod rng;
pub mod track;

pub use camera::*;
pub use car::*;
pub use clock::*;
pub use constants::*;
pub use input::*;
pub use race::*;
pub use rng::*;
pub use track::*;
