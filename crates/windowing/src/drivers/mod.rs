pub mod headless;
#[cfg(feature = "native")]
pub mod tao;

pub use headless::{HeadlessConfig, HeadlessDriver};
#[cfg(feature = "native")]
pub use self::tao::TaoDriver;
