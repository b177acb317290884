pub mod geometry;
pub mod mock_kernel;
pub mod primitives;
pub mod traits;
pub mod truck_kernel;
pub mod types;

pub use geometry::{Axis, Prism, PICK_TOLERANCE};
pub use mock_kernel::{KernelCall, MockKernel, MockShape};
pub use traits::*;
pub use truck_kernel::TruckKernel;
pub use types::*;
