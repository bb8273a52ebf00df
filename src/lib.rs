pub mod save_load {
    pub use gs_save_load::*;
}

pub mod scene {
    pub use gs_scene::*;
}

pub mod log {
    pub use gs_log::*;
}

pub mod math {
    pub use gs_math::*;
}

pub mod prelude {
    pub use gs_save_load::prelude::*;
    pub use gs_scene::prelude::*;
}
