mod notification;
mod status;
mod subscription;

pub mod dtos {
    pub use crate::notification::dtos::*;
    pub use crate::subscription::dtos::*;
}

pub use crate::notification::api::*;
pub use crate::status::api::*;
pub use crate::subscription::api::*;
