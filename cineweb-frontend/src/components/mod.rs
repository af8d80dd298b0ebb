mod address;
mod cards;
mod map;
mod modal;
mod navbar;
mod toasts;
mod uploads;

pub use self::{address::*, cards::*, map::*, modal::*, navbar::*, toasts::*, uploads::*};
