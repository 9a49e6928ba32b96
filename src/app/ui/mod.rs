mod controls;
mod details;
pub(super) mod fps;
mod panels;
