// Engine modules: input and tick scheduling

pub mod input;
pub mod tick;
