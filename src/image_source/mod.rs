pub mod impl_channel;
pub mod impl_paths;
pub mod interface;
