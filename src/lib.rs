#[allow(non_snake_case)]
pub mod Burners;
#[allow(non_snake_case)]
pub mod Ignition;
#[allow(non_snake_case)]
pub mod Mixtures;
#[allow(non_snake_case)]
pub mod Utils;
pub mod settings;
