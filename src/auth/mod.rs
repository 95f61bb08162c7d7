pub(crate) mod extractors;

pub use extractors::MasterKey;
